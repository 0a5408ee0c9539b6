#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_cover_the_centre_with_cubes() {
    use anyhow::ensure;
    use gasket_demos::{
        context::Context,
        demos::{self, Demo, DemoState, Overrides},
        flow::ImageTestResult,
    };

    use crate::common::test_utils::pixel_at;

    let overrides = Overrides {
        seed: Some(1),
        ..Default::default()
    };
    let constructor = demos::constructor(Demo::Hsr, &overrides).expect("valid hsr configuration");

    crate::golden_image_test!(
        constructor,
        |_: &mut Context| (),
        |ctx: &Context, _: &DemoState, texture: &image::RgbaImage| {
            let format = ctx.config.format;
            let background = pixel_at(texture, format, -0.95, 0.95);
            let centre = pixel_at(texture, format, 0.0, 0.0);
            ensure!(
                centre != background,
                "the centre shows the clear colour {background:?}"
            );
            Ok(ImageTestResult::Passed)
        }
    );
}

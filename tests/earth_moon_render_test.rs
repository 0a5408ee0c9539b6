#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_light_the_earth_facing_the_camera() {
    use anyhow::ensure;
    use gasket_demos::{
        context::Context,
        demos::{self, Demo, DemoState, Overrides},
        flow::ImageTestResult,
    };

    use crate::common::test_utils::pixel_at;

    let overrides = Overrides {
        depth: Some(3),
        ..Default::default()
    };
    let constructor =
        demos::constructor(Demo::EarthMoon, &overrides).expect("valid earth-moon configuration");

    crate::golden_image_test!(
        constructor,
        |_: &mut Context| (),
        |ctx: &Context, _: &DemoState, texture: &image::RgbaImage| {
            let [r, g, b, _] = pixel_at(texture, ctx.config.format, 0.0, 0.0);
            let brightness = u32::from(r) + u32::from(g) + u32::from(b);
            ensure!(brightness > 60, "the earth is too dark: {brightness}");
            Ok(ImageTestResult::Passed)
        }
    );
}

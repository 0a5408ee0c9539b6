#[cfg(feature = "integration-tests")]
mod common;

/// A gasket subdivided once: three red corner triangles around a white hole.
#[test]
#[cfg(feature = "integration-tests")]
fn should_draw_subdivided_gasket() {
    use anyhow::ensure;
    use gasket_demos::{
        context::Context,
        demos::{self, Demo, DemoState, Overrides},
        flow::ImageTestResult,
    };

    use crate::common::test_utils::pixel_at;

    let overrides = Overrides {
        depth: Some(1),
        ..Default::default()
    };
    let constructor =
        demos::constructor(Demo::Gasket, &overrides).expect("valid gasket configuration");

    crate::golden_image_test!(
        constructor,
        |_: &mut Context| (),
        |ctx: &Context, _: &DemoState, texture: &image::RgbaImage| {
            let format = ctx.config.format;
            let red = [255, 0, 0, 255];
            let white = [255, 255, 255, 255];
            // centroids of the three remaining triangles
            for (x, y) in [(-0.5, -2.0 / 3.0), (0.5, -2.0 / 3.0), (0.0, 1.0 / 3.0)] {
                let pixel = pixel_at(texture, format, x, y);
                ensure!(pixel == red, "expected paint at ({x}, {y}), got {pixel:?}");
            }
            // the removed middle triangle and the area outside the gasket
            for (x, y) in [(0.0, -1.0 / 3.0), (-0.9, 0.9), (0.9, 0.9)] {
                let pixel = pixel_at(texture, format, x, y);
                ensure!(pixel == white, "expected background at ({x}, {y}), got {pixel:?}");
            }
            Ok(ImageTestResult::Passed)
        }
    );
}

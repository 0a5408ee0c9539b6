#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
use gasket_demos::flow::ImageTestResult;
use gasket_demos::{
    WindowEvent,
    context::Context,
    demos::DemoState,
    flow::{GraphicsFlow, Out},
    render::Render,
};

pub(crate) type Setup = Box<dyn Fn(&mut Context)>;

#[cfg(feature = "integration-tests")]
pub(crate) type Validate =
    Box<dyn Fn(&Context, &DemoState, &image::RgbaImage) -> Result<ImageTestResult, anyhow::Error>>;

/// A flow that draws nothing.
pub(crate) struct Blank;

impl GraphicsFlow<DemoState> for Blank {
    fn on_init(&mut self, _: &mut Context, _: &mut DemoState) -> Out {
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut DemoState, _: std::time::Duration) -> Out {
        state.frames += 1;
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }
}

/// Wraps a demo: applies the demo's own `on_init` configuration, then runs
/// `setup`, and checks the offscreen frame with `validate` once the demo has
/// been updated at least once.
#[cfg(feature = "integration-tests")]
pub(crate) struct ImageTest {
    pub(crate) inner: Box<dyn GraphicsFlow<DemoState>>,
    pub(crate) setup: Setup,
    pub(crate) validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<DemoState> for ImageTest {
    fn on_init(&mut self, ctx: &mut Context, state: &mut DemoState) -> Out {
        // setup must win over the demo's settings
        self.inner.on_init(ctx, state).apply(ctx);
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_click(&mut self, ctx: &Context, state: &mut DemoState, id: u32) -> Out {
        self.inner.on_click(ctx, state, id)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, dt: std::time::Duration) -> Out {
        self.inner.on_update(ctx, state, dt)
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        self.inner.on_tick(ctx, state)
    }

    fn on_window_events(&mut self, ctx: &Context, state: &mut DemoState, event: &WindowEvent) -> Out {
        self.inner.on_window_events(ctx, state, event)
    }

    fn on_render(&self) -> Render<'_> {
        self.inner.on_render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut DemoState,
        texture: &image::RgbaImage,
    ) -> Result<ImageTestResult, anyhow::Error> {
        if state.frames == 0 {
            return Ok(ImageTestResult::Waiting);
        }
        (self.validate)(ctx, state, texture)
    }
}

/// The texel under the clip space position `(x, y)`, channels in RGBA order
/// whatever the surface format.
pub(crate) fn pixel_at(
    texture: &image::RgbaImage,
    format: wgpu::TextureFormat,
    x: f32,
    y: f32,
) -> [u8; 4] {
    let (width, height) = texture.dimensions();
    let px = (((x + 1.0) / 2.0 * width as f32) as u32).min(width - 1);
    let py = (((1.0 - y) / 2.0 * height as f32) as u32).min(height - 1);
    let [a, b, c, d] = texture.get_pixel(px, py).0;
    match format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => [c, b, a, d],
        _ => [a, b, c, d],
    }
}

#[macro_export]
macro_rules! golden_image_test {
    ($constructor:expr, $setup:expr, $validate:expr) => {{
        use crate::common::test_utils::ImageTest;
        use gasket_demos::demos::DemoState;
        use gasket_demos::flow::{FlowConsturctor, GraphicsFlow};

        let constructor: FlowConsturctor<DemoState> = $constructor;
        let model_constructor: FlowConsturctor<DemoState> = Box::new(move |init| {
            Box::pin(async move {
                let inner = constructor(init).await?;
                let g_flow: Box<dyn GraphicsFlow<DemoState>> = Box::new(ImageTest {
                    inner,
                    setup: Box::new($setup),
                    validate: Box::new($validate),
                });
                anyhow::Ok(g_flow)
            })
        });

        gasket_demos::flow::run(vec![model_constructor])
            .expect("Failed to run flow for integration test.");
    }};
}

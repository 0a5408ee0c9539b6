//! Flow control and application event loop.
//!
//! A "flow" is one demo: it owns its meshes, textures and animation state,
//! handles the few input events it cares about and describes each frame as a
//! [`Render`]. The engine owns the window and the graphics [`Context`], drives
//! the flows and batches their renders per pipeline.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the trait every demo implements
//! - [`Out`] lets a hook reconfigure the context after it returns
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window events
//! 2. Call `on_window_events` on all flows
//! 3. Upload the camera, collect the flows' renders and draw them
//! 4. Present frame
//! 5. Update flow state (via `on_tick` / `on_update`)
//!
//! A left click additionally renders the pick pass and calls `on_click` on the
//! flows that own the object under the cursor.

use std::{collections::HashSet, fmt::Debug, iter, pin::Pin, sync::Arc};

use anyhow::anyhow;
use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::{MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext, MouseButtonState},
    data_structures::texture::Texture,
    pick::draw_to_pick_buffer,
    render::{Batches, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// What a lifecycle hook asks the engine to do once it has returned.
///
/// `Out::Configure` modifies the [`Context`] at runtime, for instance the tick
/// speed or the clear colour. Hooks that only receive `&Context` use it to
/// change engine settings.
///
/// `Empty` is the default output.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Out {
    /// Runs the configuration, if any, against `ctx`.
    pub fn apply(self, ctx: &mut Context) {
        match self {
            Out::Configure(f) => f(ctx),
            Out::Empty => (),
        }
    }
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(feature = "integration-tests")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// Trait for implementing a demo.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure context (camera, light, clear color)
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame
/// 4. `on_tick()` is called every `tick_duration_millis`
/// 5. `on_click()` is called when an object with this flow's ID is clicked
/// 6. `on_render()` is called each frame and specifies how to render `self`
///
/// Only `on_init`, `on_update` and `on_render` are required; the other hooks
/// do nothing unless a demo overrides them.
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    ///
    /// This is the place to set the camera and the light of the demo. Engine
    /// settings such as the clear colour go through the returned [`Out`].
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out;

    /// Handle a click on an object rendered by this flow.
    ///
    /// `id` is the pick id of the object under the cursor. Only ids that
    /// appear in a [`Render::Painter`] of this flow are reported, see
    /// [`crate::pick::draw_to_pick_buffer`].
    fn on_click(&mut self, _ctx: &Context, _state: &mut S, _id: u32) -> Out {
        Out::Empty
    }

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`. Animations of the demos
    /// advance per call, not per second.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// Update state periodically.
    ///
    /// Called every `tick_duration_millis` milliseconds (configurable via context).
    fn on_tick(&mut self, _ctx: &Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Handle window events (keyboard, mouse, window resizing, etc.).
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    /// Return renderable objects for this flow.
    fn on_render(&self) -> Render<'_>;

    /// Inspect the frame that was just rendered offscreen.
    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _state: &mut S,
        _texture: &image::RgbaImage,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok(ImageTestResult::Passed)
    }
}

// Dummy impl to make wasm work
impl<State> Debug for dyn GraphicsFlow<State> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`. Meshes, textures and uniforms are uploaded there; a
/// failing constructor aborts the start of the application.
pub type FlowConsturctor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Application state bundle: GPU context, app state, and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}
impl<'a, State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn get_surface_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.ctx.surface.get_current_texture()
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(&self, extent3d: wgpu::Extent3d, format: wgpu::TextureFormat) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Frame Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_3d_extent(&self) -> wgpu::Extent3d {
        let (width, height) = crate::pick::padded_extent(self.ctx.config.width, self.ctx.config.height);
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }

    fn render(
        &'a mut self,
        graphics_flows: &mut Vec<Box<dyn GraphicsFlow<State>>>,
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] event_loop: &winit::event_loop::EventLoopProxy<
            FlowEvent<State>,
        >,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.ctx.update_camera();

        let output = self.get_surface_texture()?;

        #[cfg(not(feature = "integration-tests"))]
        let (target, depth_view) = (
            output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            &self.ctx.depth_texture.view,
        );

        // Tests render into an offscreen copy of the surface that can be read back
        #[cfg(feature = "integration-tests")]
        let extent3d = self.get_test_3d_extent();
        #[cfg(feature = "integration-tests")]
        let test_texture = self.get_test_texture(extent3d, self.ctx.config.format);
        #[cfg(feature = "integration-tests")]
        let test_depth = Texture::create_depth_texture(
            &self.ctx.device,
            [extent3d.width, extent3d.height],
            "test_depth_texture",
        );
        #[cfg(feature = "integration-tests")]
        let (target, depth_view) = (
            test_texture.create_view(&wgpu::TextureViewDescriptor::default()),
            &test_depth.view,
        );

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut batches = Batches::default();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().set_pipelines(&mut batches));
            batches.draw(&self.ctx, &mut render_pass);
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let bytes_per_row = 4 * extent3d.width;
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Test Frame Buffer"),
                size: u64::from(bytes_per_row * extent3d.height),
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                test_texture.as_image_copy(),
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(bytes_per_row),
                        rows_per_image: Some(extent3d.height),
                    },
                },
                extent3d,
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            match async_runtime.block_on(read_test_image(&self.ctx.device, &output_buffer, extent3d)) {
                Ok(img) => {
                    let state = &mut self.state;
                    let mut all_passed = true;
                    for flow in graphics_flows.iter_mut() {
                        match flow.render_to_texture(&self.ctx, state, &img) {
                            Ok(ImageTestResult::Passed) => (),
                            Ok(ImageTestResult::Waiting) => all_passed = false,
                            Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                            Err(e) => panic!("{}", e),
                        }
                    }
                    if all_passed && event_loop.send_event(FlowEvent::Exit).is_err() {
                        log::error!("All assertions passed but the event loop is already closed");
                    }
                }
                Err(e) => log::error!("Unable to read back the test frame: {e:#}"),
            }
        }

        output.present();
        Ok(())
    }
}

#[cfg(feature = "integration-tests")]
async fn read_test_image(
    device: &wgpu::Device,
    output_buffer: &wgpu::Buffer,
    extent3d: wgpu::Extent3d,
) -> anyhow::Result<image::RgbaImage> {
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::Wait)?;
    rx.receive()
        .await
        .ok_or_else(|| anyhow!("test frame mapping was cancelled"))??;
    let data = buffer_slice.get_mapped_range().to_vec();
    output_buffer.unmap();
    image::RgbaImage::from_raw(extent3d.width, extent3d.height, data)
        .ok_or_else(|| anyhow!("test frame does not match its extent"))
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(
        not(any(target_arch = "wasm32", feature = "integration-tests")),
        allow(dead_code)
    )]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConsturctor<State>>>,
    last_time: Instant,
    time_since_tick: Duration,
    // Fatal setup error, reported by `run` once the loop has exited.
    error: Option<anyhow::Error>,
}

impl<State: 'static> App<State> {
    fn new(
        event_loop: &EventLoop<FlowEvent<State>>,
        constructors: Vec<FlowConsturctor<State>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
            time_since_tick: Duration::from_millis(0),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        event_loop.exit();
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Id((u32, HashSet<usize>)),
    #[cfg_attr(not(feature = "integration-tests"), allow(dead_code))]
    Exit,
}
impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Id(arg0) => f.debug_tuple("Id").field(arg0).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resumed fires again after a suspend on some platforms
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("gasket-demos");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow!("cannot create a window: {e}")),
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;
            // InitContext only clones the Arcs inside device and queue
            let flow_futures: Vec<_> = constructors
                .into_iter()
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures)
                .await
                .into_iter()
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::Ok((app_state, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (app_state, flows) = match self.async_runtime.block_on(init_future) {
                Ok(initialized) => initialized,
                Err(e) => return self.fail(event_loop, e),
            };
            self.graphics_flows = flows;
            let app_state = self.state.insert(app_state);
            dispatch(
                &mut self.graphics_flows,
                app_state,
                |flow, ctx, state| flow.on_init(ctx, state),
            );
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok((state, flows)) => {
                        if proxy.send_event(FlowEvent::Initialized { state, flows }).is_err() {
                            log::error!("Event loop closed before the demo was initialized");
                        }
                    }
                    Err(e) => {
                        log::error!("{e:#}");
                        wasm_bindgen::throw_str(&format!("{e:#}"));
                    }
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            // Sent by the wasm `spawn_local` in `resumed`
            FlowEvent::Initialized { state, flows } => {
                self.graphics_flows = flows;
                let app_state = self.state.insert(state);
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                dispatch(
                    &mut self.graphics_flows,
                    app_state,
                    |flow, ctx, state| flow.on_init(ctx, state),
                );
                app_state.ctx.window.request_redraw();
            }
            FlowEvent::Id((pick_id, flow_ids)) => {
                if let Some(app_state) = &mut self.state {
                    app_state.ctx.mouse.toggle(pick_id);
                    dispatch(
                        owners(&mut self.graphics_flows, &flow_ids),
                        app_state,
                        |flow, ctx, state| flow.on_click(ctx, state, pick_id),
                    );
                }
            }
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(app_state) = &mut self.state else {
            return;
        };

        if let WindowEvent::CursorMoved { position, .. } = event {
            app_state.ctx.mouse.coords = position;
        }

        dispatch(
            &mut self.graphics_flows,
            app_state,
            |flow, ctx, state| flow.on_window_events(ctx, state, &event),
        );

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => app_state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                self.time_since_tick += dt;

                let rendered = app_state.render(
                    &mut self.graphics_flows,
                    #[cfg(feature = "integration-tests")]
                    &self.async_runtime,
                    #[cfg(feature = "integration-tests")]
                    &self.proxy,
                );
                match rendered {
                    Ok(()) => {
                        let tick = Duration::from_millis(app_state.ctx.tick_duration_millis);
                        if self.time_since_tick >= tick {
                            self.time_since_tick = Duration::from_millis(0);
                            dispatch(
                                &mut self.graphics_flows,
                                app_state,
                                |flow, ctx, state| flow.on_tick(ctx, state),
                            );
                        }
                        dispatch(
                            &mut self.graphics_flows,
                            app_state,
                            |flow, ctx, state| flow.on_update(ctx, state, dt),
                        );
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = app_state.ctx.window.inner_size();
                        app_state.resize(size.width, size.height);
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => match (button, button_state.is_pressed()) {
                (MouseButton::Left, true) => {
                    app_state.ctx.mouse.pressed = MouseButtonState::Left;
                    let picked = draw_to_pick_buffer::<State>(
                        #[cfg(not(target_arch = "wasm32"))]
                        &self.async_runtime,
                        &self.graphics_flows,
                        &app_state.ctx,
                        &app_state.ctx.mouse,
                        #[cfg(target_arch = "wasm32")]
                        self.proxy.clone(),
                    );
                    if let Some((pick_id, flow_ids)) = picked {
                        app_state.ctx.mouse.toggle(pick_id);
                        if flow_ids.len() > 1 {
                            log::warn!("flows {:?} all claim pick id {}", flow_ids, pick_id);
                        }
                        dispatch(
                            owners(&mut self.graphics_flows, &flow_ids),
                            app_state,
                            |flow, ctx, state| flow.on_click(ctx, state, pick_id),
                        );
                    }
                }
                (MouseButton::Right, true) => {
                    app_state.ctx.mouse.pressed = MouseButtonState::Right;
                }
                (_, false) => app_state.ctx.mouse.pressed = MouseButtonState::None,
                _ => (),
            },
            _ => {}
        }
    }
}

/// The flows with an index in `ids`.
fn owners<'f, State>(
    flows: &'f mut [Box<dyn GraphicsFlow<State>>],
    ids: &'f HashSet<usize>,
) -> impl Iterator<Item = &'f mut Box<dyn GraphicsFlow<State>>> {
    flows
        .iter_mut()
        .enumerate()
        .filter(|(idx, _)| ids.contains(idx))
        .map(|(_, flow)| flow)
}

/// Calls `hook` on each flow in order and applies the returned [`Out`].
fn dispatch<'f, State: 'static>(
    flows: impl IntoIterator<Item = &'f mut Box<dyn GraphicsFlow<State>>>,
    app_state: &mut AppState<State>,
    mut hook: impl FnMut(&mut Box<dyn GraphicsFlow<State>>, &mut Context, &mut State) -> Out,
) {
    for flow in flows {
        hook(flow, &mut app_state.ctx, &mut app_state.state).apply(&mut app_state.ctx);
    }
}

/// Installs the logger: `env_logger` natively (`RUST_LOG` sets the level),
/// `console_log` on wasm.
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    if env_logger::try_init().is_err() {
        log::debug!("logger already installed");
    }

    #[cfg(target_arch = "wasm32")]
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }
}

/// Opens a window and runs the given flows until the window is closed.
///
/// Installs the logger unless the caller already did. Setup failures such as
/// a missing graphics adapter are returned as errors.
pub fn run<State: 'static + Default>(constructors: Vec<FlowConsturctor<State>>) -> anyhow::Result<()> {
    init_logger();

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

    let mut app: App<State> = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_can_be_installed_twice() {
        init_logger();
        init_logger();
        assert!(log::max_level() > log::LevelFilter::Off);
    }
}

//! Object picking and selection.
//!
//! Picking renders the pickable geometry of every flow into an offscreen
//! `R32Uint` texture where each fragment holds the id of the object it belongs
//! to, then reads back the texel under the mouse cursor. Only the painter's
//! scene carries ids, and because it arrives sorted back to front the nearest
//! object is written last and ends up in the texture.
//!
//! The pipeline works as follows:
//! 1. Render all painter scenes to the pick texture
//! 2. Read the texel at the mouse cursor (scaled to the padded texture size)
//! 3. Map the pick ID back to the flows that rendered it (see [`Render::map_ids`])
//!
//! Id `0` is the clear value and means that nothing was hit.
//!
//! [`Render::map_ids`]: crate::render::Render

use std::{
    collections::{HashMap, HashSet},
    iter,
};

use anyhow::{Context as _, anyhow};
use winit::dpi::PhysicalPosition;

use crate::{
    context::{Context, MouseState},
    flow::GraphicsFlow,
    pipelines::pick::PICK_FORMAT,
    render::Painter,
};

#[cfg(target_arch = "wasm32")]
use crate::flow::FlowEvent;

/// Id written where no object was drawn.
pub const NO_PICK: u32 = 0;

const BYTES_PER_PIXEL: u32 = std::mem::size_of::<u32>() as u32;
const ROW_ALIGNMENT: u32 = 256;

/// The four bytes of a pick texel, lowest byte in the first channel.
pub fn encode_pick_id(id: u32) -> [u8; 4] {
    id.to_le_bytes()
}

pub fn decode_pick_id(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Rounds both sides up to a multiple of 256 texels, which satisfies the
/// row alignment of texture to buffer copies for any texel size.
pub fn padded_extent(width: u32, height: u32) -> (u32, u32) {
    let pad = |side: u32| side.max(1).div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT;
    (pad(width), pad(height))
}

/// Byte offset of the texel under `coords` in the read-back buffer.
///
/// The scene is rendered stretched over the padded texture, so window
/// coordinates are scaled by `padded / window` first. Returns `None` for
/// cursors outside the window.
pub fn pick_index(
    coords: PhysicalPosition<f64>,
    window: (u32, u32),
    padded: (u32, u32),
) -> Option<usize> {
    let (width, height) = window;
    let (padded_width, padded_height) = padded;
    if width == 0 || height == 0 {
        return None;
    }
    let x = coords.x * f64::from(padded_width) / f64::from(width);
    let y = coords.y * f64::from(padded_height) / f64::from(height);
    if !(0.0..f64::from(padded_width)).contains(&x) || !(0.0..f64::from(padded_height)).contains(&y) {
        return None;
    }
    let texel = y as usize * padded_width as usize + x as usize;
    Some(texel * BYTES_PER_PIXEL as usize)
}

/// Reads the id at `index` from a mapped pick buffer.
pub fn read_pick_id(data: &[u8], index: Option<usize>) -> u32 {
    index
        .and_then(|i| data.get(i..i + BYTES_PER_PIXEL as usize))
        .and_then(|texel| texel.try_into().ok())
        .map(decode_pick_id)
        .unwrap_or(NO_PICK)
}

/// Render all flows to the pick texture and determine which object was clicked.
///
/// # Arguments
///
/// * `async_runtime` blocks on the buffer mapping when not on WASM
/// * `flows` represent all active graphics flows with their renderable objects
/// * `ctx` is the rendering context
/// * `mouse_state` is required for getting the mouse coordinates at the time of picking
/// * `proxy` WASM futures can only resolve using the winit event loop proxy by sending events
///
/// # Returns
///
/// `Some((pick_id, flow_ids))` if an object was picked, or `None` if nothing
/// was hit or the result is delivered via the event loop.
pub fn draw_to_pick_buffer<State>(
    #[cfg(not(target_arch = "wasm32"))] async_runtime: &tokio::runtime::Runtime,
    flows: &[Box<dyn GraphicsFlow<State>>],
    ctx: &Context,
    mouse_state: &MouseState,
    #[cfg(target_arch = "wasm32")] proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
) -> Option<(u32, HashSet<usize>)> {
    let window = (ctx.config.width, ctx.config.height);
    let (width, height) = padded_extent(window.0, window.1);

    let extent3d = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let pick_texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick texture"),
        size: extent3d,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: PICK_FORMAT,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Encoder"),
        });
    let mut translation: HashMap<u32, HashSet<usize>> = HashMap::new();

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &pick_texture.create_view(&wgpu::TextureViewDescriptor::default()),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let mut painters: Vec<Painter> = Vec::new();
        /*
           Flows handle pick IDs internally. We store which flow rendered which
           id so that only the owners of the picked object get invoked.
        */
        flows.iter().enumerate().for_each(|(idx, flow)| {
            let render = flow.on_render();
            render.map_ids(idx, &mut translation);
            render.set_pick_pipelines(&mut painters);
        });

        render_pass.set_pipeline(&ctx.pipelines.pick);
        render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
        for painter in painters.iter().filter(|p| p.amount > 0) {
            render_pass.set_vertex_buffer(0, painter.vertex.slice(..));
            render_pass.draw(0..painter.amount, 0..1);
        }
    }

    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        size: u64::from(BYTES_PER_PIXEL * width * height),
        usage: wgpu::BufferUsages::COPY_DST
                    // this tells wpgu that we want to read this buffer from the cpu
                    | wgpu::BufferUsages::MAP_READ,
        label: Some("Pick output buffer"),
        mapped_at_creation: false,
    });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &pick_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_PIXEL * width),
                rows_per_image: Some(height),
            },
        },
        extent3d,
    );

    ctx.queue.submit(iter::once(encoder.finish()));
    let device = ctx.device.clone();
    let index = pick_index(mouse_state.coords, window, (width, height));

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            match read_texture_buffer(&output_buffer, &device, index).await {
                Ok(id) => {
                    if let Some(flow_ids) = translation.get(&id) {
                        if proxy.send_event(FlowEvent::Id((id, flow_ids.clone()))).is_err() {
                            log::error!("Event loop closed before the pick result arrived");
                        }
                    }
                }
                Err(e) => log::error!("Picking failed: {e:#}"),
            }
        });
        return None;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        return match async_runtime.block_on(read_texture_buffer(&output_buffer, &device, index)) {
            Ok(id) => translation.get(&id).map(|flow_ids| (id, flow_ids.clone())),
            Err(e) => {
                log::error!("Picking failed: {e:#}");
                None
            }
        };
    }
}

async fn read_texture_buffer(
    buffer: &wgpu::Buffer,
    device: &wgpu::Device,
    index: Option<usize>,
) -> anyhow::Result<u32> {
    // NOTE: We have to create the mapping THEN device.poll() before await
    // the future. Otherwise the application will freeze.
    let buffer_slice = buffer.slice(..);
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        // the receiver only disappears if picking was abandoned
        let _ = tx.send(result);
    });
    #[cfg(target_arch = "wasm32")]
    device.poll(wgpu::PollType::Poll)?;
    #[cfg(not(target_arch = "wasm32"))]
    device.poll(wgpu::PollType::Wait)?;
    rx.receive()
        .await
        .ok_or_else(|| anyhow!("pick buffer mapping was cancelled"))?
        .context("pick buffer could not be mapped")?;

    let id = {
        let data = buffer_slice.get_mapped_range();
        read_pick_id(&data, index)
    };
    buffer.unmap();

    log::info!("Selected obj with id {}", id);
    Ok(id)
}

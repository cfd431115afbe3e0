//! Synchronous color-coded point picking.
//!
//! Each pick renders the merged cloud once into a throwaway offscreen
//! target, every point in the color encoding its index, and reads back the
//! single pixel under the cursor. All offscreen resources live only for the
//! duration of one [`PickEngine::pick`] call and are released on every
//! exit path when they go out of scope.

use std::fmt;
use std::sync::mpsc;

use naga_oil::compose::ComposerError;
use wgpu::util::DeviceExt;

use super::color_code;
use crate::camera::CameraBinding;
use crate::geometry::PointCloud;
use crate::gpu::pipeline_helpers::{
    create_point_pipeline, PointPipelineDesc, SPRITE_VERTICES,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, PICKING_SHADER};
use crate::gpu::texture::RenderTarget;

/// Offscreen format; unorm so channel bytes survive exactly.
pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A pick could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// The offscreen target or pipeline state could not be created.
    OffscreenSetup(String),
    /// The rendered pixel could not be read back.
    Readback(String),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffscreenSetup(msg) => {
                write!(f, "offscreen pick target setup failed: {msg}")
            }
            Self::Readback(msg) => write!(f, "pick readback failed: {msg}"),
        }
    }
}

impl std::error::Error for PickError {}

/// Pixel containing the cursor at `(x, y)` in a `width` x `height`
/// viewport, or `None` outside it.
///
/// Window and texture rows both run top-down in wgpu, so no flip is
/// needed.
#[must_use]
pub fn pixel_under_cursor(
    x: f32,
    y: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
        return None;
    }
    let (px, py) = (x.floor() as u32, y.floor() as u32);
    (px < width && py < height).then_some((px, py))
}

/// Decode a read-back pixel, rejecting indices outside `0..point_count`.
#[must_use]
pub fn decode_hit(rgba: [u8; 4], point_count: usize) -> Option<usize> {
    color_code::decode(rgba)
        .map(|index| index as usize)
        .filter(|&index| index < point_count)
}

/// Owns the picking pipeline; everything else is per pick.
pub struct PickEngine {
    pipeline: wgpu::RenderPipeline,
}

impl PickEngine {
    /// Build the picking pipeline against the shared camera layout.
    ///
    /// # Errors
    ///
    /// Returns the composer error if the picking shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, Box<ComposerError>> {
        let shader = composer.compose(device, "Picking Shader", PICKING_SHADER)?;
        let pipeline = create_point_pipeline(
            device,
            PointPipelineDesc {
                label: "Picking",
                shader: &shader,
                vs_entry: "vs_main",
                instance_layout: wgpu::VertexBufferLayout {
                    array_stride: size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                },
                format: PICK_FORMAT,
                depth_compare: wgpu::CompareFunction::Less,
                // Exact colors: never multisampled.
                sample_count: 1,
            },
            &[camera_layout],
        );
        Ok(Self { pipeline })
    }

    /// Index of the point drawn at cursor `(x, y)`, or `None` for NO_HIT.
    ///
    /// Blocks until the offscreen render has completed and the pixel has
    /// been read back. Setup and readback failures are logged and reported
    /// as NO_HIT.
    pub fn pick(
        &self,
        context: &RenderContext,
        camera: &CameraBinding,
        cloud: &PointCloud,
        (x, y): (f32, f32),
    ) -> Option<usize> {
        match self.try_pick(context, camera, cloud, (x, y)) {
            Ok(hit) => hit,
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    fn try_pick(
        &self,
        context: &RenderContext,
        camera: &CameraBinding,
        cloud: &PointCloud,
        (x, y): (f32, f32),
    ) -> Result<Option<usize>, PickError> {
        if cloud.is_empty() {
            return Ok(None);
        }
        let size = context.size();
        let Some(pixel) = pixel_under_cursor(x, y, size.0, size.1) else {
            return Ok(None);
        };
        let max_dim = context.device.limits().max_texture_dimension_2d;
        if size.0 > max_dim || size.1 > max_dim {
            return Err(PickError::OffscreenSetup(format!(
                "viewport {}x{} exceeds texture limit {max_dim}",
                size.0, size.1
            )));
        }

        let device = &context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        // Points past the encodable range are left out of the pick pass.
        let drawn = color_code::pickable_len(cloud.len());
        let positions: Vec<[f32; 3]> = cloud.positions[..drawn]
            .iter()
            .map(|p| p.to_array())
            .collect();
        let instances =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Pick Instances"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let color = RenderTarget::color(
            device,
            "Pick Color Target",
            size,
            PICK_FORMAT,
            1,
            true,
        );
        let depth = RenderTarget::depth(device, "Pick Depth Target", size, 1);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pick Staging Buffer"),
            size: u64::from(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = context.create_encoder("Pick Encoder");
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Pick Render Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &color.view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    color_code::background_clear_color(),
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Discard,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &camera.bind_group, &[]);
            pass.set_vertex_buffer(0, instances.slice(..));
            pass.draw(0..SPRITE_VERTICES, 0..drawn as u32);
        }
        copy_pixel(&mut encoder, &color.texture, &staging, pixel);
        let _ = context.submit(encoder);

        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            let _ = pollster::block_on(device.pop_error_scope());
            return Err(PickError::OffscreenSetup(e.to_string()));
        }
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(PickError::OffscreenSetup(e.to_string()));
        }

        let rgba = read_pixel(device, &staging)?;
        let hit = decode_hit(rgba, cloud.len());
        log::debug!("pick at ({x}, {y}) -> pixel {pixel:?} rgba {rgba:?} -> {hit:?}");
        Ok(hit)
    }
}

/// Copy the pixel at `(px, py)` into the start of `staging`.
fn copy_pixel(
    encoder: &mut wgpu::CommandEncoder,
    texture: &wgpu::Texture,
    staging: &wgpu::Buffer,
    (px, py): (u32, u32),
) {
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: px, y: py, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                rows_per_image: Some(1),
            },
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
}

/// Map `staging` and block until its first four bytes are readable.
fn read_pixel(
    device: &wgpu::Device,
    staging: &wgpu::Buffer,
) -> Result<[u8; 4], PickError> {
    let slice = staging.slice(..4);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| PickError::Readback(e.to_string()))?;
    rx.recv()
        .map_err(|e| PickError::Readback(e.to_string()))?
        .map_err(|e| PickError::Readback(e.to_string()))?;

    let rgba = {
        let data = slice.get_mapped_range();
        [data[0], data[1], data[2], data[3]]
    };
    staging.unmap();
    Ok(rgba)
}

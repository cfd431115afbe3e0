use wgpu::util::DeviceExt;

use crate::camera::core::CameraUniform;
use crate::gpu::pipeline_helpers;

/// GPU copy of the [`CameraUniform`] and its bind group (group 0 of every
/// point pipeline).
pub struct CameraBinding {
    /// Last uploaded uniform contents.
    pub uniform: CameraUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout shared by the point pipelines.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Allocate the buffer and bind group, initialized to `uniform`.
    pub fn new(device: &wgpu::Device, uniform: CameraUniform) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(0)],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload `uniform` to the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, uniform: CameraUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }
}

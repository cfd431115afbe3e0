use glam::Vec3;
use naga_oil::compose::ComposerError;

use super::instance::{highlight_instances, PointInstance};
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{
    create_point_pipeline, PointPipelineDesc, SPRITE_VERTICES,
};
use crate::gpu::shader_composer::{ShaderComposer, POINT_CLOUD_SHADER};

/// Utility renderer drawing picked points as enlarged highlighted sprites
/// on top of the scene.
pub struct PickedPointsRenderer {
    pipeline: wgpu::RenderPipeline,
    instances: TypedBuffer<PointInstance>,
}

impl PickedPointsRenderer {
    /// Build the highlight pipeline for `format` at `sample_count`.
    ///
    /// # Errors
    ///
    /// Returns the composer error if the point shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Result<Self, Box<ComposerError>> {
        let shader =
            composer.compose(device, "Picked Points Shader", POINT_CLOUD_SHADER)?;
        let pipeline = create_point_pipeline(
            device,
            PointPipelineDesc {
                label: "Picked Points",
                shader: &shader,
                vs_entry: "vs_picked",
                instance_layout: PointInstance::LAYOUT,
                format,
                depth_compare: wgpu::CompareFunction::Always,
                sample_count,
            },
            &[camera_layout],
        );
        Ok(Self {
            pipeline,
            instances: TypedBuffer::with_capacity(
                device,
                "Picked Point Instances",
                64,
                wgpu::BufferUsages::VERTEX,
            ),
        })
    }

    /// Replace the highlighted positions.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        positions: &[Vec3],
        color: Vec3,
    ) {
        let _ = self.instances.write(
            device,
            queue,
            &highlight_instances(positions, color),
        );
    }

    /// Number of highlighted points.
    pub fn count(&self) -> usize {
        self.instances.count()
    }
}

impl super::PointRenderer for PickedPointsRenderer {
    fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
    ) {
        if self.instances.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera, &[]);
        render_pass.set_vertex_buffer(0, self.instances.slice());
        render_pass.draw(0..SPRITE_VERTICES, 0..self.instances.count() as u32);
    }
}

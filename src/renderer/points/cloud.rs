use glam::Vec3;
use naga_oil::compose::ComposerError;

use super::instance::{cloud_instances, validate, PointInstance};
use crate::error::RendererError;
use crate::geometry::PointCloud;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{
    create_point_pipeline, PointPipelineDesc, SPRITE_VERTICES,
};
use crate::gpu::shader_composer::{ShaderComposer, POINT_CLOUD_SHADER};

/// Draws the merged point cloud as screen-space sprites.
pub struct PointCloudRenderer {
    pipeline: wgpu::RenderPipeline,
    instances: TypedBuffer<PointInstance>,
    /// Set once a cloud has been accepted.
    attached: bool,
}

impl PointCloudRenderer {
    /// Build the visible-pass pipeline for `format` at `sample_count`.
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
            composer.compose(device, "Point Cloud Shader", POINT_CLOUD_SHADER)?;
        let pipeline = create_point_pipeline(
            device,
            PointPipelineDesc {
                label: "Point Cloud",
                shader: &shader,
                vs_entry: "vs_main",
                instance_layout: PointInstance::LAYOUT,
                format,
                depth_compare: wgpu::CompareFunction::Less,
                sample_count,
            },
            &[camera_layout],
        );
        Ok(Self {
            pipeline,
            instances: TypedBuffer::with_capacity(
                device,
                "Point Cloud Instances",
                1024,
                wgpu::BufferUsages::VERTEX,
            ),
            attached: false,
        })
    }

    /// Take `cloud` as the geometry to draw.
    ///
    /// # Errors
    ///
    /// Refuses clouds [`validate`] rejects; the previous geometry stays.
    pub fn accept(&mut self, cloud: &PointCloud) -> Result<(), RendererError> {
        validate(cloud)?;
        self.attached = true;
        Ok(())
    }

    /// Re-upload `cloud` after the editor changed it.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cloud: &PointCloud,
        fallback_color: Vec3,
    ) {
        let _ = self.instances.write(
            device,
            queue,
            &cloud_instances(cloud, fallback_color),
        );
    }
}

impl super::PointRenderer for PointCloudRenderer {
    fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
    ) {
        if !self.attached || self.instances.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera, &[]);
        render_pass.set_vertex_buffer(0, self.instances.slice());
        render_pass.draw(0..SPRITE_VERTICES, 0..self.instances.count() as u32);
    }
}

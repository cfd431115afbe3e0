//! GPU side of the engine: context, camera, renderers and frame targets.

use glam::Vec3;

use crate::camera::{CameraBinding, CameraController, CameraUniform};
use crate::editor::EditorHost;
use crate::error::{CloudError, RendererError};
use crate::geometry::{Aabb, PointCloud};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::options::{DisplayOptions, Options};
use crate::renderer::{PickedPointsRenderer, PointCloudRenderer, PointRenderer};

/// Multisampled color (when MSAA is on) and depth attachments of the
/// visible pass.
struct FrameTargets {
    msaa: Option<RenderTarget>,
    depth: RenderTarget,
}

impl FrameTargets {
    fn new(context: &RenderContext, sample_count: u32) -> Self {
        let size = context.size();
        let msaa = (sample_count > 1).then(|| {
            RenderTarget::color(
                &context.device,
                "MSAA Color Target",
                size,
                context.format(),
                sample_count,
                false,
            )
        });
        let depth = RenderTarget::depth(
            &context.device,
            "Frame Depth Target",
            size,
            sample_count,
        );
        Self { msaa, depth }
    }
}

/// Everything the editor's [`EditorHost`] calls reach.
pub struct RenderStage {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    /// Orbit and free-fly camera.
    pub camera: CameraController,
    /// GPU camera uniform shared by all point passes.
    pub camera_binding: CameraBinding,
    /// Merged cloud renderer.
    pub cloud_renderer: PointCloudRenderer,
    /// Picked-point highlight renderer.
    pub picked_renderer: PickedPointsRenderer,
    /// Point sizes and colors.
    pub display: DisplayOptions,
    targets: FrameTargets,
}

impl RenderStage {
    /// Build pipelines and frame targets for `context`.
    ///
    /// MSAA falls back to a single sample when the surface format does not
    /// support the requested count.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Shader`] if a point shader fails to compose.
    pub fn new(
        context: RenderContext,
        composer: &mut ShaderComposer,
        options: &Options,
    ) -> Result<Self, CloudError> {
        let mut sample_count = options.display.sample_count();
        if !context.supports_sample_count(context.format(), sample_count) {
            log::warn!(
                "{sample_count}x MSAA unsupported for {:?}, disabling",
                context.format()
            );
            sample_count = 1;
        }

        let camera =
            CameraController::new(options.camera.clone(), context.size());
        let camera_binding =
            CameraBinding::new(&context.device, CameraUniform::new());
        let cloud_renderer = PointCloudRenderer::new(
            &context.device,
            composer,
            &camera_binding.layout,
            context.format(),
            sample_count,
        )?;
        let picked_renderer = PickedPointsRenderer::new(
            &context.device,
            composer,
            &camera_binding.layout,
            context.format(),
            sample_count,
        )?;
        let targets = FrameTargets::new(&context, sample_count);

        let mut stage = Self {
            context,
            camera,
            camera_binding,
            cloud_renderer,
            picked_renderer,
            display: options.display.clone(),
            targets,
        };
        stage.upload_camera();
        Ok(stage)
    }

    /// Push the current camera state and point sizes to the GPU.
    pub fn upload_camera(&mut self) {
        let mut uniform = self.camera_binding.uniform;
        self.camera.fill_uniform(&mut uniform);
        uniform.point_size = self.display.point_size;
        uniform.picked_point_size = self.display.picked_point_size;
        self.camera_binding.update(&self.context.queue, uniform);
    }

    /// Replace the highlighted picked points.
    pub fn set_picked(&mut self, positions: &[Vec3]) {
        self.picked_renderer.update(
            &self.context.device,
            &self.context.queue,
            positions,
            Vec3::from_array(self.display.picked_color),
        );
    }

    /// Resize the surface, camera and frame targets.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.camera.resize(width, height);
        let sample_count = self.targets.depth.texture.sample_count();
        self.targets = FrameTargets::new(&self.context, sample_count);
    }

    /// Draw the cloud and the picked highlights, then present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.upload_camera();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b] = self.display.background.map(f64::from);
        let (target, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self.context.create_encoder("Frame Encoder");
        {
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Point Cloud Render Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: target,
                            resolve_target,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r,
                                    g,
                                    b,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.targets.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Discard,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            let renderers: [&dyn PointRenderer; 2] =
                [&self.cloud_renderer, &self.picked_renderer];
            for renderer in renderers {
                renderer.draw(&mut render_pass, &self.camera_binding.bind_group);
            }
        }
        let _ = self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

impl EditorHost for RenderStage {
    fn is_initialized(&self) -> bool {
        let (width, height) = self.context.size();
        width > 0 && height > 0
    }

    fn register_renderer(
        &mut self,
        cloud: &PointCloud,
    ) -> Result<(), RendererError> {
        self.cloud_renderer.accept(cloud)
    }

    fn geometry_changed(&mut self, cloud: &PointCloud) {
        self.cloud_renderer.update(
            &self.context.device,
            &self.context.queue,
            cloud,
            Vec3::from_array(self.display.default_point_color),
        );
    }

    fn fit_view(&mut self, bounds: Aabb) {
        self.camera.fit_in_geometry(bounds);
        self.upload_camera();
    }
}

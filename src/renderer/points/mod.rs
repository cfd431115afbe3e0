//! Point-sprite renderers for the visible pass.

/// Merged cloud renderer.
pub mod cloud;
/// Per-point instance data and geometry validation.
pub mod instance;
/// Picked-point highlight renderer.
pub mod picked;

pub use cloud::PointCloudRenderer;
pub use instance::PointInstance;
pub use picked::PickedPointsRenderer;

/// Anything that draws into the visible pass with the shared camera.
pub trait PointRenderer {
    /// Record draw calls into `render_pass`.
    fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
    );
}

use glam::Vec3;

use crate::error::RendererError;
use crate::geometry::{Column, PointCloud};

/// Per-instance data of a point sprite.
/// Must match `PointInput` in `points/point_cloud.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    /// World-space center.
    pub position: [f32; 3],
    /// Linear RGB.
    pub color: [f32; 3],
}

impl PointInstance {
    /// Vertex buffer layout, one element per instance.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> =
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        };
}

/// Check that a renderer can draw `cloud`.
///
/// # Errors
///
/// [`RendererError::EmptyGeometry`] for a cloud without points and
/// [`RendererError::ColumnLength`] when an optional column is present with
/// the wrong length.
pub fn validate(cloud: &PointCloud) -> Result<(), RendererError> {
    if cloud.is_empty() {
        return Err(RendererError::EmptyGeometry);
    }
    match cloud.inconsistent_column() {
        Some((column, found)) => Err(RendererError::ColumnLength {
            column,
            expected: cloud.len(),
            found,
        }),
        None => Ok(()),
    }
}

/// One instance per point, colored from the color column or `fallback`.
#[must_use]
pub fn cloud_instances(cloud: &PointCloud, fallback: Vec3) -> Vec<PointInstance> {
    let colored = cloud.has_colors();
    cloud
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| PointInstance {
            position: p.to_array(),
            color: if colored { cloud.colors[i] } else { fallback }.to_array(),
        })
        .collect()
}

/// Instances at `positions`, all in `color`.
#[must_use]
pub fn highlight_instances(positions: &[Vec3], color: Vec3) -> Vec<PointInstance> {
    positions
        .iter()
        .map(|p| PointInstance {
            position: p.to_array(),
            color: color.to_array(),
        })
        .collect()
}

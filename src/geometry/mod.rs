//! Geometry types accepted by the editor.
//!
//! The editor only merges point clouds; other geometry kinds exist so that
//! callers can hand over whatever they hold and get a typed rejection.

mod point_cloud;

use glam::Vec3;

pub use point_cloud::{Column, ColumnPresence, PointCloud};

/// Kind of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    /// No type information.
    Unspecified,
    /// A point cloud.
    PointCloud,
    /// A triangle mesh.
    TriangleMesh,
    /// A set of line segments.
    LineSet,
}

/// Geometry handed to [`PointCloudEditor::add_geometry`].
///
/// [`PointCloudEditor::add_geometry`]: crate::editor::PointCloudEditor::add_geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A point cloud, the only kind the editor merges.
    PointCloud(PointCloud),
    /// Any other geometry, carried by type only.
    Other(GeometryType),
}

impl Geometry {
    /// Type of this geometry.
    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::PointCloud(_) => GeometryType::PointCloud,
            Self::Other(kind) => *kind,
        }
    }
}

impl From<PointCloud> for Geometry {
    fn from(cloud: PointCloud) -> Self {
        Self::PointCloud(cloud)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of `points`, `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere through the box corners.
    #[must_use]
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_points() {
        let bb = Aabb::from_points(&[
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
        ])
        .unwrap();
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bb.max, Vec3::new(3.0, 0.0, 2.0));
        assert_eq!(bb.center(), Vec3::new(1.0, -1.0, 1.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn geometry_type_of_variants() {
        let cloud: Geometry = PointCloud::new("a").into();
        assert_eq!(cloud.geometry_type(), GeometryType::PointCloud);
        assert_eq!(
            Geometry::Other(GeometryType::Unspecified).geometry_type(),
            GeometryType::Unspecified
        );
    }
}

//! Rendering subsystems for point clouds.
//!
//! Contains the merged-cloud renderer and the picked-point highlight
//! renderer of the visible pass. The offscreen picking pass lives in
//! [`crate::picking`].

pub mod points;

pub use points::{PickedPointsRenderer, PointCloudRenderer, PointRenderer};

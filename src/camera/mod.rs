//! Camera system for 3D point-cloud viewing.
//!
//! Provides an orbital camera with rotation, panning, zoom, free-fly look,
//! fit-to-bounds, and the GPU uniform shared by every point pass.

/// GPU uniform buffer and bind group.
pub mod binding;
/// Orbit and free-fly camera controller.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use binding::CameraBinding;
pub use controller::CameraController;
pub use self::core::{Camera, CameraUniform};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Minimum far clipping plane distance; grown to fit the loaded cloud.
    pub zfar: f32,
    /// Orbit rotation, radians per pixel of drag.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Scroll zoom sensitivity multiplier.
    pub zoom_speed: f32,
    /// Free-fly look, radians per pixel of mouse motion.
    pub look_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.01,
            zfar: 1000.0,
            rotate_speed: 0.01,
            pan_speed: 1.0,
            zoom_speed: 0.1,
            look_speed: 0.002,
        }
    }
}

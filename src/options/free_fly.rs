use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Fixed step magnitudes of free-fly keyboard movement.
pub struct FreeFlyOptions {
    /// Zoom step per forward/backward key event.
    pub forward_step: f32,
    /// Lateral translation per left/right key event, in pixels.
    pub lateral_step: f32,
}

impl Default for FreeFlyOptions {
    fn default() -> Self {
        Self {
            forward_step: 0.3,
            lateral_step: 1.8,
        }
    }
}

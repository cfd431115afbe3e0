use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Point sizes, colors and anti-aliasing of the visible pass.
pub struct DisplayOptions {
    /// Sprite size of a regular point, in pixels.
    pub point_size: f32,
    /// Sprite size of a picked point, in pixels.
    pub picked_point_size: f32,
    /// Clear color of the visible pass.
    pub background: [f32; 3],
    /// Color of points without a color column.
    pub default_point_color: [f32; 3],
    /// Highlight color of picked points.
    pub picked_color: [f32; 3],
    /// MSAA samples for the visible pass (1 or 4). Picking never uses MSAA.
    pub msaa_samples: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            point_size: 3.0,
            picked_point_size: 9.0,
            background: [1.0, 1.0, 1.0],
            default_point_color: [0.2, 0.2, 0.2],
            picked_color: [1.0, 0.0, 1.0],
            msaa_samples: 4,
        }
    }
}

/// Smallest sprite size.
pub const MIN_POINT_SIZE: f32 = 1.0;
/// Largest sprite size.
pub const MAX_POINT_SIZE: f32 = 25.0;

impl DisplayOptions {
    /// Grow or shrink the regular point size, clamped to
    /// [`MIN_POINT_SIZE`]..=[`MAX_POINT_SIZE`].
    pub fn adjust_point_size(&mut self, delta: f32) {
        self.point_size =
            (self.point_size + delta).clamp(MIN_POINT_SIZE, MAX_POINT_SIZE);
    }

    /// `msaa_samples` normalized to a count wgpu accepts everywhere.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        if self.msaa_samples >= 4 {
            4
        } else {
            1
        }
    }
}

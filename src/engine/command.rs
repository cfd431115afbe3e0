//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation triggered by a key press or mouse gesture is
//! represented as an `EditorCommand`. The input chain produces commands and
//! the host passes them to
//! [`EditorEngine::execute`](super::EditorEngine::execute).

use glam::Vec2;

/// A discrete editor or camera action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    /// Pick the point under the cursor and append it to the picked set.
    PickPoint {
        /// Cursor x in physical pixels.
        x: f32,
        /// Cursor y in physical pixels.
        y: f32,
    },
    /// Pop the most recently picked index.
    UnpickLast,
    /// Enter or leave free-fly mode.
    SetFreeFly {
        /// `true` when entering free-fly.
        enabled: bool,
    },
    /// Step the zoom factor (free-fly forward/backward).
    Scale {
        /// Negative moves closer.
        step: f32,
    },
    /// Shift the view laterally, in pixels (free-fly left/right).
    Translate {
        /// Horizontal shift.
        dx: f32,
        /// Vertical shift.
        dy: f32,
    },
    /// Orbit the camera by a drag delta.
    RotateCamera {
        /// Screen-space delta in pixels.
        delta: Vec2,
    },
    /// Pan the camera by a drag delta.
    PanCamera {
        /// Screen-space delta in pixels.
        delta: Vec2,
    },
    /// Free-fly mouse look.
    Look {
        /// Raw mouse motion.
        delta: Vec2,
    },
    /// Scroll zoom.
    Zoom {
        /// Positive zooms in.
        delta: f32,
    },
    /// Fit the camera to the merged cloud again.
    ResetView,
    /// Grow or shrink point sprites.
    AdjustPointSize {
        /// Pixels added to the sprite size.
        delta: f32,
    },
}

impl EditorCommand {
    /// Whether executing this command changes what is on screen.
    #[must_use]
    pub fn requires_redraw(&self) -> bool {
        !matches!(self, Self::SetFreeFly { .. })
    }
}

use serde::{Deserialize, Serialize};

/// Actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Switch between normal and free-fly mode (on release).
    ToggleFreeFly,
    /// Free-fly: zoom toward the view direction.
    MoveForward,
    /// Free-fly: zoom away from the view direction.
    MoveBackward,
    /// Free-fly: translate left.
    MoveLeft,
    /// Free-fly: translate right.
    MoveRight,
    /// Fit the camera to the loaded cloud again.
    ResetView,
    /// Grow the point sprites.
    IncreasePointSize,
    /// Shrink the point sprites.
    DecreasePointSize,
}

impl KeyAction {
    /// Whether this is one of the four free-fly movement actions.
    #[must_use]
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Self::MoveForward
                | Self::MoveBackward
                | Self::MoveLeft
                | Self::MoveRight
        )
    }
}

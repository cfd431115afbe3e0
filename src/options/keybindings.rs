use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format: `"KeyW"`,
/// `"Equal"`, `"Escape"`, etc.
pub struct KeybindingOptions {
    /// Toggles free-fly mode on release.
    pub toggle_free_fly: String,
    /// Free-fly forward.
    pub move_forward: String,
    /// Free-fly left.
    pub move_left: String,
    /// Free-fly backward.
    pub move_backward: String,
    /// Free-fly right.
    pub move_right: String,
    /// Refit the view.
    pub reset_view: String,
    /// Grow point sprites.
    pub increase_point_size: String,
    /// Shrink point sprites.
    pub decrease_point_size: String,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        Self {
            toggle_free_fly: "KeyI".into(),
            move_forward: "KeyW".into(),
            move_left: "KeyA".into(),
            move_backward: "KeyS".into(),
            move_right: "KeyD".into(),
            reset_view: "KeyR".into(),
            increase_point_size: "Equal".into(),
            decrease_point_size: "Minus".into(),
        }
    }
}

impl KeybindingOptions {
    fn pairs(&self) -> [(&str, KeyAction); 8] {
        [
            (self.toggle_free_fly.as_str(), KeyAction::ToggleFreeFly),
            (self.move_forward.as_str(), KeyAction::MoveForward),
            (self.move_left.as_str(), KeyAction::MoveLeft),
            (self.move_backward.as_str(), KeyAction::MoveBackward),
            (self.move_right.as_str(), KeyAction::MoveRight),
            (self.reset_view.as_str(), KeyAction::ResetView),
            (self.increase_point_size.as_str(), KeyAction::IncreasePointSize),
            (self.decrease_point_size.as_str(), KeyAction::DecreasePointSize),
        ]
    }

    /// Look up the action for a key string. The first binding wins when
    /// two actions share a key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.pairs()
            .into_iter()
            .find_map(|(bound, action)| (bound == key).then_some(action))
    }
}

/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`EditorCommand`](crate::EditorCommand) values.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Raw relative mouse motion, delivered even while the cursor is
    /// grabbed.
    MouseMotion {
        /// Horizontal motion.
        dx: f32,
        /// Vertical motion.
        dy: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
        /// Whether the control key is held.
        ctrl: bool,
    },
    /// Physical key changed state.
    Key {
        /// `winit::keyboard::KeyCode` debug name, e.g. `"KeyW"`.
        code: String,
        /// Press, auto-repeat or release.
        state: KeyState,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// First press.
    Pressed,
    /// Auto-repeat while held.
    Repeated,
    /// Release.
    Released,
}

impl KeyState {
    /// Pressed or repeated.
    #[must_use]
    pub fn is_down(self) -> bool {
        !matches!(self, Self::Released)
    }
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

#[cfg(feature = "viewer")]
impl InputEvent {
    /// Translate a winit keyboard event. Keys without a physical code are
    /// dropped.
    #[must_use]
    pub fn from_key_event(event: &winit::event::KeyEvent) -> Option<Self> {
        let winit::keyboard::PhysicalKey::Code(code) = event.physical_key
        else {
            return None;
        };
        let state = match (event.state, event.repeat) {
            (winit::event::ElementState::Released, _) => KeyState::Released,
            (winit::event::ElementState::Pressed, true) => KeyState::Repeated,
            (winit::event::ElementState::Pressed, false) => KeyState::Pressed,
        };
        Some(Self::Key {
            code: format!("{code:?}"),
            state,
        })
    }
}

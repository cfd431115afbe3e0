//! Input-handling strategies.
//!
//! Each handler sees an event after the ones before it in the chain have
//! passed on it. The default chain is picking, mode toggle, free-fly,
//! normal-mode movement filter and finally navigation, the base-window
//! behaviour every unhandled event falls through to.

use glam::Vec2;

use super::event::{InputEvent, KeyState, MouseButton};
use super::keyboard::KeyAction;
use crate::engine::command::EditorCommand;
use crate::options::{FreeFlyOptions, KeybindingOptions};

/// Keyboard interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Orbit navigation; free-fly movement keys are ignored.
    #[default]
    Normal,
    /// Movement keys fly the camera and the mouse looks around.
    FreeFly,
}

/// Per-window input state shared by the handlers.
#[derive(Debug, Clone, Default)]
pub struct InputSession {
    /// Active keyboard mode.
    pub mode: InteractionMode,
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Last cursor position in physical pixels.
    pub cursor: Vec2,
    /// Cursor movement of the current `CursorMoved` event.
    pub cursor_delta: Vec2,
    /// Left button held.
    pub left_pressed: bool,
}

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// Not for this handler; offer it to the next one.
    Pass,
    /// Handled here, producing at most one command. The chain stops.
    Handled(Option<EditorCommand>),
}

/// One strategy in the input chain.
pub trait InputHandler {
    /// Inspect `event` and either handle it or pass it on.
    fn handle(&mut self, event: &InputEvent, session: &mut InputSession)
        -> Flow;
}

/// Ctrl + right release picks, Shift + right release unpicks, in any mode.
#[derive(Debug, Default)]
pub struct PickingHandler;

impl InputHandler for PickingHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut InputSession,
    ) -> Flow {
        let InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: false,
        } = event
        else {
            return Flow::Pass;
        };
        if session.ctrl {
            Flow::Handled(Some(EditorCommand::PickPoint {
                x: session.cursor.x,
                y: session.cursor.y,
            }))
        } else if session.shift {
            Flow::Handled(Some(EditorCommand::UnpickLast))
        } else {
            Flow::Pass
        }
    }
}

/// Flips [`InteractionMode`] when the toggle key is released.
#[derive(Debug)]
pub struct ModeToggleHandler {
    key: String,
}

impl ModeToggleHandler {
    /// Toggle on `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl InputHandler for ModeToggleHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut InputSession,
    ) -> Flow {
        let InputEvent::Key { code, state } = event else {
            return Flow::Pass;
        };
        if *code != self.key {
            return Flow::Pass;
        }
        if *state != KeyState::Released {
            return Flow::Handled(None);
        }
        session.mode = match session.mode {
            InteractionMode::Normal => InteractionMode::FreeFly,
            InteractionMode::FreeFly => InteractionMode::Normal,
        };
        log::info!("interaction mode: {:?}", session.mode);
        Flow::Handled(Some(EditorCommand::SetFreeFly {
            enabled: session.mode == InteractionMode::FreeFly,
        }))
    }
}

/// Free-fly movement keys and mouse look. Inactive in normal mode.
#[derive(Debug)]
pub struct FreeFlyHandler {
    keys: KeybindingOptions,
    steps: FreeFlyOptions,
}

impl FreeFlyHandler {
    /// Handler for the given bindings and step magnitudes.
    #[must_use]
    pub fn new(keys: KeybindingOptions, steps: FreeFlyOptions) -> Self {
        Self { keys, steps }
    }

    fn movement(&self, action: KeyAction) -> Option<EditorCommand> {
        let FreeFlyOptions {
            forward_step,
            lateral_step,
        } = self.steps;
        match action {
            KeyAction::MoveForward => {
                Some(EditorCommand::Scale { step: -forward_step })
            }
            KeyAction::MoveBackward => {
                Some(EditorCommand::Scale { step: forward_step })
            }
            KeyAction::MoveLeft => Some(EditorCommand::Translate {
                dx: lateral_step,
                dy: 0.0,
            }),
            KeyAction::MoveRight => Some(EditorCommand::Translate {
                dx: -lateral_step,
                dy: 0.0,
            }),
            _ => None,
        }
    }
}

impl InputHandler for FreeFlyHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut InputSession,
    ) -> Flow {
        if session.mode != InteractionMode::FreeFly {
            return Flow::Pass;
        }
        match event {
            InputEvent::Key { code, state } => {
                match self.keys.lookup(code).filter(|a| a.is_movement()) {
                    Some(action) if state.is_down() => {
                        Flow::Handled(self.movement(action))
                    }
                    Some(_) => Flow::Handled(None),
                    None => Flow::Pass,
                }
            }
            InputEvent::MouseMotion { dx, dy } => {
                Flow::Handled(Some(EditorCommand::Look {
                    delta: Vec2::new(*dx, *dy),
                }))
            }
            // The cursor is grabbed; no orbit dragging while flying.
            InputEvent::CursorMoved { .. } => Flow::Handled(None),
            _ => Flow::Pass,
        }
    }
}

/// Swallows the movement keys in normal mode.
#[derive(Debug)]
pub struct NormalKeyFilter {
    keys: KeybindingOptions,
}

impl NormalKeyFilter {
    /// Filter for the movement keys in `keys`.
    #[must_use]
    pub fn new(keys: KeybindingOptions) -> Self {
        Self { keys }
    }
}

impl InputHandler for NormalKeyFilter {
    fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut InputSession,
    ) -> Flow {
        match event {
            InputEvent::Key { code, .. }
                if session.mode == InteractionMode::Normal
                    && self.keys.lookup(code).is_some_and(KeyAction::is_movement) =>
            {
                Flow::Handled(None)
            }
            _ => Flow::Pass,
        }
    }
}

/// Pixels added or removed per point-size key press.
pub const POINT_SIZE_STEP: f32 = 1.0;

/// Base-window navigation: orbit and pan drags, scroll zoom, view reset
/// and point-size keys. Ends the chain.
#[derive(Debug)]
pub struct NavigationHandler {
    keys: KeybindingOptions,
}

impl NavigationHandler {
    /// Navigation with the base-window keys in `keys`.
    #[must_use]
    pub fn new(keys: KeybindingOptions) -> Self {
        Self { keys }
    }
}

impl InputHandler for NavigationHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        session: &mut InputSession,
    ) -> Flow {
        let command = match event {
            InputEvent::CursorMoved { .. } if session.left_pressed => {
                let delta = session.cursor_delta;
                Some(if session.shift {
                    EditorCommand::PanCamera { delta }
                } else {
                    EditorCommand::RotateCamera { delta }
                })
            }
            InputEvent::Scroll { delta } => {
                Some(EditorCommand::Zoom { delta: *delta })
            }
            InputEvent::Key { code, state } if state.is_down() => {
                match self.keys.lookup(code) {
                    Some(KeyAction::ResetView) => Some(EditorCommand::ResetView),
                    Some(KeyAction::IncreasePointSize) => {
                        Some(EditorCommand::AdjustPointSize {
                            delta: POINT_SIZE_STEP,
                        })
                    }
                    Some(KeyAction::DecreasePointSize) => {
                        Some(EditorCommand::AdjustPointSize {
                            delta: -POINT_SIZE_STEP,
                        })
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        Flow::Handled(command)
    }
}

//! Converts raw platform events into editor commands.
//!
//! The `InputProcessor` owns the per-window [`InputSession`] (mode,
//! modifiers, cursor tracking) and the chain of [`InputHandler`]s. It is the
//! only thing that sits between raw window events and the engine's
//! [`execute`](crate::EditorEngine::execute) method.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::handlers::{
    Flow, FreeFlyHandler, InputHandler, InputSession, InteractionMode,
    ModeToggleHandler, NavigationHandler, NormalKeyFilter, PickingHandler,
};
use crate::engine::command::EditorCommand;
use crate::options::Options;

/// Converts raw window events into [`EditorCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    session: InputSession,
    handlers: Vec<Box<dyn InputHandler>>,
}

impl InputProcessor {
    /// Default chain built from `options`: picking, mode toggle, free-fly,
    /// normal-mode filter, navigation.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let keys = &options.keybindings;
        Self::with_handlers(vec![
            Box::new(PickingHandler),
            Box::new(ModeToggleHandler::new(keys.toggle_free_fly.clone())),
            Box::new(FreeFlyHandler::new(
                keys.clone(),
                options.free_fly.clone(),
            )),
            Box::new(NormalKeyFilter::new(keys.clone())),
            Box::new(NavigationHandler::new(keys.clone())),
        ])
    }

    /// Processor running a custom handler chain, first handler first.
    #[must_use]
    pub fn with_handlers(handlers: Vec<Box<dyn InputHandler>>) -> Self {
        Self {
            session: InputSession::default(),
            handlers,
        }
    }

    /// Active keyboard mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.session.mode
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<EditorCommand> {
        self.track(&event);
        for handler in &mut self.handlers {
            if let Flow::Handled(command) =
                handler.handle(&event, &mut self.session)
            {
                return command;
            }
        }
        None
    }

    /// Session bookkeeping every handler relies on.
    fn track(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::CursorMoved { x, y } => {
                let pos = Vec2::new(x, y);
                self.session.cursor_delta = pos - self.session.cursor;
                self.session.cursor = pos;
            }
            InputEvent::ModifiersChanged { shift, ctrl } => {
                self.session.shift = shift;
                self.session.ctrl = ctrl;
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                self.session.left_pressed = pressed;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyState;

    fn processor() -> InputProcessor {
        InputProcessor::new(&Options::default())
    }

    fn key(code: &str, state: KeyState) -> InputEvent {
        InputEvent::Key {
            code: code.into(),
            state,
        }
    }

    fn tap(p: &mut InputProcessor, code: &str) -> Option<EditorCommand> {
        let _ = p.handle_event(key(code, KeyState::Pressed));
        p.handle_event(key(code, KeyState::Released))
    }

    #[test]
    fn toggle_fires_on_release_only() {
        let mut p = processor();
        assert_eq!(p.handle_event(key("KeyI", KeyState::Pressed)), None);
        assert_eq!(p.mode(), InteractionMode::Normal);
        assert_eq!(
            p.handle_event(key("KeyI", KeyState::Released)),
            Some(EditorCommand::SetFreeFly { enabled: true })
        );
        assert_eq!(p.mode(), InteractionMode::FreeFly);
        assert_eq!(
            tap(&mut p, "KeyI"),
            Some(EditorCommand::SetFreeFly { enabled: false })
        );
        assert_eq!(p.mode(), InteractionMode::Normal);
    }

    #[test]
    fn free_fly_movement_keys() {
        let mut p = processor();
        let _ = tap(&mut p, "KeyI");
        assert_eq!(
            p.handle_event(key("KeyW", KeyState::Pressed)),
            Some(EditorCommand::Scale { step: -0.3 })
        );
        assert_eq!(
            p.handle_event(key("KeyW", KeyState::Repeated)),
            Some(EditorCommand::Scale { step: -0.3 })
        );
        assert_eq!(p.handle_event(key("KeyW", KeyState::Released)), None);
        assert_eq!(
            p.handle_event(key("KeyS", KeyState::Pressed)),
            Some(EditorCommand::Scale { step: 0.3 })
        );
        assert_eq!(
            p.handle_event(key("KeyA", KeyState::Pressed)),
            Some(EditorCommand::Translate { dx: 1.8, dy: 0.0 })
        );
        assert_eq!(
            p.handle_event(key("KeyD", KeyState::Repeated)),
            Some(EditorCommand::Translate { dx: -1.8, dy: 0.0 })
        );
    }

    #[test]
    fn normal_mode_swallows_movement_keys() {
        let mut p = processor();
        for code in ["KeyW", "KeyA", "KeyS", "KeyD"] {
            assert_eq!(p.handle_event(key(code, KeyState::Pressed)), None);
        }
    }

    #[test]
    fn other_keys_fall_through_in_both_modes() {
        let mut p = processor();
        assert_eq!(
            p.handle_event(key("KeyR", KeyState::Pressed)),
            Some(EditorCommand::ResetView)
        );
        let _ = tap(&mut p, "KeyI");
        assert_eq!(
            p.handle_event(key("Equal", KeyState::Pressed)),
            Some(EditorCommand::AdjustPointSize { delta: 1.0 })
        );
        assert_eq!(p.handle_event(key("KeyZ", KeyState::Pressed)), None);
    }

    #[test]
    fn ctrl_right_release_picks_at_cursor() {
        let mut p = processor();
        let _ = p.handle_event(InputEvent::CursorMoved { x: 12.0, y: 34.0 });
        let _ = p.handle_event(InputEvent::ModifiersChanged {
            shift: false,
            ctrl: true,
        });
        let right = |pressed| InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed,
        };
        assert_eq!(p.handle_event(right(true)), None);
        assert_eq!(
            p.handle_event(right(false)),
            Some(EditorCommand::PickPoint { x: 12.0, y: 34.0 })
        );
    }

    #[test]
    fn shift_right_release_unpicks_even_in_free_fly() {
        let mut p = processor();
        let _ = tap(&mut p, "KeyI");
        let _ = p.handle_event(InputEvent::ModifiersChanged {
            shift: true,
            ctrl: false,
        });
        assert_eq!(
            p.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: false,
            }),
            Some(EditorCommand::UnpickLast)
        );
    }

    #[test]
    fn plain_right_click_does_nothing() {
        let mut p = processor();
        assert_eq!(
            p.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: false,
            }),
            None
        );
    }

    #[test]
    fn left_drag_orbits_and_shift_drag_pans() {
        let mut p = processor();
        let _ = p.handle_event(InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        assert_eq!(
            p.handle_event(InputEvent::CursorMoved { x: 11.0, y: 10.0 }),
            None
        );
        let _ = p.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            p.handle_event(InputEvent::CursorMoved { x: 15.0, y: 12.0 }),
            Some(EditorCommand::RotateCamera {
                delta: Vec2::new(4.0, 2.0)
            })
        );
        let _ = p.handle_event(InputEvent::ModifiersChanged {
            shift: true,
            ctrl: false,
        });
        assert_eq!(
            p.handle_event(InputEvent::CursorMoved { x: 16.0, y: 12.0 }),
            Some(EditorCommand::PanCamera {
                delta: Vec2::new(1.0, 0.0)
            })
        );
    }

    #[test]
    fn mouse_motion_looks_only_in_free_fly() {
        let mut p = processor();
        let motion = InputEvent::MouseMotion { dx: 3.0, dy: -1.0 };
        assert_eq!(p.handle_event(motion.clone()), None);
        let _ = tap(&mut p, "KeyI");
        assert_eq!(
            p.handle_event(motion),
            Some(EditorCommand::Look {
                delta: Vec2::new(3.0, -1.0)
            })
        );
    }

    #[test]
    fn scroll_zooms() {
        let mut p = processor();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.0 }),
            Some(EditorCommand::Zoom { delta: 1.0 })
        );
    }

    #[test]
    fn custom_chain_runs_in_order() {
        let mut p = InputProcessor::with_handlers(vec![Box::new(
            PickingHandler,
        )]);
        let _ = p.handle_event(InputEvent::ModifiersChanged {
            shift: true,
            ctrl: false,
        });
        assert_eq!(p.handle_event(InputEvent::Scroll { delta: 1.0 }), None);
        assert_eq!(
            p.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: false,
            }),
            Some(EditorCommand::UnpickLast)
        );
    }
}

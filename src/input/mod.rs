//! Input handling: event types, the handler chain, and the input processor
//! that converts raw window events into editor commands.

/// Platform-agnostic input events.
pub mod event;
/// Input-handling strategies composed into the processor's chain.
pub mod handlers;
/// Bindable key actions.
pub mod keyboard;
/// Converts raw events into editor commands.
pub mod processor;

pub use event::{InputEvent, KeyState, MouseButton};
pub use handlers::{InputHandler, InputSession, InteractionMode};
pub use keyboard::KeyAction;
pub use processor::InputProcessor;

//! GPU color-coded point picking.
//!
//! [`color_code`] maps point indices to RGBA and back; [`PickEngine`]
//! renders the merged cloud offscreen with those colors and decodes the
//! pixel under the cursor.

pub mod color_code;
/// Offscreen pick pass and single-pixel readback.
pub mod pick_engine;

pub use pick_engine::{PickEngine, PickError};

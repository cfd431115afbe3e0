// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive point-cloud editing on wgpu with GPU color-coded picking.
//!
//! Point clouds are merged into one buffer that remembers which slice each
//! added cloud occupies, so a cloud can later be removed by id. Points are
//! picked by rendering the cloud offscreen with every point colored by its
//! index and reading back the pixel under the cursor.
//!
//! # Key entry points
//!
//! - [`engine::EditorEngine`] - editor, renderers and picking on a surface
//! - [`editor::PointCloudEditor`] - the GPU-free merged buffer, segment
//!   table and picked set
//! - [`input::InputProcessor`] - window events to [`EditorCommand`]s,
//!   including the free-fly keyboard mode
//! - [`options::Options`] - TOML configuration (camera, display, free-fly
//!   steps, key bindings, class labels)
//! - [`io`] - ASCII point-file loading
//!
//! # Architecture
//!
//! The editor drives rendering through the [`editor::EditorHost`] trait and
//! only lends the merged cloud out by reference. The engine's render stage
//! implements that trait; unit tests use a recording host instead.
//! Picking is synchronous: one offscreen pass and one pixel readback per
//! pick, with all offscreen resources dropped before the call returns.

pub mod camera;
pub mod editor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod io;
pub mod options;
pub mod picking;
pub mod renderer;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use editor::{PickEvent, PointCloudEditor};
pub use engine::command::EditorCommand;
pub use engine::EditorEngine;
pub use error::{CloudError, EditorError};
pub use geometry::{Geometry, GeometryType, PointCloud};
pub use input::{InputEvent, InputProcessor, MouseButton};
pub use io::PointFormat;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;

//! Point-file loading.

pub mod ascii;

pub use ascii::{load_points, read_points, PointFormat};

//! Whitespace-separated ASCII point files.
//!
//! One point per line. The column layout is named by a structure string:
//! `x y z` coordinates, optional `i` intensity (read and ignored), optional
//! `r g b` color in 0–255 and an optional trailing `c` class id. A first
//! line holding a single value (the point count) is skipped.

use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use glam::Vec3;

use crate::error::CloudError;
use crate::geometry::PointCloud;

/// Column layout of an ASCII point file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// `x y z`
    Xyz,
    /// `x y z r g b`
    XyzRgb,
    /// `x y z i r g b`
    XyzIRgb,
    /// `x y z c`
    XyzC,
    /// `x y z r g b c`
    XyzRgbC,
    /// `x y z i r g b c`
    XyzIRgbC,
}

impl PointFormat {
    /// Values expected on each point line.
    #[must_use]
    pub fn columns(self) -> usize {
        match self {
            Self::Xyz => 3,
            Self::XyzC => 4,
            Self::XyzRgb => 6,
            Self::XyzIRgb | Self::XyzRgbC => 7,
            Self::XyzIRgbC => 8,
        }
    }

    /// Index of the red column, if the layout carries colors.
    fn color_offset(self) -> Option<usize> {
        match self {
            Self::XyzRgb | Self::XyzRgbC => Some(3),
            Self::XyzIRgb | Self::XyzIRgbC => Some(4),
            Self::Xyz | Self::XyzC => None,
        }
    }

    fn has_classes(self) -> bool {
        matches!(self, Self::XyzC | Self::XyzRgbC | Self::XyzIRgbC)
    }

    /// The structure string naming this layout.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::XyzRgb => "xyzrgb",
            Self::XyzIRgb => "xyzirgb",
            Self::XyzC => "xyzc",
            Self::XyzRgbC => "xyzrgbc",
            Self::XyzIRgbC => "xyzirgbc",
        }
    }
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointFormat {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xyz" => Ok(Self::Xyz),
            "xyzrgb" => Ok(Self::XyzRgb),
            "xyzirgb" => Ok(Self::XyzIRgb),
            "xyzc" => Ok(Self::XyzC),
            "xyzrgbc" => Ok(Self::XyzRgbC),
            "xyzirgbc" => Ok(Self::XyzIRgbC),
            other => Err(CloudError::PointFile {
                line: 0,
                message: format!(
                    "unknown structure '{other}', known structures are: \
                     xyz, xyzrgb, xyzirgb, xyzc, xyzrgbc, xyzirgbc"
                ),
            }),
        }
    }
}

/// Parse a point file from `reader` into a cloud tagged `id`.
///
/// Blank lines are skipped. Values past the layout's columns are ignored.
///
/// # Errors
///
/// [`CloudError::Io`] on read failure and [`CloudError::PointFile`] for a
/// line with too few or unparsable values.
pub fn read_points(
    reader: impl BufRead,
    id: &str,
    format: PointFormat,
) -> Result<PointCloud, CloudError> {
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    let mut classes = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.is_empty() || (line_no == 1 && values.len() == 1) {
            continue;
        }
        if values.len() < format.columns() {
            return Err(CloudError::PointFile {
                line: line_no,
                message: format!(
                    "expected {} values for {format}, found {}",
                    format.columns(),
                    values.len()
                ),
            });
        }

        let number = |col: usize| -> Result<f32, CloudError> {
            values[col].parse::<f32>().map_err(|e| CloudError::PointFile {
                line: line_no,
                message: format!("column {}: '{}': {e}", col + 1, values[col]),
            })
        };

        positions.push(Vec3::new(number(0)?, number(1)?, number(2)?));
        if let Some(offset) = format.color_offset() {
            colors.push(
                Vec3::new(number(offset)?, number(offset + 1)?, number(offset + 2)?)
                    / 255.0,
            );
        }
        if format.has_classes() {
            classes.push(number(format.columns() - 1)?.round() as i32);
        }
    }

    log::debug!("read {} points ({format}) for '{id}'", positions.len());
    Ok(PointCloud::from_positions(id, positions)
        .with_colors(colors)
        .with_classes(classes))
}

/// Load the point file at `path`, tagging the cloud with the file stem.
///
/// # Errors
///
/// See [`read_points`]; opening the file can also fail with
/// [`CloudError::Io`].
pub fn load_points(
    path: &Path,
    format: PointFormat,
) -> Result<PointCloud, CloudError> {
    let file = std::fs::File::open(path)?;
    let id = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
    let cloud = read_points(std::io::BufReader::new(file), &id, format)?;
    log::info!("loaded {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

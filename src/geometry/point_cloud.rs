use std::ops::Range;

use glam::Vec3;

use super::Aabb;

/// Optional per-point column of a [`PointCloud`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Per-point RGB color in `[0, 1]`.
    Colors,
    /// Per-point normal vector.
    Normals,
    /// Per-point class / label id.
    Classes,
}

impl Column {
    /// Lowercase name used in log and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Normals => "normals",
            Self::Classes => "classes",
        }
    }
}

/// Which optional columns a cloud carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ColumnPresence {
    /// Colors column is present.
    pub colors: bool,
    /// Normals column is present.
    pub normals: bool,
    /// Classes column is present.
    pub classes: bool,
}

impl ColumnPresence {
    /// First column whose presence differs between `self` and `other`.
    #[must_use]
    pub fn first_mismatch(self, other: Self) -> Option<Column> {
        if self.colors != other.colors {
            Some(Column::Colors)
        } else if self.normals != other.normals {
            Some(Column::Normals)
        } else if self.classes != other.classes {
            Some(Column::Classes)
        } else {
            None
        }
    }
}

/// A point cloud stored as parallel columns.
///
/// `positions` is always present. The optional columns are either empty
/// (absent) or exactly as long as `positions`; every column is indexed
/// identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Opaque identifier the cloud is tracked by once added to an editor.
    pub id: String,
    /// Point positions.
    pub positions: Vec<Vec3>,
    /// Per-point colors, empty when absent.
    pub colors: Vec<Vec3>,
    /// Per-point normals, empty when absent.
    pub normals: Vec<Vec3>,
    /// Per-point class ids, empty when absent.
    pub classes: Vec<i32>,
}

impl PointCloud {
    /// Empty cloud tagged with `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Cloud with only positions.
    #[must_use]
    pub fn from_positions(id: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            id: id.into(),
            positions,
            ..Self::default()
        }
    }

    /// Attach a colors column.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        self.colors = colors;
        self
    }

    /// Attach a normals column.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Attach a classes column.
    #[must_use]
    pub fn with_classes(mut self, classes: Vec<i32>) -> Self {
        self.classes = classes;
        self
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether a colors column is present.
    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.positions.is_empty() && !self.colors.is_empty()
    }

    /// Whether a normals column is present.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.positions.is_empty() && !self.normals.is_empty()
    }

    /// Whether a classes column is present.
    #[must_use]
    pub fn has_classes(&self) -> bool {
        !self.positions.is_empty() && !self.classes.is_empty()
    }

    /// Presence of every optional column.
    #[must_use]
    pub fn presence(&self) -> ColumnPresence {
        ColumnPresence {
            colors: self.has_colors(),
            normals: self.has_normals(),
            classes: self.has_classes(),
        }
    }

    /// Class id of point `index`, if the classes column is present.
    #[must_use]
    pub fn class_of(&self, index: usize) -> Option<i32> {
        self.classes.get(index).copied()
    }

    /// First optional column whose length disagrees with `positions`,
    /// together with its length.
    #[must_use]
    pub fn inconsistent_column(&self) -> Option<(Column, usize)> {
        let n = self.positions.len();
        [
            (Column::Colors, self.colors.len()),
            (Column::Normals, self.normals.len()),
            (Column::Classes, self.classes.len()),
        ]
        .into_iter()
        .find(|&(_, len)| len != 0 && len != n)
    }

    /// Append every column of `other` to the end of `self`.
    ///
    /// Optional columns are appended only when `other` carries them; callers
    /// keep presence consistent across appends.
    pub fn append(&mut self, other: &Self) {
        if other.has_colors() {
            self.colors.extend_from_slice(&other.colors);
        }
        if other.has_normals() {
            self.normals.extend_from_slice(&other.normals);
        }
        if other.has_classes() {
            self.classes.extend_from_slice(&other.classes);
        }
        self.positions.extend_from_slice(&other.positions);
    }

    /// Erase `range` from every present column. Positions go last.
    pub fn erase_range(&mut self, range: Range<usize>) {
        if self.has_colors() {
            let _ = self.colors.drain(range.clone());
        }
        if self.has_normals() {
            let _ = self.normals.drain(range.clone());
        }
        if self.has_classes() {
            let _ = self.classes.drain(range.clone());
        }
        let _ = self.positions.drain(range);
    }

    /// Axis-aligned bounds of all positions, `None` for an empty cloud.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }
}

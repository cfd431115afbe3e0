//! Segment bookkeeping for the merged point buffer.

use std::ops::Range;

/// One added geometry: its id and the index range it occupies in the merged
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Opaque id of the geometry this segment came from.
    pub id: String,
    /// Half-open index range `[start, end)` into the merged buffer.
    pub range: Range<usize>,
}

impl Segment {
    /// Number of points in the segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the segment covers no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Segments in insertion order.
///
/// Ranges never overlap and together cover `[0, total_len())`. Because ids
/// are appended at the end of the buffer and removals shift everything
/// after the removed segment, insertion order is also offset order.
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    segments: Vec<Segment>,
}

impl SegmentTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a segment of `len` points appended at the end of the buffer.
    /// Returns its range.
    pub fn push(&mut self, id: impl Into<String>, len: usize) -> Range<usize> {
        let start = self.total_len();
        let range = start..start + len;
        self.segments.push(Segment {
            id: id.into(),
            range: range.clone(),
        });
        range
    }

    /// Find the first segment tagged `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Remove the first segment tagged `id` and shift every later segment
    /// left by its length. Returns the removed range.
    pub fn remove(&mut self, id: &str) -> Option<Range<usize>> {
        let pos = self.segments.iter().position(|s| s.id == id)?;
        let removed = self.segments.remove(pos);
        let shift = removed.len();
        for segment in &mut self.segments[pos..] {
            segment.range.start -= shift;
            segment.range.end -= shift;
        }
        log::debug!(
            "segment '{}' removed, {} later segment(s) shifted by {shift}",
            removed.id,
            self.segments.len() - pos
        );
        Some(removed.range)
    }

    /// One past the last covered index.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.segments.last().map_or(0, |s| s.range.end)
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segments are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate segments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Segment containing buffer index `index`.
    #[must_use]
    pub fn segment_of(&self, index: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.range.contains(&index))
    }

    /// Whether the ranges tile `[0, total_len())` with no gap or overlap.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 0;
        for segment in &self.segments {
            if segment.range.start != expected
                || segment.range.end < segment.range.start
            {
                return false;
            }
            expected = segment.range.end;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_after_last_segment() {
        let mut table = SegmentTable::new();
        assert_eq!(table.push("a", 100), 0..100);
        assert_eq!(table.push("b", 50), 100..150);
        assert_eq!(table.total_len(), 150);
        assert!(table.is_contiguous());
    }

    #[test]
    fn remove_shifts_later_segments() {
        let mut table = SegmentTable::new();
        let _ = table.push("a", 10);
        let _ = table.push("b", 5);
        let _ = table.push("c", 7);

        assert_eq!(table.remove("b"), Some(10..15));
        assert_eq!(table.find("a").unwrap().range, 0..10);
        assert_eq!(table.find("c").unwrap().range, 10..17);
        assert!(table.is_contiguous());
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut table = SegmentTable::new();
        let _ = table.push("a", 3);
        assert_eq!(table.remove("zzz"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn readding_after_removal_starts_at_current_end() {
        let mut table = SegmentTable::new();
        let _ = table.push("a", 4);
        let _ = table.push("b", 6);
        let _ = table.remove("a");
        assert_eq!(table.push("a", 4), 6..10);
    }

    #[test]
    fn removing_everything_leaves_empty_table() {
        let mut table = SegmentTable::new();
        let _ = table.push("only", 12);
        assert_eq!(table.remove("only"), Some(0..12));
        assert!(table.is_empty());
        assert_eq!(table.total_len(), 0);
    }

    #[test]
    fn contiguity_holds_over_mixed_sequence() {
        let mut table = SegmentTable::new();
        let ops: &[(&str, Option<usize>)] = &[
            ("a", Some(3)),
            ("b", Some(0)),
            ("c", Some(9)),
            ("b", None),
            ("d", Some(2)),
            ("a", None),
            ("e", Some(5)),
            ("c", None),
        ];
        for &(id, add) in ops {
            match add {
                Some(n) => {
                    let _ = table.push(id, n);
                }
                None => {
                    let _ = table.remove(id);
                }
            }
            assert!(table.is_contiguous(), "gap after op on '{id}'");
        }
        assert_eq!(table.total_len(), 7);
        assert_eq!(table.segment_of(3).unwrap().id, "e");
    }
}

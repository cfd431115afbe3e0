use std::ops::Range;

/// Ordered indices of points the user picked, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickedIndices {
    indices: Vec<usize>,
}

impl PickedIndices {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick.
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Drop and return the most recent pick.
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop()
    }

    /// Most recent pick.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Renumber after `removed` was erased from the buffer: indices inside
    /// the range are dropped, indices past it move down by its length.
    pub fn remove_range(&mut self, removed: &Range<usize>) {
        let shift = removed.len();
        self.indices.retain_mut(|index| {
            if removed.contains(index) {
                false
            } else {
                if *index >= removed.end {
                    *index -= shift;
                }
                true
            }
        });
    }

    /// Picks as a slice, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Number of picks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is picked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(values: &[usize]) -> PickedIndices {
        let mut set = PickedIndices::new();
        for &v in values {
            set.push(v);
        }
        set
    }

    #[test]
    fn remove_range_drops_inside_and_shifts_above() {
        let mut set = picked(&[3, 120, 99, 100, 149, 0]);
        set.remove_range(&(0..100));
        assert_eq!(set.as_slice(), &[20, 0, 49]);
    }

    #[test]
    fn remove_range_keeps_indices_below() {
        let mut set = picked(&[1, 5, 9, 12]);
        set.remove_range(&(5..10));
        assert_eq!(set.as_slice(), &[1, 7]);
    }

    #[test]
    fn adjacent_inside_indices_are_all_dropped() {
        // Consecutive hits inside the range must not skip each other.
        let mut set = picked(&[4, 5, 6, 7, 20]);
        set.remove_range(&(4..8));
        assert_eq!(set.as_slice(), &[16]);
    }

    #[test]
    fn remove_range_matches_set_formula() {
        let old: Vec<usize> = (0..40).step_by(3).collect();
        let (s, e) = (10, 25);
        let mut set = picked(&old);
        set.remove_range(&(s..e));

        let expected: Vec<usize> = old
            .iter()
            .filter(|&&i| i < s || i >= e)
            .map(|&i| if i >= e { i - (e - s) } else { i })
            .collect();
        assert_eq!(set.as_slice(), expected.as_slice());
    }

    #[test]
    fn pop_returns_most_recent() {
        let mut set = picked(&[7, 2]);
        assert_eq!(set.pop(), Some(2));
        assert_eq!(set.last(), Some(7));
        assert_eq!(set.pop(), Some(7));
        assert_eq!(set.pop(), None);
    }
}

//! Inclusive index ranges used for the live and target windows

use super::types::ItemIndex;

/// Contiguous, inclusive range of item indices.
///
/// Describes both the live window (what is materialized) and the target
/// window computed by a layout pass.
///
/// # Invariants
/// - `first <= last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// First index in the range (inclusive).
    pub first: ItemIndex,
    /// Last index in the range (inclusive).
    pub last: ItemIndex,
}

impl IndexRange {
    /// Create a new range.
    ///
    /// # Panics
    /// In debug builds, panics if `first > last`.
    pub fn new(first: ItemIndex, last: ItemIndex) -> Self {
        debug_assert!(
            first <= last,
            "IndexRange first ({first}) must not exceed last ({last})"
        );
        Self { first, last }
    }

    /// Build a range from raw bounds, `None` when the bounds are inverted.
    pub fn try_new(first: ItemIndex, last: ItemIndex) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        (self.last.get() - self.first.get() + 1) as usize
    }

    /// Always false: an inclusive range holds at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the indices, first to last.
    pub fn indices(&self) -> impl DoubleEndedIterator<Item = ItemIndex> {
        (self.first.get()..=self.last.get()).map(ItemIndex::new)
    }

    /// Check if an index is inside the range.
    pub fn contains(&self, index: ItemIndex) -> bool {
        self.first <= index && index <= self.last
    }

    /// Whether the two ranges share no index.
    pub fn is_disjoint(&self, other: &IndexRange) -> bool {
        self.last < other.first || other.last < self.first
    }
}

//! Core viewport newtypes

use std::fmt;

/// Logical position of an item in the (possibly unbounded) sequence.
///
/// Signed: indices before the logical start appear transiently while the
/// swept window is being computed. Only non-negative indices are ever
/// materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemIndex(i64);

impl ItemIndex {
    /// Index of the first item in the sequence.
    pub const ZERO: Self = Self(0);

    /// Create a new ItemIndex from a raw value.
    pub fn new(index: i64) -> Self {
        Self(index)
    }

    /// Get the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }

    /// The raw value as a position, `None` for indices before the start.
    pub fn as_usize(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Get the next index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the previous index. Not saturating: may go negative.
    pub fn prev(&self) -> Self {
        Self(self.0 - 1)
    }

    /// Whether this index lies before the logical start.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Index as a scalar, for offset arithmetic.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl From<i64> for ItemIndex {
    fn from(index: i64) -> Self {
        Self(index)
    }
}

impl From<usize> for ItemIndex {
    fn from(index: usize) -> Self {
        Self(index as i64)
    }
}

impl fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one materialization of an item.
///
/// Every materialized slot receives a fresh id. Destroying a slot and
/// materializing the same index again yields a different id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

impl SlotId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

//! Item provider contract
//!
//! The viewport never decides what an item looks like. It asks a provider
//! for the item at an index when the index becomes live and hands the item
//! back when the index leaves the retained range.

use super::types::ItemIndex;
use kurbo::{Point, Rect, Size};

/// Layout constraints passed to an item.
///
/// The viewport always lays items out tightly: full viewport width,
/// exactly one item extent tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemConstraints {
    /// Width available to the item.
    pub width: f64,
    /// Extent along the scroll axis.
    pub extent: f64,
}

impl ItemConstraints {
    /// Tight constraints of the given width and extent.
    pub fn tight(width: f64, extent: f64) -> Self {
        Self { width, extent }
    }

    /// The only size satisfying these constraints.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.extent)
    }
}

/// A renderable item managed by the viewport.
pub trait WheelItem {
    /// Lay the item out, returning its size.
    fn layout(&mut self, constraints: ItemConstraints) -> Size {
        constraints.size()
    }

    /// Whether an item-local point hits the item.
    fn hit_test(&self, local: Point, size: Size) -> bool {
        let bounds = Rect::from_origin_size(Point::ZERO, size);
        local.x >= bounds.x0 && local.x < bounds.x1 && local.y >= bounds.y0 && local.y < bounds.y1
    }
}

/// Supplies items by index.
pub trait ItemProvider {
    /// Item type produced by this provider.
    type Item: WheelItem;

    /// Total number of items, `None` when unbounded or not yet known.
    fn count(&self) -> Option<usize>;

    /// Whether an item exists at `index`.
    fn exists(&self, index: ItemIndex) -> bool {
        match (index.as_usize(), self.count()) {
            (None, _) => false,
            (Some(i), Some(count)) => i < count,
            (Some(_), None) => true,
        }
    }

    /// Build the item for `index`, `None` if it does not exist.
    fn materialize(&mut self, index: ItemIndex) -> Option<Self::Item>;

    /// Take back an item that left the live window.
    fn release(&mut self, index: ItemIndex, item: Self::Item) {
        let _ = (index, item);
    }
}

/// Provider backed by a closure.
///
/// ```
/// use deckview::viewport::{FnProvider, ItemIndex, ItemProvider, WheelItem};
///
/// struct Row(i64);
/// impl WheelItem for Row {}
///
/// let mut provider = FnProvider::new(Some(3), |index: ItemIndex| Some(Row(index.get())));
/// assert!(provider.exists(ItemIndex::new(2)));
/// assert!(provider.materialize(ItemIndex::new(3)).is_none());
/// ```
pub struct FnProvider<F> {
    count: Option<usize>,
    build: F,
}

impl<F> FnProvider<F> {
    /// Create a provider of `count` items (`None` for unbounded).
    pub fn new(count: Option<usize>, build: F) -> Self {
        Self { count, build }
    }

    /// Change the item count.
    pub fn set_count(&mut self, count: Option<usize>) {
        self.count = count;
    }
}

impl<F> std::fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProvider")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<I, F> ItemProvider for FnProvider<F>
where
    I: WheelItem,
    F: FnMut(ItemIndex) -> Option<I>,
{
    type Item = I;

    fn count(&self) -> Option<usize> {
        self.count
    }

    fn materialize(&mut self, index: ItemIndex) -> Option<I> {
        if !self.exists(index) {
            return None;
        }
        (self.build)(index)
    }
}

//! Live slots and the contiguous window that owns them

use super::types::{ItemIndex, SlotId};
use super::visible_range::IndexRange;
use kurbo::{Affine, Size};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One materialized item and its per-frame layout/paint state.
#[derive(Debug)]
pub struct ItemSlot<I> {
    id: SlotId,
    index: ItemIndex,
    /// Offset at which this slot rests on the anchor.
    pub layout_offset: f64,
    /// Size from the item's last layout.
    pub size: Size,
    /// Transform used the last time the slot was painted.
    pub paint_transform: Affine,
    item: I,
}

impl<I> ItemSlot<I> {
    /// Wrap a freshly materialized item.
    pub fn new(id: SlotId, index: ItemIndex, item: I) -> Self {
        Self {
            id,
            index,
            layout_offset: 0.0,
            size: Size::ZERO,
            paint_transform: Affine::IDENTITY,
            item,
        }
    }

    /// Identity of this materialization.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Index the slot was materialized for.
    pub fn index(&self) -> ItemIndex {
        self.index
    }

    /// The item.
    pub fn item(&self) -> &I {
        &self.item
    }

    /// The item, mutably.
    pub fn item_mut(&mut self) -> &mut I {
        &mut self.item
    }

    /// Consume the slot, yielding its index and item for release.
    pub fn into_parts(self) -> (ItemIndex, I) {
        (self.index, self.item)
    }
}

/// Live slots, ordered by index with no gaps.
///
/// # Invariants
/// - Slot indices are consecutive.
/// - Slots are only ever added next to the current boundaries.
#[derive(Debug)]
pub struct LiveWindow<I> {
    slots: VecDeque<ItemSlot<I>>,
}

impl<I> Default for LiveWindow<I> {
    fn default() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }
}

impl<I> LiveWindow<I> {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is live.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the first live slot.
    pub fn first_index(&self) -> Option<ItemIndex> {
        self.slots.front().map(ItemSlot::index)
    }

    /// Index of the last live slot.
    pub fn last_index(&self) -> Option<ItemIndex> {
        self.slots.back().map(ItemSlot::index)
    }

    /// Live index range, `None` when empty.
    pub fn range(&self) -> Option<IndexRange> {
        Some(IndexRange::new(self.first_index()?, self.last_index()?))
    }

    /// Prepend a slot.
    ///
    /// Accepted only when the window is empty or the slot's index is one
    /// before the first live index; otherwise the slot is handed back.
    pub fn push_front(&mut self, slot: ItemSlot<I>) -> Result<(), ItemSlot<I>> {
        match self.first_index() {
            Some(first) if slot.index() != first.prev() => Err(slot),
            _ => {
                self.slots.push_front(slot);
                Ok(())
            }
        }
    }

    /// Append a slot.
    ///
    /// Accepted only when the window is empty or the slot's index is one
    /// after the last live index; otherwise the slot is handed back.
    pub fn push_back(&mut self, slot: ItemSlot<I>) -> Result<(), ItemSlot<I>> {
        match self.last_index() {
            Some(last) if slot.index() != last.next() => Err(slot),
            _ => {
                self.slots.push_back(slot);
                Ok(())
            }
        }
    }

    /// Remove the first slot.
    pub fn pop_front(&mut self) -> Option<ItemSlot<I>> {
        self.slots.pop_front()
    }

    /// Remove the last slot.
    pub fn pop_back(&mut self) -> Option<ItemSlot<I>> {
        self.slots.pop_back()
    }

    /// Slot for `index`, if live.
    pub fn get(&self, index: ItemIndex) -> Option<&ItemSlot<I>> {
        let position = self.position(index)?;
        self.slots.get(position)
    }

    /// Slot for `index`, mutably, if live.
    pub fn get_mut(&mut self, index: ItemIndex) -> Option<&mut ItemSlot<I>> {
        let position = self.position(index)?;
        self.slots.get_mut(position)
    }

    /// Slots in index order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ItemSlot<I>> {
        self.slots.iter()
    }

    /// Slots in index order, mutably.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut ItemSlot<I>> {
        self.slots.iter_mut()
    }

    /// Remove every slot, first to last.
    pub fn drain(&mut self) -> impl Iterator<Item = ItemSlot<I>> + '_ {
        self.slots.drain(..)
    }

    fn position(&self, index: ItemIndex) -> Option<usize> {
        let first = self.first_index()?;
        let offset = usize::try_from(index.get() - first.get()).ok()?;
        (offset < self.slots.len()).then_some(offset)
    }
}

/// Tracks whether structural mutation of the live window is permitted.
///
/// Cloning shares the underlying depth counter.
#[derive(Debug, Clone, Default)]
pub struct MutationScope {
    depth: Rc<Cell<u32>>,
}

impl MutationScope {
    /// Create an inactive scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the scope; it stays active until the guard drops.
    pub fn enter(&self) -> MutationGuard {
        self.depth.set(self.depth.get() + 1);
        MutationGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    /// Whether at least one guard is alive.
    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Keeps a [`MutationScope`] active while alive.
#[derive(Debug)]
#[must_use = "the mutation scope closes when the guard is dropped"]
pub struct MutationGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

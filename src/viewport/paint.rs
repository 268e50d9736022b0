//! Paint output

use super::types::ItemIndex;
use kurbo::{Affine, Rect, Size};

/// Destination of a paint pass.
///
/// Items are painted in their own untransformed coordinates (origin at the
/// item's top-left); the surface applies `transform` around them.
pub trait PaintSurface<I> {
    /// Restrict subsequent painting to `rect`.
    fn push_clip(&mut self, rect: Rect);

    /// Undo the most recent `push_clip`.
    fn pop_clip(&mut self);

    /// Paint one item.
    fn paint_item(&mut self, index: ItemIndex, item: &I, size: Size, transform: Affine);
}

/// One recorded paint operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintCommand {
    /// Clip pushed.
    PushClip(Rect),
    /// Clip popped.
    PopClip,
    /// Item painted.
    Item {
        /// Painted index.
        index: ItemIndex,
        /// Untransformed size.
        size: Size,
        /// Applied transform.
        transform: Affine,
    },
}

/// Surface that records commands instead of drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    commands: Vec<PaintCommand>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Indices of painted items, in paint order.
    pub fn painted_indices(&self) -> Vec<ItemIndex> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Item { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Transform the item at `index` was painted with, last one wins.
    pub fn transform_of(&self, index: ItemIndex) -> Option<Affine> {
        self.commands.iter().rev().find_map(|command| match command {
            PaintCommand::Item {
                index: painted,
                transform,
                ..
            } if *painted == index => Some(*transform),
            _ => None,
        })
    }

    /// Whether any clip was pushed.
    pub fn clipped(&self) -> bool {
        self.commands
            .iter()
            .any(|command| matches!(command, PaintCommand::PushClip(_)))
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<I> PaintSurface<I> for RecordingSurface {
    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(PaintCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(PaintCommand::PopClip);
    }

    fn paint_item(&mut self, index: ItemIndex, _item: &I, size: Size, transform: Affine) {
        self.commands.push(PaintCommand::Item {
            index,
            size,
            transform,
        });
    }
}

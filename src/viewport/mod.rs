//! Virtualized wheel/deck viewport.
//!
//! [`WheelViewport`] keeps a contiguous window of materialized items around
//! the scroll offset and projects each one through a uniform scale plus
//! translation chosen by the active [`ViewMode`].
//!
//! # Coordinate systems
//!
//! - **Scroll-layout**: one dimension, item 0 at offset 0.
//! - **Paint plane**: scroll-layout minus the scroll offset. The anchor,
//!   where the selected item rests, is at 0.
//! - **Viewport**: what the paint surface sees, after the projection
//!   transform.
//!
//! # Collaborators
//!
//! The viewport owns an [`ItemProvider`] that builds items by index and an
//! [`OffsetChannel`] that holds the scroll offset. Output goes to a
//! [`PaintSurface`].

pub mod offset;
pub mod paint;
pub mod projection;
pub mod provider;
pub mod slot;
pub mod types;
pub mod visible_range;
mod wheel;

pub use hit_test::HitTestResult;
pub use offset::{Curve, ListenerId, OffsetChannel, OffsetListener, ScrollController};
pub use paint::{PaintCommand, PaintSurface, RecordingSurface};
pub use projection::{
    BottomProjection, FlatProjection, Geometry, PaintOrder, Projection, ProjectionPolicy,
    TopProjection, UnknownViewMode, ViewMode,
};
pub use provider::{FnProvider, ItemConstraints, ItemProvider, WheelItem};
pub use slot::{ItemSlot, LiveWindow, MutationGuard, MutationScope};
pub use types::{ItemIndex, SlotId};
pub use visible_range::IndexRange;
pub use wheel::{RevealedOffset, WheelViewport};

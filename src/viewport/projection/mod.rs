//! Projection policies: offset ↔ index mapping and per-item paint transforms
//!
//! A projection is a pure function set bound to the viewport's current
//! [`Geometry`]. Three policies exist, selected by [`ViewMode`]:
//!
//! - [`FlatProjection`] ("whole"): items spread across the full height along
//!   a cylinder, the anchor at the vertical centre.
//! - [`TopProjection`]: items scrolling towards the top edge collapse into a
//!   deck anchored there.
//! - [`BottomProjection`]: upcoming items wait in a deck at the bottom edge
//!   and emerge from it as the offset grows.
//!
//! Paint-plane coordinates are anchor-relative: a slot whose layout offset
//! equals the scroll offset sits at paint Y = 0, on the anchor.

mod bottom;
mod flat;
mod top;

pub use bottom::BottomProjection;
pub use flat::FlatProjection;
pub use top::TopProjection;

use super::types::ItemIndex;
use kurbo::{Affine, Size};
use std::fmt;
use std::str::FromStr;

/// Number of virtual slots that fit in the viewport in Flat mode.
pub const FLAT_MAX_VISIBLE_ITEMS: f64 = 8.0;

/// Half-slots between the top of the Flat window and the anchor slot.
///
/// Empirical: with 8 visible slots this places index 0 in the vertical
/// centre, and it doubles as the trailing virtual margin of the content.
pub const FLAT_FIRST_ITEM_OFFSET: f64 = 7.0;

/// How much Flat items shrink at the edges, `scale_min = 1 - FALLOFF`.
pub const FLAT_SCALE_FALLOFF: f64 = 0.3;

/// Smallest scale an item reaches inside a deck.
pub const DECK_MIN_SCALE: f64 = 0.95;

/// Distance, in layout units, into which a whole deck is compressed.
pub const DECK_STACK_RANGE: f64 = 30.0;

/// Deck depth, in item extents, and the matching window inflation.
pub const DECK_ITEMS: f64 = 4.0;

/// Absorbs representation error when flooring `offset / extent`.
const INDEX_TOLERANCE: f64 = 1e-9;

/// Which projection the viewport uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Cylinder projection across the whole height.
    #[default]
    Flat,
    /// Deck anchored at the top edge.
    Top,
    /// Deck anchored at the bottom edge.
    Bottom,
}

impl ViewMode {
    /// All modes, in cycling order.
    pub const ALL: [ViewMode; 3] = [ViewMode::Flat, ViewMode::Top, ViewMode::Bottom];

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ViewMode::Flat => ViewMode::Top,
            ViewMode::Top => ViewMode::Bottom,
            ViewMode::Bottom => ViewMode::Flat,
        }
    }

    /// Lowercase name, as accepted by `FromStr` and the config file.
    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Flat => "flat",
            ViewMode::Top => "top",
            ViewMode::Bottom => "bottom",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown view mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view mode {0:?} (expected flat, whole, top or bottom)")]
pub struct UnknownViewMode(pub String);

impl FromStr for ViewMode {
    type Err = UnknownViewMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "whole" => Ok(ViewMode::Flat),
            "top" => Ok(ViewMode::Top),
            "bottom" => Ok(ViewMode::Bottom),
            _ => Err(UnknownViewMode(s.to_string())),
        }
    }
}

/// Order in which live slots are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOrder {
    /// First live index to last.
    Forward,
    /// Last live index to first.
    Reverse,
}

/// Inputs every projection is bound to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Extent of every item along the scroll axis.
    pub item_extent: f64,
    /// Exponent applied to interpolation fractions.
    pub layout_power: f64,
    /// Current viewport size.
    pub viewport: Size,
}

impl Geometry {
    /// Create geometry for the given parameters.
    pub fn new(item_extent: f64, layout_power: f64, viewport: Size) -> Self {
        Self {
            item_extent,
            layout_power,
            viewport,
        }
    }

    /// Raise a clamped fraction to the layout power.
    pub(crate) fn ease(&self, fraction: f64) -> f64 {
        clamp_unit(fraction).powf(self.layout_power)
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Uniform scale followed by translation.
pub(crate) fn scale_translate(scale: f64, tx: f64, ty: f64) -> Affine {
    Affine::new([scale, 0.0, 0.0, scale, tx, ty])
}

/// Shared contract of the three projections.
pub trait ProjectionPolicy: fmt::Debug {
    /// Mode this policy implements.
    fn view_mode(&self) -> ViewMode;

    /// Geometry the policy is bound to.
    fn geometry(&self) -> &Geometry;

    /// Spacing between consecutive slots along the scroll axis.
    fn slot_extent(&self) -> f64 {
        self.geometry().item_extent
    }

    /// Index of the slot starting at or before `offset`.
    ///
    /// Floors toward negative infinity.
    fn scroll_offset_to_index(&self, offset: f64) -> ItemIndex {
        ItemIndex::new((offset / self.slot_extent() + INDEX_TOLERANCE).floor() as i64)
    }

    /// Offset at which the slot for `index` rests on the anchor.
    fn index_to_scroll_offset(&self, index: ItemIndex) -> f64 {
        index.as_f64() * self.slot_extent()
    }

    /// Raw content position of the slot, for content-extent bounds only.
    ///
    /// Paint-plane Y is anchor-relative and every policy keeps its shift to
    /// the anchor in [`anchor_inset`](Self::anchor_inset), so this matches
    /// [`index_to_scroll_offset`](Self::index_to_scroll_offset) unless a
    /// policy overrides it.
    fn index_to_real_scroll_offset(&self, index: ItemIndex) -> f64 {
        index.as_f64() * self.slot_extent()
    }

    /// Distance from the top of the swept window to the anchor line.
    fn anchor_inset(&self) -> f64;

    /// Smallest scroll extent, `-inf` when the item count is unknown.
    fn min_estimated_scroll_extent(&self, count: Option<usize>) -> f64 {
        match count {
            Some(_) => 0.0,
            None => f64::NEG_INFINITY,
        }
    }

    /// Largest scroll extent, `+inf` when the item count is unknown.
    fn max_estimated_scroll_extent(&self, count: Option<usize>) -> f64;

    /// Height swept when deciding which indices are live.
    fn computed_viewport_height(&self, parent_height: f64) -> f64;

    /// Lower bound of every scale this policy produces.
    fn scale_min(&self) -> f64;

    /// Order in which slots are painted.
    fn paint_order(&self) -> PaintOrder;

    /// Interpolation fraction for a slot at `paint_y`, always in `[0, 1]`.
    fn interpolation_fraction(&self, paint_y: f64, visible_height: f64) -> f64;

    /// Paint transform for a slot at anchor-relative `paint_y`.
    fn transform(
        &self,
        paint_y: f64,
        visible_width: f64,
        visible_height: f64,
        parent_height: f64,
    ) -> Affine;
}

/// The projection selected by a [`ViewMode`], bound to a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Flat / whole cylinder.
    Flat(FlatProjection),
    /// Top deck.
    Top(TopProjection),
    /// Bottom deck.
    Bottom(BottomProjection),
}

impl Projection {
    /// Resolve the projection for `mode` over `geometry`.
    pub fn resolve(mode: ViewMode, geometry: Geometry) -> Self {
        match mode {
            ViewMode::Flat => Projection::Flat(FlatProjection::new(geometry)),
            ViewMode::Top => Projection::Top(TopProjection::new(geometry)),
            ViewMode::Bottom => Projection::Bottom(BottomProjection::new(geometry)),
        }
    }

    /// The policy behind this projection.
    pub fn policy(&self) -> &dyn ProjectionPolicy {
        match self {
            Projection::Flat(p) => p,
            Projection::Top(p) => p,
            Projection::Bottom(p) => p,
        }
    }
}

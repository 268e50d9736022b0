//! Bottom-anchored deck projection

use super::{
    clamp_unit, scale_translate, Geometry, PaintOrder, ProjectionPolicy, ViewMode, DECK_ITEMS,
    DECK_MIN_SCALE, DECK_STACK_RANGE,
};
use kurbo::Affine;

/// Bottom deck projection.
///
/// The anchored item rests just above the bottom edge at full scale. Items
/// after it wait in a deck stacked against the bottom edge, behind it; items
/// before it translate freely upwards. Painted last to first so that the
/// front of the deck covers the cards behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomProjection {
    geometry: Geometry,
}

impl BottomProjection {
    /// Bind a bottom projection to `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Size of the band past the anchor in which items stack.
    pub fn deck_range(&self) -> f64 {
        DECK_ITEMS * self.geometry.item_extent
    }

    /// Untransformed resting position of the anchored item's top edge.
    fn rest_y(&self, parent_height: f64) -> f64 {
        parent_height - self.geometry.item_extent - DECK_STACK_RANGE
    }
}

impl ProjectionPolicy for BottomProjection {
    fn view_mode(&self) -> ViewMode {
        ViewMode::Bottom
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn anchor_inset(&self) -> f64 {
        self.rest_y(self.geometry.viewport.height).max(0.0)
    }

    fn max_estimated_scroll_extent(&self, count: Option<usize>) -> f64 {
        match count {
            Some(count) => ((count as f64 + DECK_ITEMS) * self.geometry.item_extent
                + self.geometry.viewport.height)
                .max(0.0),
            None => f64::INFINITY,
        }
    }

    fn computed_viewport_height(&self, parent_height: f64) -> f64 {
        parent_height + self.deck_range()
    }

    fn scale_min(&self) -> f64 {
        DECK_MIN_SCALE
    }

    fn paint_order(&self) -> PaintOrder {
        PaintOrder::Reverse
    }

    fn interpolation_fraction(&self, paint_y: f64, _visible_height: f64) -> f64 {
        clamp_unit(paint_y / self.deck_range())
    }

    fn transform(
        &self,
        paint_y: f64,
        visible_width: f64,
        visible_height: f64,
        parent_height: f64,
    ) -> Affine {
        let extent = self.geometry.item_extent;
        let (scale, ty) = if paint_y <= 0.0 {
            (1.0, self.rest_y(parent_height) + paint_y)
        } else {
            let eased = self
                .geometry
                .ease(self.interpolation_fraction(paint_y, visible_height));
            let scale = 1.0 - (1.0 - DECK_MIN_SCALE) * eased;
            (
                scale,
                parent_height - scale * extent - DECK_STACK_RANGE * (1.0 - eased),
            )
        };
        let tx = visible_width / 2.0 * (1.0 - scale);
        scale_translate(scale, tx, ty)
    }
}

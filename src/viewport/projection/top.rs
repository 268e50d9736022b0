//! Top-anchored deck projection

use super::{
    clamp_unit, scale_translate, Geometry, PaintOrder, ProjectionPolicy, ViewMode, DECK_ITEMS,
    DECK_MIN_SCALE, DECK_STACK_RANGE,
};
use kurbo::Affine;

/// Top deck projection.
///
/// The anchored item rests at full scale just below the
/// `DECK_STACK_RANGE` band at the top edge. Items before it shrink and
/// compress into that band, behind it; items after it translate freely
/// downwards. Painted first to last so that each card covers the ones
/// stacked before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopProjection {
    geometry: Geometry,
}

impl TopProjection {
    /// Bind a top projection to `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Size of the band before the anchor in which items stack.
    pub fn deck_range(&self) -> f64 {
        DECK_ITEMS * self.geometry.item_extent
    }
}

impl ProjectionPolicy for TopProjection {
    fn view_mode(&self) -> ViewMode {
        ViewMode::Top
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    // The swept window starts a full deck before the anchor so the stacked
    // cards stay live.
    fn anchor_inset(&self) -> f64 {
        self.deck_range()
    }

    fn max_estimated_scroll_extent(&self, count: Option<usize>) -> f64 {
        match count {
            Some(count) => {
                let height = self.computed_viewport_height(self.geometry.viewport.height);
                ((count as f64 - 1.0) * self.geometry.item_extent + height).max(0.0)
            }
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
        PaintOrder::Forward
    }

    fn interpolation_fraction(&self, paint_y: f64, _visible_height: f64) -> f64 {
        clamp_unit(-paint_y / self.deck_range())
    }

    fn transform(
        &self,
        paint_y: f64,
        visible_width: f64,
        visible_height: f64,
        _parent_height: f64,
    ) -> Affine {
        let (scale, ty) = if paint_y >= 0.0 {
            (1.0, DECK_STACK_RANGE + paint_y)
        } else {
            let eased = self
                .geometry
                .ease(self.interpolation_fraction(paint_y, visible_height));
            let scale = 1.0 - (1.0 - DECK_MIN_SCALE) * eased;
            (scale, DECK_STACK_RANGE * (1.0 - eased))
        };
        let tx = visible_width / 2.0 * (1.0 - scale);
        scale_translate(scale, tx, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    const EPS: f64 = 1e-9;

    fn projection() -> TopProjection {
        TopProjection::new(Geometry::new(50.0, 4.0, Size::new(200.0, 400.0)))
    }

    fn coeffs(p: &TopProjection, paint_y: f64) -> [f64; 6] {
        p.transform(paint_y, 200.0, 600.0, 400.0).as_coeffs()
    }

    #[test]
    fn window_starts_a_deck_before_the_anchor() {
        assert_eq!(projection().anchor_inset(), 200.0);
    }

    #[test]
    fn computed_height_adds_deck_range() {
        assert_eq!(projection().computed_viewport_height(400.0), 600.0);
    }

    #[test]
    fn anchored_item_is_front_card() {
        let [scale, _, _, _, tx, ty] = coeffs(&projection(), 0.0);
        assert_eq!(scale, 1.0);
        assert_eq!(tx, 0.0);
        assert_eq!(ty, DECK_STACK_RANGE);
    }

    #[test]
    fn deepest_card_sits_on_top_edge() {
        let p = projection();
        let [scale, _, _, _, _, ty] = coeffs(&p, -p.deck_range());
        assert!((scale - DECK_MIN_SCALE).abs() < EPS);
        assert!(ty.abs() < EPS);
    }

    #[test]
    fn transform_is_continuous_at_anchor() {
        let p = projection();
        let inside = coeffs(&p, -1e-7);
        let outside = coeffs(&p, 0.0);
        assert!((inside[0] - outside[0]).abs() < 1e-6);
        assert!((inside[5] - outside[5]).abs() < 1e-6);
    }

    #[test]
    fn free_items_translate_linearly() {
        let p = projection();
        let a = coeffs(&p, 50.0);
        let b = coeffs(&p, 100.0);
        assert_eq!(a[0], 1.0);
        assert!((b[5] - a[5] - 50.0).abs() < EPS);
    }

    #[test]
    fn deck_compresses_into_stack_range() {
        let p = projection();
        for step in 0..=20 {
            let y = -p.deck_range() * step as f64 / 20.0;
            let ty = coeffs(&p, y)[5];
            assert!((0.0..=DECK_STACK_RANGE + EPS).contains(&ty), "ty {ty} at {y}");
        }
    }

    #[test]
    fn cards_deeper_in_the_deck_are_smaller() {
        let p = projection();
        let near = coeffs(&p, -50.0)[0];
        let far = coeffs(&p, -150.0)[0];
        assert!(far < near && near < 1.0);
    }

    #[test]
    fn max_extent_lets_last_item_reach_anchor() {
        let p = projection();
        // (10 - 1) * 50 + 600 - 600 = 450 = offset of index 9.
        assert_eq!(p.max_estimated_scroll_extent(Some(10)), 1050.0);
    }

    #[test]
    fn max_extent_never_negative() {
        let p = TopProjection::new(Geometry::new(50.0, 4.0, Size::ZERO));
        assert_eq!(p.max_estimated_scroll_extent(Some(0)), 150.0);
        let tiny = TopProjection::new(Geometry::new(1.0, 4.0, Size::ZERO));
        assert!(tiny.max_estimated_scroll_extent(Some(0)) >= 0.0);
    }
}

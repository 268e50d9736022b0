//! Flat ("whole") projection: a cylinder spanning the full viewport height

use super::{
    clamp_unit, scale_translate, Geometry, PaintOrder, ProjectionPolicy, ViewMode,
    FLAT_FIRST_ITEM_OFFSET, FLAT_MAX_VISIBLE_ITEMS, FLAT_SCALE_FALLOFF,
};
use kurbo::Affine;
use std::f64::consts::FRAC_PI_2;

/// Flat projection.
///
/// The scroll axis is measured in virtual slots of `height / 8`. The anchor
/// slot sits in the vertical centre at full scale; slots further away are
/// pushed along a cylinder towards the edges and shrink with
/// `fraction.powf(layout_power)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProjection {
    geometry: Geometry,
}

impl FlatProjection {
    /// Bind a flat projection to `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Virtual slot extent; falls back to the item extent before the
    /// viewport has a height.
    pub fn virtual_extent(&self) -> f64 {
        let height = self.geometry.viewport.height;
        if height > 0.0 {
            height / FLAT_MAX_VISIBLE_ITEMS
        } else {
            self.geometry.item_extent
        }
    }

    /// Fractional position of the slot centre across the swept height.
    fn position_fraction(&self, paint_y: f64, visible_height: f64) -> f64 {
        if visible_height <= 0.0 {
            return 0.5;
        }
        let v = self.virtual_extent();
        clamp_unit((paint_y + self.anchor_inset() + v / 2.0) / visible_height)
    }
}

impl ProjectionPolicy for FlatProjection {
    fn view_mode(&self) -> ViewMode {
        ViewMode::Flat
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn slot_extent(&self) -> f64 {
        self.virtual_extent()
    }

    fn anchor_inset(&self) -> f64 {
        FLAT_FIRST_ITEM_OFFSET / 2.0 * self.virtual_extent()
    }

    fn max_estimated_scroll_extent(&self, count: Option<usize>) -> f64 {
        match count {
            Some(count) => ((count as f64 + FLAT_FIRST_ITEM_OFFSET) * self.virtual_extent()).max(0.0),
            None => f64::INFINITY,
        }
    }

    fn computed_viewport_height(&self, parent_height: f64) -> f64 {
        parent_height
    }

    fn scale_min(&self) -> f64 {
        1.0 - FLAT_SCALE_FALLOFF
    }

    fn paint_order(&self) -> PaintOrder {
        PaintOrder::Forward
    }

    fn interpolation_fraction(&self, paint_y: f64, visible_height: f64) -> f64 {
        let position = self.position_fraction(paint_y, visible_height);
        clamp_unit((2.0 * position - 1.0).abs())
    }

    fn transform(
        &self,
        paint_y: f64,
        visible_width: f64,
        visible_height: f64,
        parent_height: f64,
    ) -> Affine {
        let signed = 2.0 * self.position_fraction(paint_y, visible_height) - 1.0;
        let eased = self.geometry.ease(signed.abs());
        let scale = 1.0 - FLAT_SCALE_FALLOFF * eased;

        let warped = clamp_unit(0.5 + 0.5 * (signed * FRAC_PI_2).sin());
        let center_y = warped * parent_height;

        let tx = visible_width / 2.0 * (1.0 - scale);
        let ty = center_y - scale * self.geometry.item_extent / 2.0;
        scale_translate(scale, tx, ty)
    }
}

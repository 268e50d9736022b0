//! The wheel viewport: live window management, layout, paint and hit testing

use super::hit_test::HitTestResult;
use super::offset::{Curve, ListenerId, OffsetChannel};
use super::paint::PaintSurface;
use super::projection::{Geometry, PaintOrder, Projection, ProjectionPolicy, ViewMode};
use super::provider::{ItemConstraints, ItemProvider, WheelItem};
use super::slot::{ItemSlot, LiveWindow, MutationScope};
use super::types::{ItemIndex, SlotId};
use super::visible_range::IndexRange;
use crate::config::{
    validate_clip, validate_item_extent, validate_layout_power, ConfigError, WheelConfig,
};
use kurbo::{Point, Rect, Size};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Layout passes attempted before giving up on offset corrections.
const MAX_LAYOUT_ATTEMPTS: usize = 10;

/// Determinants below this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Where to scroll to reveal an item, and where it currently paints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealedOffset {
    /// Offset that rests the item on the anchor.
    pub offset: f64,
    /// Revealed rect in viewport coordinates, as last painted.
    pub rect: Rect,
}

/// Virtualized wheel/deck viewport.
///
/// Owns its provider and offset channel. The host drives it once per
/// frame: [`layout`](Self::layout) when [`needs_layout`](Self::needs_layout),
/// then [`paint`](Self::paint).
pub struct WheelViewport<P: ItemProvider, C: OffsetChannel> {
    provider: P,
    channel: C,
    config: WheelConfig,
    size: Size,
    projection: Cell<Option<Projection>>,
    window: LiveWindow<P::Item>,
    mutation: MutationScope,
    next_slot_id: u64,
    needs_layout: Rc<Cell<bool>>,
    needs_paint: bool,
    listener: Option<ListenerId>,
}

impl<P: ItemProvider, C: OffsetChannel> WheelViewport<P, C> {
    /// Create a detached viewport with nothing live.
    pub fn new(config: WheelConfig, provider: P, channel: C) -> Self {
        Self {
            provider,
            channel,
            config,
            size: Size::ZERO,
            projection: Cell::new(None),
            window: LiveWindow::new(),
            mutation: MutationScope::new(),
            next_slot_id: 0,
            needs_layout: Rc::new(Cell::new(true)),
            needs_paint: true,
            listener: None,
        }
    }

    // ===== Attachment =====

    /// Subscribe to offset changes. Idempotent.
    pub fn attach(&mut self) {
        if self.listener.is_some() {
            return;
        }
        let dirty = Rc::clone(&self.needs_layout);
        let id = self
            .channel
            .add_listener(Box::new(move |_offset| dirty.set(true)));
        self.listener = Some(id);
        self.needs_layout.set(true);
    }

    /// Unsubscribe from offset changes. Idempotent.
    pub fn detach(&mut self) {
        if let Some(id) = self.listener.take() {
            self.channel.remove_listener(id);
        }
    }

    /// Whether an offset listener is registered.
    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    // ===== Accessors =====

    /// The item provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The item provider, mutably. Marks layout dirty.
    pub fn provider_mut(&mut self) -> &mut P {
        self.needs_layout.set(true);
        &mut self.provider
    }

    /// The offset channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The offset channel, mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Current configuration.
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// Size from the last layout.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> f64 {
        self.channel.current_offset()
    }

    /// Whether layout must run before the next paint.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout.get()
    }

    /// Whether the last paint is stale.
    pub fn needs_paint(&self) -> bool {
        self.needs_paint || self.needs_layout()
    }

    /// Live index range, `None` when nothing is live.
    pub fn live_range(&self) -> Option<IndexRange> {
        self.window.range()
    }

    /// Live slots in index order.
    pub fn slots(&self) -> impl DoubleEndedIterator<Item = &ItemSlot<P::Item>> {
        self.window.iter()
    }

    /// Live slot for `index`.
    pub fn slot(&self, index: ItemIndex) -> Option<&ItemSlot<P::Item>> {
        self.window.get(index)
    }

    /// Shared handle on the structural mutation scope.
    pub fn mutation_scope(&self) -> MutationScope {
        self.mutation.clone()
    }

    /// Active projection, resolved on demand.
    pub fn projection(&self) -> Projection {
        if let Some(projection) = self.projection.get() {
            return projection;
        }
        let geometry = Geometry::new(
            self.config.item_extent(),
            self.config.layout_power(),
            self.size,
        );
        let projection = Projection::resolve(self.config.view_mode(), geometry);
        self.projection.set(Some(projection));
        projection
    }

    /// Estimated `(min, max)` scroll extents for the current provider count.
    pub fn estimated_extents(&self) -> (f64, f64) {
        let projection = self.projection();
        let policy = projection.policy();
        let count = self.provider.count();
        (
            policy.min_estimated_scroll_extent(count),
            policy.max_estimated_scroll_extent(count),
        )
    }

    // ===== Configuration =====

    /// Change the item extent.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite extents.
    pub fn set_item_extent(&mut self, item_extent: f64) -> Result<(), ConfigError> {
        let item_extent = validate_item_extent(item_extent)?;
        if item_extent != self.config.item_extent() {
            self.config = self.config.to_builder().item_extent(item_extent).build()?;
            self.invalidate_geometry();
        }
        Ok(())
    }

    /// Change the layout power.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite powers.
    pub fn set_layout_power(&mut self, layout_power: f64) -> Result<(), ConfigError> {
        let layout_power = validate_layout_power(layout_power)?;
        if layout_power != self.config.layout_power() {
            self.config = self.config.to_builder().layout_power(layout_power).build()?;
            self.invalidate_geometry();
        }
        Ok(())
    }

    /// Enable or disable clipping.
    ///
    /// # Errors
    ///
    /// Rejects enabling clipping while outside rendering is on.
    pub fn set_clip_to_bounds(&mut self, clip_to_bounds: bool) -> Result<(), ConfigError> {
        validate_clip(clip_to_bounds, self.config.allow_outside_rendering())?;
        if clip_to_bounds != self.config.clip_to_bounds() {
            self.config = self.config.to_builder().clip_to_bounds(clip_to_bounds).build()?;
            self.needs_paint = true;
        }
        Ok(())
    }

    /// Enable or disable outside rendering.
    ///
    /// # Errors
    ///
    /// Rejects enabling outside rendering while clipping is on.
    pub fn set_allow_outside_rendering(&mut self, allow: bool) -> Result<(), ConfigError> {
        validate_clip(self.config.clip_to_bounds(), allow)?;
        if allow != self.config.allow_outside_rendering() {
            self.config = self
                .config
                .to_builder()
                .allow_outside_rendering(allow)
                .build()?;
            self.needs_layout.set(true);
        }
        Ok(())
    }

    /// Switch projection.
    ///
    /// Destroys every live slot and jumps the offset to zero; nothing is
    /// carried over between modes.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if view_mode == self.config.view_mode() {
            return;
        }
        debug!(from = %self.config.view_mode(), to = %view_mode, "Switching view mode");
        self.config = self.config.with_view_mode(view_mode);
        self.projection.set(None);
        self.destroy_all();
        self.channel.jump_to(0.0);
        self.needs_layout.set(true);
        self.needs_paint = true;
    }

    fn invalidate_geometry(&mut self) {
        self.projection.set(None);
        self.needs_layout.set(true);
        self.needs_paint = true;
    }

    // ===== Layout =====

    /// Lay out for a viewport of `size`.
    ///
    /// Repeats the pass while the channel corrects the offset, up to a
    /// fixed number of attempts.
    pub fn layout(&mut self, size: Size) {
        if size != self.size {
            self.size = size;
            self.projection.set(None);
        }

        let mut settled = false;
        for _ in 0..MAX_LAYOUT_ATTEMPTS {
            if self.layout_pass() {
                settled = true;
                break;
            }
        }
        if !settled {
            warn!(
                offset = self.channel.current_offset(),
                "Offset still corrected after {MAX_LAYOUT_ATTEMPTS} layout passes"
            );
        }

        self.needs_layout.set(false);
        self.needs_paint = true;
    }

    /// One layout pass. Returns `false` if the channel corrected the offset.
    fn layout_pass(&mut self) -> bool {
        let projection = self.projection();
        let policy = projection.policy();
        let offset = self.channel.current_offset();
        let height = self.size.height;
        let visible_height = policy.computed_viewport_height(height);

        let Some(target) = self.target_range(policy, offset, visible_height) else {
            self.destroy_all();
            debug!(offset, "Layout pass produced an empty window");
            return self.report_extents(policy, visible_height);
        };

        if let Some(live) = self.window.range() {
            if live.is_disjoint(&target) {
                self.destroy_all();
            }
        }

        if self.window.is_empty() {
            match self.create_slot(policy, target.first) {
                Some(slot) => {
                    if let Err(slot) = self.window.push_back(slot) {
                        self.destroy_slot(slot);
                    }
                }
                None => return self.report_extents(policy, visible_height),
            }
        }

        while self.window.first_index().is_some_and(|first| first < target.first) {
            if let Some(slot) = self.window.pop_front() {
                self.destroy_slot(slot);
            }
        }
        while self.window.last_index().is_some_and(|last| last > target.last) {
            if let Some(slot) = self.window.pop_back() {
                self.destroy_slot(slot);
            }
        }

        let constraints = ItemConstraints::tight(self.size.width, self.config.item_extent());
        for slot in self.window.iter_mut() {
            slot.size = slot.item_mut().layout(constraints);
            slot.layout_offset = policy.index_to_scroll_offset(slot.index());
        }

        while let Some(first) = self.window.first_index().filter(|first| *first > target.first) {
            let Some(slot) = self.create_slot(policy, first.prev()) else {
                break;
            };
            if let Err(slot) = self.window.push_front(slot) {
                self.destroy_slot(slot);
                break;
            }
        }
        while let Some(last) = self.window.last_index().filter(|last| *last < target.last) {
            let Some(slot) = self.create_slot(policy, last.next()) else {
                break;
            };
            if let Err(slot) = self.window.push_back(slot) {
                self.destroy_slot(slot);
                break;
            }
        }

        debug!(
            offset,
            first = ?self.window.first_index(),
            last = ?self.window.last_index(),
            mode = %policy.view_mode(),
            "Layout pass"
        );

        self.report_extents(policy, visible_height)
    }

    /// Indices whose slots fall inside the swept window.
    fn target_range(
        &self,
        policy: &dyn ProjectionPolicy,
        offset: f64,
        visible_height: f64,
    ) -> Option<IndexRange> {
        let (first_offset, last_offset) = if self.config.allow_outside_rendering() {
            let first = offset - policy.anchor_inset() - visible_height / 2.0;
            (first, first + visible_height * 2.0)
        } else {
            let first = offset - policy.anchor_inset();
            (first, first + visible_height)
        };
        if !first_offset.is_finite() || !last_offset.is_finite() {
            return None;
        }

        let mut first = policy.scroll_offset_to_index(first_offset).max(ItemIndex::ZERO);
        let mut last = policy.scroll_offset_to_index(last_offset);
        if policy.index_to_scroll_offset(last) >= last_offset {
            last = last.prev();
        }
        if let Some(count) = self.provider.count() {
            last = last.min(ItemIndex::new(count as i64 - 1));
        }

        while first <= last && !self.provider.exists(first) {
            first = first.next();
        }
        while first <= last
            && (!self.provider.exists(last) || policy.index_to_scroll_offset(last) > last_offset)
        {
            last = last.prev();
        }

        IndexRange::try_new(first, last)
    }

    /// Report viewport and content extents. Returns `false` on correction.
    fn report_extents(&mut self, policy: &dyn ProjectionPolicy, visible_height: f64) -> bool {
        let count = self.provider.count();
        let (min, max) = match self.window.range() {
            Some(live) => {
                let min = if self.provider.exists(live.first.prev()) {
                    policy.min_estimated_scroll_extent(count)
                } else {
                    policy.index_to_real_scroll_offset(live.first)
                };
                let max = if self.provider.exists(live.last.next()) {
                    policy.max_estimated_scroll_extent(count) - visible_height
                } else {
                    policy.index_to_real_scroll_offset(live.last)
                };
                (min, max)
            }
            None => {
                let min = policy.min_estimated_scroll_extent(count);
                let max = policy.max_estimated_scroll_extent(count) - visible_height;
                (min, max)
            }
        };
        let max = max.max(min);

        let dimension_ok = self.channel.apply_viewport_dimension(self.size.height);
        let content_ok = self.channel.apply_content_dimensions(min, max);
        dimension_ok && content_ok
    }

    fn create_slot(
        &mut self,
        policy: &dyn ProjectionPolicy,
        index: ItemIndex,
    ) -> Option<ItemSlot<P::Item>> {
        let _guard = self.mutation.enter();
        let item = self.provider.materialize(index)?;
        let id = SlotId::new(self.next_slot_id);
        self.next_slot_id += 1;

        let mut slot = ItemSlot::new(id, index, item);
        let constraints = ItemConstraints::tight(self.size.width, self.config.item_extent());
        slot.size = slot.item_mut().layout(constraints);
        slot.layout_offset = policy.index_to_scroll_offset(index);
        trace!(%index, slot = id.get(), "Materialized item");
        Some(slot)
    }

    fn destroy_slot(&mut self, slot: ItemSlot<P::Item>) {
        let _guard = self.mutation.enter();
        let id = slot.id();
        let (index, item) = slot.into_parts();
        self.provider.release(index, item);
        trace!(%index, slot = id.get(), "Released item");
    }

    fn destroy_all(&mut self) {
        let slots: Vec<_> = self.window.drain().collect();
        for slot in slots {
            self.destroy_slot(slot);
        }
    }

    // ===== Paint =====

    /// Paint live slots in projection order, caching each transform.
    pub fn paint<S: PaintSurface<P::Item>>(&mut self, surface: &mut S) {
        self.needs_paint = false;
        if self.window.is_empty() {
            return;
        }

        let projection = self.projection();
        let policy = projection.policy();
        let offset = self.channel.current_offset();
        let width = self.size.width;
        let height = self.size.height;
        let visible_height = policy.computed_viewport_height(height);

        let mut bounds: Option<Rect> = None;
        for slot in self.window.iter_mut() {
            let paint_y = slot.layout_offset - offset;
            slot.paint_transform = policy.transform(paint_y, width, visible_height, height);
            let painted = slot
                .paint_transform
                .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, slot.size));
            bounds = Some(bounds.map_or(painted, |b| b.union(painted)));
        }

        let viewport = self.viewport_rect();
        let clip = self.config.clip_to_bounds()
            && bounds.is_some_and(|b| !rect_contains(viewport, b));
        if clip {
            surface.push_clip(viewport);
        }

        match policy.paint_order() {
            PaintOrder::Forward => {
                for slot in self.window.iter() {
                    paint_slot(surface, slot);
                }
            }
            PaintOrder::Reverse => {
                for slot in self.window.iter().rev() {
                    paint_slot(surface, slot);
                }
            }
        }

        if clip {
            surface.pop_clip();
        }
    }

    fn viewport_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    // ===== Hit testing =====

    /// Find the topmost painted item under `position`.
    pub fn hit_test(&self, position: Point) -> HitTestResult {
        if self.config.clip_to_bounds() && !self.viewport_rect().contains(position) {
            return HitTestResult::miss();
        }

        let hit = |slot: &ItemSlot<P::Item>| -> Option<HitTestResult> {
            let transform = slot.paint_transform;
            if transform.determinant().abs() < SINGULAR_EPSILON {
                return None;
            }
            let local = transform.inverse() * position;
            slot.item()
                .hit_test(local, slot.size)
                .then(|| HitTestResult::hit(slot.index(), local))
        };

        let found = match self.projection().policy().paint_order() {
            PaintOrder::Forward => self.window.iter().rev().find_map(hit),
            PaintOrder::Reverse => self.window.iter().find_map(hit),
        };
        found.unwrap_or(HitTestResult::miss())
    }

    // ===== Reveal =====

    /// Offset that rests a live item on the anchor.
    ///
    /// `alignment` is accepted for symmetry with generic scroll containers
    /// and ignored: the anchor is the only resting position. `rect` is in
    /// item-local coordinates and defaults to the whole item.
    pub fn offset_to_reveal(
        &self,
        index: ItemIndex,
        alignment: f64,
        rect: Option<Rect>,
    ) -> Option<RevealedOffset> {
        let _ = alignment;
        let slot = self.window.get(index)?;
        let local = rect.unwrap_or_else(|| Rect::from_origin_size(Point::ZERO, slot.size));
        Some(RevealedOffset {
            offset: slot.layout_offset,
            rect: slot.paint_transform.transform_rect_bbox(local),
        })
    }

    /// Scroll a live item onto the anchor, animated unless `duration` is zero.
    pub fn show_in_viewport(
        &mut self,
        index: ItemIndex,
        rect: Option<Rect>,
        duration: Duration,
        curve: Curve,
    ) -> Option<RevealedOffset> {
        let revealed = self.offset_to_reveal(index, 0.5, rect)?;
        self.move_to(revealed.offset, duration, curve);
        Some(revealed)
    }

    /// Scroll any index onto the anchor, live or not. Returns the target offset.
    pub fn scroll_to_index(&mut self, index: ItemIndex, duration: Duration, curve: Curve) -> f64 {
        let offset = self.projection().policy().index_to_scroll_offset(index);
        self.move_to(offset, duration, curve);
        offset
    }

    fn move_to(&mut self, offset: f64, duration: Duration, curve: Curve) {
        if duration.is_zero() {
            self.channel.jump_to(offset);
            self.needs_layout.set(true);
        } else {
            self.channel.animate_to(offset, duration, curve);
        }
    }

    /// Existing index whose slot is nearest the anchor.
    pub fn anchored_index(&self) -> Option<ItemIndex> {
        let projection = self.projection();
        let policy = projection.policy();
        let offset = self.channel.current_offset() + policy.slot_extent() / 2.0;
        let mut index = policy.scroll_offset_to_index(offset).max(ItemIndex::ZERO);
        if let Some(count) = self.provider.count() {
            if count == 0 {
                return None;
            }
            index = index.min(ItemIndex::new(count as i64 - 1));
        }
        self.provider.exists(index).then_some(index)
    }
}

fn paint_slot<I, S: PaintSurface<I>>(surface: &mut S, slot: &ItemSlot<I>) {
    surface.paint_item(slot.index(), slot.item(), slot.size, slot.paint_transform);
}

fn rect_contains(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

#[cfg(test)]
#[path = "wheel_tests.rs"]
mod tests;

//! Terminal paint surface and the demo's items.
//!
//! The wheel is laid out in layout units, [`CELL_UNITS`] to a terminal cell
//! in both directions.

use super::styles::CardStyles;
use crate::viewport::{ItemIndex, ItemProvider, PaintSurface, WheelItem};
use kurbo::Affine;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Layout units per terminal cell.
pub const CELL_UNITS: f64 = 8.0;

/// Smallest card that gets a border.
const MIN_BORDERED_HEIGHT: u16 = 3;
const MIN_BORDERED_WIDTH: u16 = 4;

// ===== Items =====

/// A card showing one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelItem {
    label: String,
}

impl LabelItem {
    /// Create a card with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The card's text.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl WheelItem for LabelItem {}

/// Provider of numbered label cards.
#[derive(Debug, Clone, Default)]
pub struct LabelProvider {
    count: Option<usize>,
    live: usize,
}

impl LabelProvider {
    /// `count` cards, or unbounded when `None`.
    pub fn new(count: Option<usize>) -> Self {
        Self { count, live: 0 }
    }

    /// Cards currently materialized.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl ItemProvider for LabelProvider {
    type Item = LabelItem;

    fn count(&self) -> Option<usize> {
        self.count
    }

    fn materialize(&mut self, index: ItemIndex) -> Option<LabelItem> {
        if !self.exists(index) {
            return None;
        }
        self.live += 1;
        Some(LabelItem::new(format!("Item {index}")))
    }

    fn release(&mut self, _index: ItemIndex, _item: LabelItem) {
        self.live = self.live.saturating_sub(1);
    }
}

// ===== Surface =====

/// Paints cards into a ratatui buffer.
///
/// Item bounds are transformed, rounded to whole cells and clipped to the
/// innermost pushed clip, or to `area` when nothing is pushed.
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    clips: Vec<Rect>,
    styles: CardStyles,
    selected: Option<ItemIndex>,
}

impl<'a> TerminalSurface<'a> {
    /// Surface painting into `area` of `buf`.
    pub fn new(buf: &'a mut Buffer, area: Rect, styles: CardStyles) -> Self {
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            clips: Vec::new(),
            styles,
            selected: None,
        }
    }

    /// Highlight `index` when it is painted.
    pub fn with_selected(mut self, selected: Option<ItemIndex>) -> Self {
        self.selected = selected;
        self
    }

    fn limit(&self) -> Rect {
        self.clips.last().copied().unwrap_or(self.area)
    }

    /// Cell rectangle covering `bounds` (viewport units), clipped to `limit`.
    fn cell_rect(&self, bounds: kurbo::Rect, limit: Rect) -> Option<Rect> {
        if ![bounds.x0, bounds.y0, bounds.x1, bounds.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        let origin_x = f64::from(self.area.x);
        let origin_y = f64::from(self.area.y);
        let cell = |v: f64| (v / CELL_UNITS).round();
        let x0 = (origin_x + cell(bounds.x0)).max(f64::from(limit.left()));
        let y0 = (origin_y + cell(bounds.y0)).max(f64::from(limit.top()));
        let x1 = (origin_x + cell(bounds.x1)).min(f64::from(limit.right()));
        let y1 = (origin_y + cell(bounds.y1)).min(f64::from(limit.bottom()));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }

    fn viewport_to_cells(&self, rect: kurbo::Rect) -> Option<Rect> {
        self.cell_rect(rect, self.area)
    }
}

impl PaintSurface<LabelItem> for TerminalSurface<'_> {
    fn push_clip(&mut self, rect: kurbo::Rect) {
        let clip = self
            .viewport_to_cells(rect)
            .map(|clip| clip.intersection(self.limit()))
            .unwrap_or_default();
        self.clips.push(clip);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn paint_item(
        &mut self,
        index: ItemIndex,
        item: &LabelItem,
        size: kurbo::Size,
        transform: Affine,
    ) {
        let bounds =
            transform.transform_rect_bbox(kurbo::Rect::from_origin_size(kurbo::Point::ZERO, size));
        let Some(rect) = self.cell_rect(bounds, self.limit()) else {
            return;
        };
        let scale = transform.as_coeffs()[0];
        let style = self.styles.card(scale, self.selected == Some(index));

        Clear.render(rect, self.buf);
        let inner = if rect.height >= MIN_BORDERED_HEIGHT && rect.width >= MIN_BORDERED_WIDTH {
            let block = Block::bordered().border_style(style);
            let inner = block.inner(rect);
            block.render(rect, self.buf);
            inner
        } else {
            self.buf.set_style(rect, style);
            rect
        };
        if inner.is_empty() {
            return;
        }

        let text = truncate_to_width(item.label(), usize::from(inner.width));
        let text_width = u16::try_from(text.width()).unwrap_or(inner.width);
        let x = inner.x + inner.width.saturating_sub(text_width) / 2;
        let y = inner.y + inner.height / 2;
        self.buf.set_string(x, y, text, style);
    }
}

/// Longest prefix of `text` at most `max_width` columns wide.
pub fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (offset, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            return &text[..offset];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn units(cells: f64) -> f64 {
        cells * CELL_UNITS
    }

    fn surface(buf: &mut Buffer) -> TerminalSurface<'_> {
        let area = buf.area;
        TerminalSurface::new(buf, area, CardStyles::default())
    }

    mod truncate {
        use super::*;

        #[test]
        fn short_text_is_untouched() {
            assert_eq!(truncate_to_width("Item 3", 10), "Item 3");
        }

        #[test]
        fn cuts_at_column_limit() {
            assert_eq!(truncate_to_width("Item 300", 6), "Item 3");
        }

        #[test]
        fn wide_characters_count_double() {
            assert_eq!(truncate_to_width("日本語", 5), "日本");
            assert_eq!(truncate_to_width("日本語", 1), "");
        }
    }

    mod provider {
        use super::*;

        #[test]
        fn labels_follow_index() {
            let mut provider = LabelProvider::new(Some(3));
            let item = provider.materialize(ItemIndex::new(2)).unwrap();
            assert_eq!(item.label(), "Item 2");
            assert_eq!(provider.live(), 1);
            provider.release(ItemIndex::new(2), item);
            assert_eq!(provider.live(), 0);
        }

        #[test]
        fn missing_indices_are_not_built() {
            let mut provider = LabelProvider::new(Some(3));
            assert_eq!(provider.materialize(ItemIndex::new(3)), None);
            assert_eq!(provider.materialize(ItemIndex::new(-1)), None);
            assert_eq!(provider.live(), 0);
        }
    }

    mod painting {
        use super::*;

        #[test]
        fn bordered_card_shows_centred_label() {
            let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
            surface(&mut buf).paint_item(
                ItemIndex::new(7),
                &LabelItem::new("Item 7"),
                Size::new(units(20.0), units(3.0)),
                Affine::translate((0.0, units(1.0))),
            );
            let lines = buffer_lines(&buf);
            assert!(lines[1].starts_with('┌'), "top border, got {:?}", lines[1]);
            assert!(lines[2].contains("Item 7"), "label row, got {:?}", lines[2]);
            assert!(lines[0].trim().is_empty());
            assert!(lines[4].trim().is_empty());
        }

        #[test]
        fn thin_card_prints_label_only() {
            let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
            surface(&mut buf).paint_item(
                ItemIndex::ZERO,
                &LabelItem::new("Item 0"),
                Size::new(units(10.0), units(1.0)),
                Affine::IDENTITY,
            );
            assert_eq!(buffer_lines(&buf)[0], "  Item 0  ");
        }

        #[test]
        fn clip_limits_painted_rows() {
            let mut buf = Buffer::empty(Rect::new(0, 0, 10, 6));
            let mut surface = surface(&mut buf);
            surface.push_clip(kurbo::Rect::new(0.0, 0.0, units(10.0), units(2.0)));
            surface.paint_item(
                ItemIndex::ZERO,
                &LabelItem::new("Item 0"),
                Size::new(units(10.0), units(1.0)),
                Affine::translate((0.0, units(4.0))),
            );
            surface.pop_clip();
            assert!(buffer_lines(&buf).iter().all(|line| line.trim().is_empty()));
        }

        #[test]
        fn items_outside_the_area_are_skipped() {
            let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
            surface(&mut buf).paint_item(
                ItemIndex::ZERO,
                &LabelItem::new("Item 0"),
                Size::new(units(10.0), units(3.0)),
                Affine::translate((0.0, units(40.0))),
            );
            assert!(buffer_lines(&buf).iter().all(|line| line.trim().is_empty()));
        }

        #[test]
        fn non_finite_transform_paints_nothing() {
            let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
            surface(&mut buf).paint_item(
                ItemIndex::ZERO,
                &LabelItem::new("Item 0"),
                Size::new(units(10.0), units(3.0)),
                Affine::translate((0.0, f64::NAN)),
            );
            assert!(buffer_lines(&buf).iter().all(|line| line.trim().is_empty()));
        }
    }
}

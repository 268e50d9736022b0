//! Layout, paint and hit-test benchmarks.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use deckview::config::WheelConfig;
use deckview::viewport::{
    FnProvider, ItemIndex, OffsetChannel, RecordingSurface, ScrollController, ViewMode, WheelItem,
    WheelViewport,
};
use kurbo::{Point, Size};

struct Card;

impl WheelItem for Card {}

type CardProvider = FnProvider<fn(ItemIndex) -> Option<Card>>;

fn card(_index: ItemIndex) -> Option<Card> {
    Some(Card)
}

fn size() -> Size {
    Size::new(800.0, 1200.0)
}

fn viewport(mode: ViewMode) -> WheelViewport<CardProvider, ScrollController> {
    let config = WheelConfig::builder(40.0).view_mode(mode).build().unwrap();
    let provider: CardProvider = FnProvider::new(Some(100_000), card);
    let mut vp = WheelViewport::new(config, provider, ScrollController::new(0.0));
    vp.attach();
    vp.layout(size());
    vp
}

/// Incremental scrolling: one slot per frame.
fn bench_incremental_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_scroll");
    for mode in [ViewMode::Flat, ViewMode::Top, ViewMode::Bottom] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            let mut vp = viewport(mode);
            let step = vp.projection().policy().slot_extent();
            b.iter(|| {
                for _ in 0..100 {
                    vp.channel_mut().scroll_by(step);
                    vp.layout(size());
                }
                vp.channel_mut().jump_to(0.0);
                vp.layout(size());
            });
        });
    }
    group.finish();
}

/// Disjoint jumps rebuild the whole window.
fn bench_jump(c: &mut Criterion) {
    let mut group = c.benchmark_group("jump");
    for mode in [ViewMode::Flat, ViewMode::Top, ViewMode::Bottom] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            let mut vp = viewport(mode);
            let mut far = false;
            b.iter(|| {
                far = !far;
                vp.channel_mut().jump_to(if far { 500_000.0 } else { 0.0 });
                vp.layout(size());
                black_box(vp.live_range());
            });
        });
    }
    group.finish();
}

fn bench_paint_and_hit_test(c: &mut Criterion) {
    let mut vp = viewport(ViewMode::Bottom);
    let mut surface = RecordingSurface::new();
    c.bench_function("paint_bottom", |b| {
        b.iter(|| {
            surface.clear();
            vp.paint(&mut surface);
        });
    });
    c.bench_function("hit_test_bottom", |b| {
        b.iter(|| black_box(vp.hit_test(black_box(Point::new(400.0, 1100.0)))));
    });
}

criterion_group!(
    benches,
    bench_incremental_scroll,
    bench_jump,
    bench_paint_and_hit_test
);
criterion_main!(benches);

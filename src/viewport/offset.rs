//! Offset channel: the scroll position source the viewport reads and reports to

use std::fmt;
use std::time::Duration;
use tracing::trace;

/// Callback invoked with the new offset whenever it changes.
pub type OffsetListener = Box<dyn FnMut(f64)>;

/// Handle returned by [`OffsetChannel::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw handle value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Easing curve for animated offset changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    #[default]
    EaseInOut,
    /// Hermite smoothstep.
    Smoothstep,
}

impl Curve {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    pub fn transform(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t * t,
            Curve::EaseOut => 1.0 - (1.0 - t).powi(3),
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Curve::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Where the viewport reads its scroll offset from and reports extents to.
pub trait OffsetChannel {
    /// Current scroll offset.
    fn current_offset(&self) -> f64;

    /// Report the viewport's extent along the scroll axis.
    ///
    /// Returns `false` if the channel changed the offset in response.
    fn apply_viewport_dimension(&mut self, dimension: f64) -> bool;

    /// Report the scrollable range, `min <= max`.
    ///
    /// Returns `false` if the channel corrected the offset, in which case
    /// the caller lays out again.
    fn apply_content_dimensions(&mut self, min: f64, max: f64) -> bool;

    /// Move to `offset` immediately, cancelling any animation.
    fn jump_to(&mut self, offset: f64);

    /// Animate to `offset` over `duration`.
    fn animate_to(&mut self, offset: f64, duration: Duration, curve: Curve);

    /// Register a change listener.
    fn add_listener(&mut self, listener: OffsetListener) -> ListenerId;

    /// Unregister a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    curve: Curve,
}

impl Tween {
    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn sample(&self) -> f64 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64().max(f64::EPSILON);
        self.from + (self.to - self.from) * self.curve.transform(t)
    }
}

/// In-memory offset channel with clamping, listeners and tweened animation.
///
/// Animations advance only through [`ScrollController::tick`]; the host
/// drives it once per frame.
pub struct ScrollController {
    offset: f64,
    min_extent: f64,
    max_extent: f64,
    viewport_dimension: f64,
    animation: Option<Tween>,
    listeners: Vec<(ListenerId, OffsetListener)>,
    next_listener: u64,
}

impl fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollController")
            .field("offset", &self.offset)
            .field("min_extent", &self.min_extent)
            .field("max_extent", &self.max_extent)
            .field("viewport_dimension", &self.viewport_dimension)
            .field("animation", &self.animation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollController {
    /// Create a controller at `initial_offset` with unbounded extents.
    pub fn new(initial_offset: f64) -> Self {
        Self {
            offset: initial_offset,
            min_extent: f64::NEG_INFINITY,
            max_extent: f64::INFINITY,
            viewport_dimension: 0.0,
            animation: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Smallest offset reported by the viewport.
    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    /// Largest offset reported by the viewport.
    pub fn max_extent(&self) -> f64 {
        self.max_extent
    }

    /// Last reported viewport dimension.
    pub fn viewport_dimension(&self) -> f64 {
        self.viewport_dimension
    }

    /// Whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the in-flight animation.
    pub fn animation_target(&self) -> Option<f64> {
        self.animation.map(|tween| tween.to)
    }

    /// Scroll by `delta`, clamped to the reported extents.
    pub fn scroll_by(&mut self, delta: f64) {
        self.animation = None;
        let target = self.clamp(self.offset + delta);
        self.set_offset(target);
    }

    /// Advance the in-flight animation by `dt`.
    ///
    /// Returns `true` if an animation was running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(mut tween) = self.animation.take() else {
            return false;
        };
        tween.elapsed += dt;
        let value = if tween.is_done() { tween.to } else { tween.sample() };
        if !tween.is_done() {
            self.animation = Some(tween);
        }
        let clamped = self.clamp(value);
        self.set_offset(clamped);
        true
    }

    fn clamp(&self, offset: f64) -> f64 {
        if offset < self.min_extent {
            self.min_extent
        } else if offset > self.max_extent {
            self.max_extent
        } else {
            offset
        }
    }

    fn set_offset(&mut self, offset: f64) {
        if offset == self.offset || offset.is_nan() {
            return;
        }
        self.offset = offset;
        for (_, listener) in &mut self.listeners {
            listener(offset);
        }
    }
}

impl OffsetChannel for ScrollController {
    fn current_offset(&self) -> f64 {
        self.offset
    }

    fn apply_viewport_dimension(&mut self, dimension: f64) -> bool {
        self.viewport_dimension = dimension;
        true
    }

    fn apply_content_dimensions(&mut self, min: f64, max: f64) -> bool {
        self.min_extent = min;
        self.max_extent = max.max(min);
        let clamped = self.clamp(self.offset);
        if clamped == self.offset {
            return true;
        }
        trace!(from = self.offset, to = clamped, "Offset corrected");
        self.set_offset(clamped);
        false
    }

    fn jump_to(&mut self, offset: f64) {
        self.animation = None;
        self.set_offset(offset);
    }

    fn animate_to(&mut self, offset: f64, duration: Duration, curve: Curve) {
        if duration.is_zero() {
            self.jump_to(offset);
            return;
        }
        self.animation = Some(Tween {
            from: self.offset,
            to: offset,
            elapsed: Duration::ZERO,
            duration,
            curve,
        });
    }

    fn add_listener(&mut self, listener: OffsetListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }
}

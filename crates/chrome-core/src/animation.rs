//! Animation primitive consumed from the rendering layer
//!
//! The chrome never draws. It asks a [`RenderLayer`] to move a view from a
//! start state to an end state and receives an [`AnimationHandle`] it can
//! either await or explicitly leave running in the background.
//!
//! There is no cancellation token: starting a new animation (or snapping)
//! on a view supersedes whatever was running on it, and the superseded
//! handle resolves to [`AnimationOutcome::Superseded`].

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::view::{View, ViewProps};

// =============================================================================
// Easing
// =============================================================================

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Accelerate
    EaseIn,
    /// Decelerate
    EaseOut,
    /// Accelerate then decelerate
    EaseInOut,
    /// House curve, quick start with a long settle
    #[default]
    Standard,
    /// Custom cubic-bezier control points
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Cubic-bezier control points `(x1, y1, x2, y2)`
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::EaseIn => (0.4, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.2, 1.0),
            Easing::EaseInOut => (0.4, 0.0, 0.2, 1.0),
            Easing::Standard => (0.17, 0.73, 0.14, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Eased progress for linear progress `t` in `0..=1`
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        let (x1, y1, x2, y2) = self.control_points();
        if x1 == y1 && x2 == y2 {
            return t;
        }

        // x(s) is monotonic for control points within 0..=1, so bisect.
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        let mut s = t;
        for _ in 0..32 {
            let x = bezier(x1, x2, s);
            if (x - t).abs() < 1e-5 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }

        bezier(y1, y2, s)
    }
}

fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

// =============================================================================
// Property Sets
// =============================================================================

/// Subset of view properties an animation drives
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropertySet {
    /// Opacity
    pub opacity: Option<f32>,
    /// Horizontal position
    pub x: Option<f32>,
    /// Vertical position
    pub y: Option<f32>,
    /// Visibility
    pub visible: Option<bool>,
}

impl PropertySet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set x
    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    /// Set y
    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    /// Set visibility
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Whether nothing is set
    pub fn is_empty(&self) -> bool {
        self.opacity.is_none() && self.x.is_none() && self.y.is_none() && self.visible.is_none()
    }

    /// Write the set values into `props`
    pub fn apply_to(&self, props: &mut ViewProps) {
        if let Some(opacity) = self.opacity {
            props.opacity = opacity;
        }
        if let Some(x) = self.x {
            props.x = x;
        }
        if let Some(y) = self.y {
            props.y = y;
        }
        if let Some(visible) = self.visible {
            props.visible = visible;
        }
    }

    /// Numeric values between `from` and this set at eased progress `p`
    pub fn interpolate(&self, from: &ViewProps, p: f32) -> PropertySet {
        let lerp = |a: f32, b: f32| a + (b - a) * p;
        PropertySet {
            opacity: self.opacity.map(|to| lerp(from.opacity, to)),
            x: self.x.map(|to| lerp(from.x, to)),
            y: self.y.map(|to| lerp(from.y, to)),
            visible: None,
        }
    }
}

// =============================================================================
// Animations
// =============================================================================

/// A single transition of one view
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Total duration
    pub duration: Duration,
    /// Easing curve
    pub easing: Easing,
    /// Applied immediately when the animation starts
    pub start: Option<PropertySet>,
    /// Reached when the animation completes
    pub end: PropertySet,
}

impl Animation {
    /// Animate from the current state to `end`
    pub fn new(duration: Duration, end: PropertySet) -> Self {
        Self {
            duration,
            easing: Easing::default(),
            start: None,
            end,
        }
    }

    /// Animate from the current state to `end` over `duration`
    pub fn to(end: PropertySet, duration: Duration) -> Self {
        Self::new(duration, end)
    }

    /// Fade from transparent and visible to `opacity`
    pub fn fade_in(duration: Duration, opacity: f32) -> Self {
        Self::new(duration, PropertySet::new().opacity(opacity))
            .with_start(PropertySet::new().opacity(0.0).visible(true))
    }

    /// Fade from opaque and visible to transparent
    pub fn fade_out(duration: Duration) -> Self {
        Self::new(duration, PropertySet::new().opacity(0.0))
            .with_start(PropertySet::new().opacity(1.0).visible(true))
    }

    /// Set the start state
    pub fn with_start(mut self, start: PropertySet) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// How an animation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// Reached its end state
    Completed,
    /// A newer animation or snap on the same view took over
    Superseded,
}

type OutcomeFuture = Pin<Box<dyn Future<Output = AnimationOutcome> + Send>>;

/// Awaitable handle to a running animation
#[must_use = "await the handle or call run_in_background()"]
#[derive(Debug)]
pub struct AnimationHandle {
    inner: HandleInner,
}

#[derive(Debug)]
enum HandleInner {
    Ready(AnimationOutcome),
    Pending(oneshot::Receiver<AnimationOutcome>),
}

/// Completion side of an [`AnimationHandle`]
#[derive(Debug)]
pub struct AnimationCompleter {
    tx: oneshot::Sender<AnimationOutcome>,
}

impl AnimationCompleter {
    /// Resolve the paired handle
    pub fn complete(self, outcome: AnimationOutcome) {
        // The caller may have chosen not to await.
        let _ = self.tx.send(outcome);
    }
}

impl AnimationHandle {
    /// Handle that is already resolved
    pub fn ready(outcome: AnimationOutcome) -> Self {
        Self {
            inner: HandleInner::Ready(outcome),
        }
    }

    /// Handle that already completed
    pub fn completed() -> Self {
        Self::ready(AnimationOutcome::Completed)
    }

    /// Pending handle and its completer
    pub fn pending() -> (AnimationCompleter, Self) {
        let (tx, rx) = oneshot::channel();
        (
            AnimationCompleter { tx },
            Self {
                inner: HandleInner::Pending(rx),
            },
        )
    }

    /// Let the animation run on without waiting for it
    pub fn run_in_background(self) {}
}

impl IntoFuture for AnimationHandle {
    type Output = AnimationOutcome;
    type IntoFuture = OutcomeFuture;

    fn into_future(self) -> Self::IntoFuture {
        match self.inner {
            HandleInner::Ready(outcome) => Box::pin(std::future::ready(outcome)),
            HandleInner::Pending(rx) => Box::pin(async move {
                rx.await.unwrap_or(AnimationOutcome::Superseded)
            }),
        }
    }
}

// =============================================================================
// Rendering Layer
// =============================================================================

/// Capabilities the chrome consumes from the native rendering layer
pub trait RenderLayer: Send + Sync + 'static {
    /// Start animating `view`
    fn animate(&self, view: &Arc<View>, animation: Animation) -> AnimationHandle;

    /// Mount `view`; the layer calls [`View::mark_attached`] once it is on screen
    fn attach(&self, view: &Arc<View>);

    /// Unmount `view`
    fn detach(&self, view: &Arc<View>);

    /// Raise `view` above its siblings
    fn bring_to_front(&self, view: &Arc<View>);
}

/// Reference rendering layer driven by the tokio clock
///
/// Steps every frame interval, interpolating numeric properties along the
/// easing curve. Requires a tokio runtime.
#[derive(Debug)]
pub struct TimedRenderer {
    frame: Duration,
    top_z: AtomicI32,
}

impl TimedRenderer {
    /// Create a renderer stepping once per `frame`
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            top_z: AtomicI32::new(0),
        }
    }

    /// Frame interval
    pub fn frame(&self) -> Duration {
        self.frame
    }
}

impl Default for TimedRenderer {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::DEFAULT_FRAME_INTERVAL_MS))
    }
}

impl RenderLayer for TimedRenderer {
    fn animate(&self, view: &Arc<View>, animation: Animation) -> AnimationHandle {
        let generation = view.bump_generation();
        if let Some(start) = &animation.start {
            view.apply(start);
        }

        if animation.duration.is_zero() {
            view.apply(&animation.end);
            return AnimationHandle::completed();
        }

        let (completer, handle) = AnimationHandle::pending();
        let view = Arc::clone(view);
        let frame = self.frame;

        tokio::spawn(async move {
            let from = view.props();
            let started = Instant::now();

            loop {
                tokio::time::sleep(frame).await;
                if view.generation() != generation {
                    completer.complete(AnimationOutcome::Superseded);
                    return;
                }

                let elapsed = started.elapsed();
                if elapsed >= animation.duration {
                    break;
                }

                let t = elapsed.as_secs_f32() / animation.duration.as_secs_f32();
                let step = animation.end.interpolate(&from, animation.easing.sample(t));
                view.apply(&step);
            }

            view.apply(&animation.end);
            completer.complete(AnimationOutcome::Completed);
        });

        handle
    }

    fn attach(&self, view: &Arc<View>) {
        let view = Arc::clone(view);
        let frame = self.frame;
        tokio::spawn(async move {
            tokio::time::sleep(frame).await;
            view.mark_attached();
        });
    }

    fn detach(&self, view: &Arc<View>) {
        view.bump_generation();
        view.mark_detached();
    }

    fn bring_to_front(&self, view: &Arc<View>) {
        let z = self.top_z.fetch_add(1, Ordering::SeqCst) + 1;
        view.set_z_index(z);
    }
}

// =============================================================================
// Tests
// =============================================================================

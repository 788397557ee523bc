//! Test utilities and fixtures for chrome testing
//!
//! This module provides a recording rendering layer and page fixtures
//! shared by the unit and integration tests of every chrome crate.

#![allow(dead_code)] // Test utilities may not all be used yet

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::animation::{Animation, AnimationHandle, RenderLayer, TimedRenderer};
use crate::view::View;

/// One recorded animation start
#[derive(Debug, Clone)]
pub struct AnimationRecord {
    /// Name of the animated view
    pub view: String,
    /// Requested animation
    pub animation: Animation,
}

/// How the recording renderer resolves animations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// Jump to the end state and resolve immediately
    Instant,
    /// Run on the tokio clock like [`TimedRenderer`]
    Timed,
}

#[derive(Debug, Default)]
struct Recorded {
    animations: Vec<AnimationRecord>,
    attached: Vec<String>,
    detached: Vec<String>,
    raised: Vec<String>,
    in_flight: HashMap<String, usize>,
    max_in_flight: HashMap<String, usize>,
}

/// Rendering layer that records every call
#[derive(Debug)]
pub struct RecordingRenderer {
    mode: RecordingMode,
    auto_attach: bool,
    timed: TimedRenderer,
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingRenderer {
    /// Renderer resolving animations instantly
    pub fn instant() -> Arc<Self> {
        Arc::new(Self::with_mode(RecordingMode::Instant))
    }

    /// Renderer running animations on the tokio clock
    pub fn timed() -> Arc<Self> {
        Arc::new(Self::with_mode(RecordingMode::Timed))
    }

    /// Renderer that never confirms attachment on its own
    pub fn manual_attach(mode: RecordingMode) -> Arc<Self> {
        Arc::new(Self {
            auto_attach: false,
            ..Self::with_mode(mode)
        })
    }

    fn with_mode(mode: RecordingMode) -> Self {
        Self {
            mode,
            auto_attach: true,
            timed: TimedRenderer::new(Duration::from_millis(16)),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// All animation starts so far
    pub fn animations(&self) -> Vec<AnimationRecord> {
        self.recorded.lock().animations.clone()
    }

    /// Animation starts on the named view
    pub fn animations_of(&self, view: &str) -> Vec<AnimationRecord> {
        self.recorded
            .lock()
            .animations
            .iter()
            .filter(|r| r.view == view)
            .cloned()
            .collect()
    }

    /// Number of animation starts
    pub fn animation_count(&self) -> usize {
        self.recorded.lock().animations.len()
    }

    /// Highest number of simultaneous animations seen on the named view
    pub fn max_in_flight(&self, view: &str) -> usize {
        self.recorded
            .lock()
            .max_in_flight
            .get(view)
            .copied()
            .unwrap_or(0)
    }

    /// Names of attached views, in order
    pub fn attached(&self) -> Vec<String> {
        self.recorded.lock().attached.clone()
    }

    /// Names of detached views, in order
    pub fn detached(&self) -> Vec<String> {
        self.recorded.lock().detached.clone()
    }

    /// Names of views brought to front, in order
    pub fn raised(&self) -> Vec<String> {
        self.recorded.lock().raised.clone()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        let mut recorded = self.recorded.lock();
        recorded.animations.clear();
        recorded.attached.clear();
        recorded.detached.clear();
        recorded.raised.clear();
        recorded.max_in_flight.clear();
    }
}

impl RenderLayer for RecordingRenderer {
    fn animate(&self, view: &Arc<View>, animation: Animation) -> AnimationHandle {
        let name = view.name().to_string();
        {
            let mut recorded = self.recorded.lock();
            recorded.animations.push(AnimationRecord {
                view: name.clone(),
                animation: animation.clone(),
            });
        }

        match self.mode {
            RecordingMode::Instant => {
                view.bump_generation();
                if let Some(start) = &animation.start {
                    view.apply(start);
                }
                view.apply(&animation.end);
                AnimationHandle::completed()
            }
            RecordingMode::Timed => {
                {
                    let mut recorded = self.recorded.lock();
                    let count = recorded.in_flight.entry(name.clone()).or_insert(0);
                    *count += 1;
                    let current = *count;
                    let max = recorded.max_in_flight.entry(name.clone()).or_insert(0);
                    *max = (*max).max(current);
                }

                let inner = self.timed.animate(view, animation);
                let (completer, handle) = AnimationHandle::pending();
                let recorded = Arc::clone(&self.recorded);
                tokio::spawn(async move {
                    let outcome = inner.await;
                    if let Some(count) = recorded.lock().in_flight.get_mut(&name) {
                        *count = count.saturating_sub(1);
                    }
                    completer.complete(outcome);
                });
                handle
            }
        }
    }

    fn attach(&self, view: &Arc<View>) {
        self.recorded.lock().attached.push(view.name().to_string());
        if self.auto_attach {
            view.mark_attached();
        }
    }

    fn detach(&self, view: &Arc<View>) {
        self.recorded.lock().detached.push(view.name().to_string());
        view.bump_generation();
        view.mark_detached();
    }

    fn bring_to_front(&self, view: &Arc<View>) {
        self.recorded.lock().raised.push(view.name().to_string());
        self.timed.bring_to_front(view);
    }
}

/// Page type fixtures
pub mod pages {
    use crate::page::{keys, PageIdentity, PageRef, PageTemplate, PageTransition};

    /// Tab set fixture
    #[derive(Debug, Default)]
    pub struct MainTabs;

    /// Second tab set fixture
    #[derive(Debug, Default)]
    pub struct SettingsTabs;

    /// Home page type (tab-bearing)
    pub struct HomePage;

    /// Search page type (tab-bearing)
    pub struct SearchPage;

    /// Detail page type (nav bar only)
    pub struct DetailPage;

    /// Login page type (no chrome)
    pub struct LoginPage;

    /// Popup page type
    pub struct PickerPopup;

    impl PageTemplate for HomePage {
        fn build() -> PageIdentity {
            PageIdentity::new::<HomePage>()
                .with_tabs::<MainTabs>()
                .with_data(keys::TOP_MENU, "true")
        }
    }

    impl PageTemplate for SearchPage {
        fn build() -> PageIdentity {
            PageIdentity::new::<SearchPage>().with_tabs::<MainTabs>()
        }
    }

    impl PageTemplate for DetailPage {
        fn build() -> PageIdentity {
            PageIdentity::new::<DetailPage>().with_nav_bar()
        }
    }

    /// Tab-bearing home page
    pub fn home() -> PageRef {
        HomePage::build().shared()
    }

    /// Tab-bearing search page
    pub fn search() -> PageRef {
        SearchPage::build().shared()
    }

    /// Nav-bar page without tabs
    pub fn detail() -> PageRef {
        DetailPage::build().shared()
    }

    /// Nav-bar page without tabs that declares no transition
    pub fn detail_without_transition() -> PageRef {
        DetailPage::build()
            .with_transition(PageTransition::None)
            .shared()
    }

    /// Page without any chrome
    pub fn login() -> PageRef {
        PageIdentity::new::<LoginPage>().shared()
    }

    /// Popup that would carry tabs and a nav bar if it were a regular page
    pub fn picker_popup() -> PageRef {
        PageIdentity::popup::<PickerPopup>()
            .with_tabs::<MainTabs>()
            .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationOutcome;

    #[tokio::test]
    async fn test_instant_mode_records_and_applies() {
        let renderer = RecordingRenderer::instant();
        let view = View::new("tabs");

        let outcome = renderer
            .animate(&view, Animation::fade_out(Duration::from_millis(300)))
            .await;

        assert_eq!(outcome, AnimationOutcome::Completed);
        assert_eq!(view.opacity(), 0.0);
        assert_eq!(renderer.animations_of("tabs").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_mode_tracks_in_flight() {
        let renderer = RecordingRenderer::timed();
        let view = View::new("drawer");

        let first = renderer.animate(&view, Animation::fade_in(Duration::from_millis(300), 1.0));
        let second = renderer.animate(&view, Animation::fade_out(Duration::from_millis(300)));
        first.await;
        second.await;

        assert_eq!(renderer.max_in_flight("drawer"), 2);
        assert_eq!(renderer.animation_count(), 2);
    }

    #[test]
    fn test_manual_attach() {
        let renderer = RecordingRenderer::manual_attach(RecordingMode::Instant);
        let view = View::new("drawer");
        renderer.attach(&view);
        assert!(!view.is_attached());
        assert_eq!(renderer.attached(), vec!["drawer".to_string()]);
    }
}

//! Shared tab bar
//!
//! One tab bar exists per tab-set type for the whole session. Its
//! visibility converges toward the state the latest navigation event asks
//! for:
//!
//! | origin \ destination | tab-bearing   | other          |
//! |----------------------|---------------|----------------|
//! | tab-bearing          | snap visible  | fade out, hide |
//! | other                | show, fade in | snap hidden    |
//!
//! A request the bar is already at, or already animating toward, starts
//! nothing. Completion continuations only commit when no newer request
//! has arrived in the meantime.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

use chrome_core::{
    Animation, AnimationOutcome, ChromeConfig, NavigationEvent, PageIdentity, PageRef,
    PageTemplate, PageTransition, PageType, PropertySet, RenderLayer, TabPosition, TabSetType,
    View,
};
use chrome_state::Navigator;

use crate::tab_resolver::resolve_selected_tab;
use crate::tokens::{easing, sizing};

/// Capacity of the selection-changed channel
const SELECTION_CHANNEL_CAPACITY: usize = 32;

// =============================================================================
// Tab Sets
// =============================================================================

/// A declared set of tabs
pub trait TabSet: Default + Send + Sync + 'static {
    /// Tabs in display order
    fn tabs(&self) -> Vec<TabSpec>;
}

/// Declaration of a single tab
#[derive(Debug, Clone)]
pub struct TabSpec {
    label: String,
    icon: Option<String>,
    target: Option<PageType>,
    factory: Option<fn() -> PageIdentity>,
    transition: PageTransition,
}

impl TabSpec {
    /// Tab without a target page
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            target: None,
            factory: None,
            transition: PageTransition::None,
        }
    }

    /// Tab that opens page `P`
    pub fn to<P: PageTemplate>(label: impl Into<String>) -> Self {
        Self {
            target: Some(PageType::of::<P>()),
            factory: Some(P::build),
            ..Self::new(label)
        }
    }

    /// Set the icon name
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Transition used when the tab navigates
    pub fn with_transition(mut self, transition: PageTransition) -> Self {
        self.transition = transition;
        self
    }

    /// Label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Icon name
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Target page type
    pub fn target(&self) -> Option<PageType> {
        self.target
    }

    /// Transition used when the tab navigates
    pub fn transition(&self) -> PageTransition {
        self.transition
    }
}

/// A tab and its view
#[derive(Debug)]
pub struct Tab {
    spec: TabSpec,
    view: Arc<View>,
}

impl Tab {
    /// Declaration
    pub fn spec(&self) -> &TabSpec {
        &self.spec
    }

    /// View carrying the "active" marker
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Label
    pub fn label(&self) -> &str {
        self.spec.label()
    }
}

// =============================================================================
// Tab Bar
// =============================================================================

/// Visibility phase of a tab bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabBarPhase {
    /// Not shown
    Hidden,
    /// Shown at full opacity
    VisibleStatic,
    /// Fading in
    AnimatingIn,
    /// Fading out, hidden on completion
    AnimatingOut,
}

impl TabBarPhase {
    /// Visibility this phase ends in
    pub fn target_visible(&self) -> bool {
        matches!(self, TabBarPhase::VisibleStatic | TabBarPhase::AnimatingIn)
    }
}

/// What a navigation event did to the tab bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabBarReaction {
    /// Popup or stale event
    Ignored,
    /// Already at or converging to the requested state
    Unchanged,
    /// Jumped to the requested state
    Snapped,
    /// Fade-in started
    FadingIn,
    /// Fade-out started
    FadingOut,
}

/// Selection change notification for one tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Tab index
    pub index: usize,
    /// New state
    pub selected: bool,
}

#[derive(Debug)]
struct VisibilityState {
    phase: TabBarPhase,
    generation: u64,
}

/// Session-wide tab bar for one tab set
pub struct TabBar {
    tab_set: TabSetType,
    view: Arc<View>,
    tabs: Vec<Tab>,
    renderer: Arc<dyn RenderLayer>,
    fade_duration: Duration,
    state: Mutex<VisibilityState>,
    selection: Mutex<Option<usize>>,
    selection_tx: broadcast::Sender<SelectionChanged>,
}

impl std::fmt::Debug for TabBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabBar")
            .field("tab_set", &self.tab_set)
            .field("tabs", &self.tabs.len())
            .field("phase", &self.phase())
            .finish()
    }
}

impl TabBar {
    /// Create the tab bar for tab set `T`
    pub fn new<T: TabSet>(renderer: Arc<dyn RenderLayer>, config: &ChromeConfig) -> Arc<Self> {
        let tab_set = TabSetType::of::<T>();
        let view = View::new(format!("tab-bar:{}", tab_set.short_name()));
        view.set_height(sizing::TAB_BAR_HEIGHT);
        view.set_visible(false);

        let tabs = T::default()
            .tabs()
            .into_iter()
            .map(|spec| Tab {
                view: View::new(format!("tab:{}", spec.label())),
                spec,
            })
            .collect();

        let (selection_tx, _) = broadcast::channel(SELECTION_CHANNEL_CAPACITY);

        Arc::new(Self {
            tab_set,
            view,
            tabs,
            renderer,
            fade_duration: config.default_duration(),
            state: Mutex::new(VisibilityState {
                phase: TabBarPhase::Hidden,
                generation: 0,
            }),
            selection: Mutex::new(None),
            selection_tx,
        })
    }

    /// Tab set this bar shows
    pub fn tab_set(&self) -> TabSetType {
        self.tab_set
    }

    /// Bar view
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Index of the tab with `label`
    pub fn find_tab(&self, label: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.label() == label)
    }

    /// Current visibility phase
    pub fn phase(&self) -> TabBarPhase {
        self.state.lock().phase
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// React to a navigation starting while `active` is the current page
    pub fn on_navigation_starting(
        self: &Arc<Self>,
        event: &NavigationEvent,
        active: Option<&PageRef>,
    ) -> TabBarReaction {
        if event.involves_popup() {
            return TabBarReaction::Ignored;
        }

        if let Some(active) = active {
            if !event.references(active) {
                tracing::warn!(
                    tab_set = ?self.tab_set,
                    active = ?active.page_type(),
                    "ignoring navigation event that references neither endpoint as active page"
                );
                return TabBarReaction::Ignored;
            }
        }

        let bears = |page: &Option<PageRef>| {
            page.as_ref()
                .is_some_and(|p| p.is_tab_bearing_for(self.tab_set))
        };

        match (bears(&event.from), bears(&event.to)) {
            (false, true) => self.fade_in(),
            (true, false) => self.fade_out(),
            (_, visible) => self.snap(visible),
        }
    }

    fn fade_in(self: &Arc<Self>) -> TabBarReaction {
        let generation = {
            let mut state = self.state.lock();
            if state.phase.target_visible() {
                return TabBarReaction::Unchanged;
            }
            state.phase = TabBarPhase::AnimatingIn;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(tab_set = ?self.tab_set, "fading tab bar in");
        let animation = Animation::fade_in(self.fade_duration, 1.0).with_easing(easing::FADE);
        self.await_completion(animation, generation, TabBarPhase::VisibleStatic);
        TabBarReaction::FadingIn
    }

    fn fade_out(self: &Arc<Self>) -> TabBarReaction {
        let generation = {
            let mut state = self.state.lock();
            if !state.phase.target_visible() {
                return TabBarReaction::Unchanged;
            }
            state.phase = TabBarPhase::AnimatingOut;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(tab_set = ?self.tab_set, "fading tab bar out");
        let animation = Animation::fade_out(self.fade_duration).with_easing(easing::FADE);
        self.await_completion(animation, generation, TabBarPhase::Hidden);
        TabBarReaction::FadingOut
    }

    /// Start `animation` and commit `settled` once it completes, unless superseded
    fn await_completion(self: &Arc<Self>, animation: Animation, generation: u64, settled: TabBarPhase) {
        let handle = self.renderer.animate(&self.view, animation);
        let bar: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            if handle.await != AnimationOutcome::Completed {
                return;
            }
            let Some(bar) = bar.upgrade() else {
                return;
            };

            let mut state = bar.state.lock();
            if state.generation != generation {
                return;
            }
            state.phase = settled;
            if settled == TabBarPhase::Hidden {
                bar.view.set_visible(false);
            }
        });
    }

    fn snap(&self, visible: bool) -> TabBarReaction {
        let opacity = if visible { 1.0 } else { 0.0 };
        {
            let mut state = self.state.lock();
            let target = if visible {
                TabBarPhase::VisibleStatic
            } else {
                TabBarPhase::Hidden
            };
            let at_target = state.phase == target
                && self.view.is_visible() == visible
                && (!visible || self.view.opacity() == opacity);
            let converging = matches!(
                state.phase,
                TabBarPhase::AnimatingIn | TabBarPhase::AnimatingOut
            ) && state.phase.target_visible() == visible;
            if at_target || converging {
                return TabBarReaction::Unchanged;
            }

            state.phase = target;
            state.generation += 1;
        }

        self.view
            .snap(&PropertySet::new().visible(visible).opacity(opacity));
        TabBarReaction::Snapped
    }

    /// Pin the bar per the layout mode
    ///
    /// `nav_bottom` is the bottom edge of the navigation bar background.
    pub fn position(&self, position: TabPosition, nav_bottom: f32, root_height: f32) {
        let y = match position {
            TabPosition::Top => nav_bottom,
            TabPosition::Bottom => root_height - self.view.height(),
        };
        self.view.set_y(y);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select the tab at `index`, deselecting every other tab
    ///
    /// Returns `false` when `index` is out of range. With `notify`, one
    /// [`SelectionChanged`] is sent per tab whose state changed.
    pub fn select(&self, index: usize, notify: bool) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.apply_selection(Some(index), notify);
        true
    }

    /// Deselect every tab
    pub fn deselect_all(&self, notify: bool) {
        self.apply_selection(None, notify);
    }

    fn apply_selection(&self, index: Option<usize>, notify: bool) {
        let changed: Vec<SelectionChanged> = {
            let mut selection = self.selection.lock();
            *selection = index;
            self.tabs
                .iter()
                .enumerate()
                .filter_map(|(i, tab)| {
                    let selected = Some(i) == index;
                    if tab.view.is_active() == selected {
                        return None;
                    }
                    tab.view.set_active(selected);
                    Some(SelectionChanged { index: i, selected })
                })
                .collect()
        };

        if notify {
            for change in changed {
                // No subscribers is fine.
                let _ = self.selection_tx.send(change);
            }
        }
    }

    /// Index of the selected tab
    pub fn selected_index(&self) -> Option<usize> {
        *self.selection.lock()
    }

    /// Whether the tab at `index` is selected
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_index() == Some(index)
    }

    /// Subscribe to selection changes
    pub fn subscribe_selection(&self) -> broadcast::Receiver<SelectionChanged> {
        self.selection_tx.subscribe()
    }

    /// User tapped the tab at `index`
    ///
    /// Selects it with notification, then navigates to its target unless
    /// that page type is already showing. Returns whether it navigated.
    pub fn tap(&self, index: usize, navigator: &Navigator) -> bool {
        if !self.select(index, true) {
            return false;
        }

        let spec = &self.tabs[index].spec;
        let Some(factory) = spec.factory else {
            return false;
        };

        let showing = navigator
            .current_page()
            .is_some_and(|p| Some(p.page_type()) == spec.target);
        if showing {
            return false;
        }

        tracing::debug!(tab = spec.label(), "navigating to tab target");
        navigator.go(factory().with_transition(spec.transition).shared());
        true
    }

    /// Re-select the tab matching the navigator state, without notifying
    pub fn highlight_selected_tab(&self, navigator: &Navigator) -> Option<usize> {
        let stack = navigator.stack();
        let active = navigator.current_page();
        let resolved = resolve_selected_tab(
            self.tabs.iter().map(|t| &t.spec),
            stack.pages(),
            active.as_ref(),
        )?;
        self.select(resolved, false);
        Some(resolved)
    }
}

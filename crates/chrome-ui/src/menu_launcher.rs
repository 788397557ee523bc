//! Slide-in menu launcher
//!
//! The launcher owns an overlay scrim and a drawer holding the menu
//! content. One launcher exists per session: the first [`MenuLauncher::setup`]
//! attaches it, later calls return the same instance. Only a full refresh
//! releases it.
//!
//! # State
//!
//! - `expanded`: the menu is open, or opening
//! - `animating`: a slide is running; toggles are rejected meanwhile
//! - `toggling`: show/hide is driven by [`MenuLauncher::toggle_menu`], which
//!   raises the single [`MenuToggled`] notification itself
//! - `close_requested`: a close arrived while the drawer was sliding in; it
//!   runs as soon as the open completes
//!
//! While the launcher lives it holds the highest-priority hardware back
//! handler, which closes an open menu and consumes the signal.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

use chrome_core::{
    Animation, ChromeError, HorizontalAlignment, PropertySet, RenderLayer, Result,
    SwipeDirection, View,
};
use chrome_state::{BackHandler, BackHandlerId, BackPriority, Navigator};

use crate::session::ChromeSession;
use crate::tokens::easing;

/// Capacity of the toggled channel
const TOGGLED_CHANNEL_CAPACITY: usize = 16;

/// Content shown inside the drawer
pub trait MenuContent: Default + Send + Sync + 'static {
    /// Populate the drawer view
    fn build(&self, _drawer: &Arc<View>) {}
}

/// Sent once per completed open or close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuToggled {
    /// Whether the menu is now open
    pub expanded: bool,
}

/// Edge the drawer slides from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawerEdge {
    Left,
    Right,
}

impl DrawerEdge {
    fn from_alignment(alignment: HorizontalAlignment) -> Result<Self> {
        match alignment {
            HorizontalAlignment::Left => Ok(DrawerEdge::Left),
            HorizontalAlignment::Right => Ok(DrawerEdge::Right),
            other => Err(ChromeError::UnsupportedAlignment(other)),
        }
    }

    /// Drawer x when closed and when open
    fn slide_positions(&self, container_width: f32, drawer_width: f32) -> (f32, f32) {
        match self {
            DrawerEdge::Left => (-drawer_width, 0.0),
            DrawerEdge::Right => (container_width, container_width - drawer_width),
        }
    }

    fn closing_swipe(&self) -> SwipeDirection {
        match self {
            DrawerEdge::Left => SwipeDirection::Left,
            DrawerEdge::Right => SwipeDirection::Right,
        }
    }
}

#[derive(Debug, Default)]
struct LauncherState {
    expanded: bool,
    animating: bool,
    toggling: bool,
    close_requested: bool,
}

/// Session-wide menu launcher for menu content `M`
pub struct MenuLauncher<M: MenuContent> {
    renderer: Arc<dyn RenderLayer>,
    navigator: Arc<Navigator>,
    edge: DrawerEdge,
    overlay_opacity: f32,
    slide_duration: Duration,
    fade_duration: Duration,
    container: Arc<View>,
    overlay: Arc<View>,
    drawer: Arc<View>,
    menu: M,
    state: Mutex<LauncherState>,
    toggled_tx: broadcast::Sender<MenuToggled>,
    back_handler: Mutex<Option<BackHandlerId>>,
}

impl<M: MenuContent> fmt::Debug for MenuLauncher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuLauncher")
            .field("menu", &type_name::<M>())
            .field("edge", &self.edge)
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl<M: MenuContent> MenuLauncher<M> {
    /// Set up the session's launcher, or return the existing one
    ///
    /// An unsupported alignment fails before anything is attached or
    /// animated. A live launcher for another menu type is an error.
    pub fn setup(session: &ChromeSession) -> Result<Arc<Self>> {
        let edge = DrawerEdge::from_alignment(session.config().menu_alignment)?;

        let mut built: Option<Arc<Self>> = None;
        let (existing, _) = session.launcher.get_or_create(|| {
            let launcher = Self::build(session, edge);
            built = Some(Arc::clone(&launcher));
            launcher as Arc<dyn LauncherControl>
        });

        if let Some(launcher) = built {
            launcher.attach();
            tracing::info!(menu = type_name::<M>(), edge = ?edge, "menu launcher set up");
            return Ok(launcher);
        }

        let existing_type = existing.menu_type();
        existing
            .into_any()
            .downcast::<Self>()
            .map_err(|_| ChromeError::LauncherTypeMismatch {
                existing: existing_type,
                requested: type_name::<M>(),
            })
    }

    /// The session's launcher, if one for `M` is set up
    pub fn current(session: &ChromeSession) -> Option<Arc<Self>> {
        session.launcher.get()?.into_any().downcast::<Self>().ok()
    }

    fn build(session: &ChromeSession, edge: DrawerEdge) -> Arc<Self> {
        let config = session.config();
        let env = session.environment();

        let container = View::new("menu-launcher");
        container.set_size(env.root_width, env.root_height);
        container.set_visible(false);

        let overlay = View::new("menu-overlay");
        overlay.set_size(env.root_width, env.root_height);
        overlay.update(|p| {
            p.opacity = 0.0;
            p.visible = false;
        });

        let drawer = View::new("menu-drawer");
        drawer.set_size(config.menu_width, env.root_height);
        let (closed_x, _) = edge.slide_positions(env.root_width, config.menu_width);
        drawer.update(|p| {
            p.x = closed_x;
            p.visible = false;
        });

        let (toggled_tx, _) = broadcast::channel(TOGGLED_CHANNEL_CAPACITY);

        Arc::new(Self {
            renderer: Arc::clone(session.renderer()),
            navigator: Arc::clone(session.navigator()),
            edge,
            overlay_opacity: config.overlay_opacity,
            slide_duration: config.default_duration(),
            fade_duration: config.fade_duration(),
            container,
            overlay,
            drawer,
            menu: M::default(),
            state: Mutex::new(LauncherState::default()),
            toggled_tx,
            back_handler: Mutex::new(None),
        })
    }

    fn attach(self: &Arc<Self>) {
        self.menu.build(&self.drawer);
        self.renderer.attach(&self.container);
        self.renderer.attach(&self.overlay);
        self.renderer.attach(&self.drawer);

        let handler = Arc::new(LauncherBackHandler {
            launcher: Arc::downgrade(self),
        });
        let id = self
            .navigator
            .back_handlers()
            .register(BackPriority::HIGHEST, handler);
        *self.back_handler.lock() = Some(id);
    }

    /// Menu content
    pub fn menu(&self) -> &M {
        &self.menu
    }

    /// Root view of the launcher
    pub fn container(&self) -> &Arc<View> {
        &self.container
    }

    /// Overlay scrim
    pub fn overlay(&self) -> &Arc<View> {
        &self.overlay
    }

    /// Drawer holding the menu
    pub fn drawer(&self) -> &Arc<View> {
        &self.drawer
    }

    /// Whether the menu is open
    pub fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    /// Whether a slide is running
    pub fn is_animating(&self) -> bool {
        self.state.lock().animating
    }

    /// Subscribe to open/close notifications
    pub fn subscribe_toggled(&self) -> broadcast::Receiver<MenuToggled> {
        self.toggled_tx.subscribe()
    }

    /// Wait for the drawer to be attached, raise the launcher, then toggle
    pub async fn show(&self) -> bool {
        self.drawer.attached().await;
        self.renderer.bring_to_front(&self.container);
        self.toggle_menu().await
    }

    /// Open a closed menu or close an open one
    ///
    /// Returns `false` without doing anything while a slide is running.
    pub async fn toggle_menu(&self) -> bool {
        let expand = {
            let mut state = self.state.lock();
            if state.animating || state.toggling {
                tracing::debug!("menu toggle rejected while animating");
                return false;
            }
            state.toggling = true;
            !state.expanded
        };

        if expand {
            self.show_menu().await;
        } else {
            self.hide_menu().await;
        }

        let (expanded, close_next) = {
            let mut state = self.state.lock();
            state.toggling = false;
            let close_next = state.expanded && std::mem::take(&mut state.close_requested);
            (state.expanded, close_next)
        };
        self.raise_toggled(expanded);

        if close_next {
            self.hide_menu().await;
        }
        true
    }

    /// Open the menu unless it is open or animating
    pub async fn show_menu(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.expanded || state.animating {
                return false;
            }
            state.expanded = true;
            state.animating = true;
        }

        let (closed_x, open_x) = self.positions();
        self.container.set_visible(true);
        self.drawer.set_visible(true);

        self.renderer
            .animate(
                &self.overlay,
                Animation::fade_in(self.fade_duration, self.overlay_opacity)
                    .with_easing(easing::FADE),
            )
            .run_in_background();

        let slide = Animation::new(self.slide_duration, PropertySet::new().x(open_x))
            .with_start(PropertySet::new().x(closed_x))
            .with_easing(easing::SLIDE);
        let outcome = self.renderer.animate(&self.drawer, slide).await;
        tracing::debug!(?outcome, "menu opened");

        if self.finish_animation(true) {
            self.hide_menu().await;
        }
        true
    }

    /// Close the menu unless it is closed
    ///
    /// While the drawer is still sliding in, the close is queued and runs
    /// once the open completes.
    pub async fn hide_menu(&self) -> bool {
        {
            let mut state = self.state.lock();
            if !state.expanded {
                return false;
            }
            if state.animating {
                state.close_requested = true;
                tracing::debug!("menu close queued behind running open");
                return true;
            }
            state.expanded = false;
            state.animating = true;
        }

        let (closed_x, _) = self.positions();

        self.renderer
            .animate(
                &self.overlay,
                Animation::new(self.fade_duration, PropertySet::new().opacity(0.0))
                    .with_easing(easing::FADE),
            )
            .run_in_background();

        let slide = Animation::new(self.slide_duration, PropertySet::new().x(closed_x))
            .with_easing(easing::SLIDE);
        let outcome = self.renderer.animate(&self.drawer, slide).await;
        tracing::debug!(?outcome, "menu closed");

        self.drawer.set_visible(false);
        self.overlay.set_visible(false);
        self.container.set_visible(false);

        self.finish_animation(false);
        true
    }

    fn positions(&self) -> (f32, f32) {
        self.edge
            .slide_positions(self.container.width(), self.drawer.width())
    }

    /// Returns whether a queued close should run now
    fn finish_animation(&self, expanded: bool) -> bool {
        let (notify, close_next) = {
            let mut state = self.state.lock();
            state.animating = false;
            if !expanded {
                state.close_requested = false;
            }
            let close_next =
                expanded && !state.toggling && std::mem::take(&mut state.close_requested);
            (!state.toggling, close_next)
        };
        if notify {
            self.raise_toggled(expanded);
        }
        close_next
    }

    fn raise_toggled(&self, expanded: bool) {
        // No subscribers is fine.
        let _ = self.toggled_tx.send(MenuToggled { expanded });
    }

    /// User tapped the scrim
    pub async fn on_overlay_tapped(&self) -> bool {
        if !self.is_expanded() {
            return false;
        }
        self.toggle_menu().await
    }

    /// User swiped across the launcher
    ///
    /// A swipe toward the drawer's edge closes an open menu.
    pub async fn on_swipe(&self, direction: SwipeDirection) -> bool {
        if direction != self.edge.closing_swipe() || !self.is_expanded() {
            return false;
        }
        self.toggle_menu().await
    }
}

/// Session-facing side of a launcher, independent of its menu type
pub(crate) trait LauncherControl: Send + Sync {
    fn menu_type(&self) -> &'static str;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Close the menu after a page change
    fn on_navigated(self: Arc<Self>);

    /// Drop the back handler and detach every view
    fn teardown(&self);
}

impl<M: MenuContent> LauncherControl for MenuLauncher<M> {
    fn menu_type(&self) -> &'static str {
        type_name::<M>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn on_navigated(self: Arc<Self>) {
        if !self.is_expanded() {
            return;
        }
        tokio::spawn(async move {
            self.hide_menu().await;
        });
    }

    fn teardown(&self) {
        if let Some(id) = self.back_handler.lock().take() {
            self.navigator.back_handlers().unregister(id);
        }
        self.renderer.detach(&self.drawer);
        self.renderer.detach(&self.overlay);
        self.renderer.detach(&self.container);
        tracing::debug!(menu = type_name::<M>(), "menu launcher torn down");
    }
}

struct LauncherBackHandler<M: MenuContent> {
    launcher: Weak<MenuLauncher<M>>,
}

#[async_trait]
impl<M: MenuContent> BackHandler for LauncherBackHandler<M> {
    async fn on_hardware_back(&self) -> bool {
        let Some(launcher) = self.launcher.upgrade() else {
            return false;
        };
        if !launcher.is_expanded() {
            return false;
        }
        launcher.hide_menu().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{session_with, settle, MockRenderer, OtherMenu, SideMenu};
    use chrome_core::test_utils::{pages, RecordingMode, RecordingRenderer};
    use chrome_core::ChromeConfig;
    use chrome_platform::DevicePlatform;
    use chrome_state::NavigationBus;

    #[tokio::test]
    async fn test_setup_is_idempotent() {
        let renderer = RecordingRenderer::instant();
        let session = session_with(renderer.clone(), ChromeConfig::default());

        let first = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        let second = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            renderer.attached(),
            vec!["menu-launcher", "menu-overlay", "menu-drawer"]
        );
        assert_eq!(session.navigator().back_handlers().len(), 1);
    }

    #[tokio::test]
    async fn test_setup_with_other_menu_type_fails() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        MenuLauncher::<SideMenu>::setup(&session).unwrap();

        let err = MenuLauncher::<OtherMenu>::setup(&session).unwrap_err();
        assert!(matches!(err, ChromeError::LauncherTypeMismatch { .. }));
        assert!(MenuLauncher::<OtherMenu>::current(&session).is_none());
        assert!(MenuLauncher::<SideMenu>::current(&session).is_some());
    }

    #[tokio::test]
    async fn test_unsupported_alignment_fails_before_animating() {
        for alignment in [HorizontalAlignment::Center, HorizontalAlignment::Stretch] {
            let mut renderer = MockRenderer::new();
            renderer.expect_animate().never();
            renderer.expect_attach().never();

            let navigator = Navigator::new(NavigationBus::new());
            let session = ChromeSession::builder(Arc::new(renderer), navigator)
                .config(ChromeConfig::default().with_menu_alignment(alignment))
                .platform(DevicePlatform::Ios)
                .build();

            let err = MenuLauncher::<SideMenu>::setup(&session).unwrap_err();
            assert!(matches!(err, ChromeError::UnsupportedAlignment(a) if a == alignment));
            assert!(MenuLauncher::<SideMenu>::current(&session).is_none());
        }
    }

    #[tokio::test]
    async fn test_drawer_starts_off_screen() {
        let session = session_with(
            RecordingRenderer::instant(),
            ChromeConfig::default().with_menu_width(300.0),
        );
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        assert_eq!(launcher.drawer().x(), -300.0);
        assert_eq!(launcher.drawer().width(), 300.0);
        assert_eq!(launcher.drawer().height(), 800.0);
        assert!(!launcher.container().is_visible());
    }

    #[tokio::test]
    async fn test_left_slide_positions() {
        let renderer = RecordingRenderer::instant();
        let session = session_with(renderer.clone(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        assert!(launcher.toggle_menu().await);
        assert!(launcher.is_expanded());
        assert_eq!(launcher.drawer().x(), 0.0);
        assert_eq!(launcher.overlay().opacity(), 0.35);

        assert!(launcher.toggle_menu().await);
        assert!(!launcher.is_expanded());
        assert_eq!(launcher.drawer().x(), -250.0);
        assert!(!launcher.drawer().is_visible());
    }

    #[tokio::test]
    async fn test_right_slide_positions() {
        let session = session_with(
            RecordingRenderer::instant(),
            ChromeConfig::default().with_menu_alignment(HorizontalAlignment::Right),
        );
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        assert_eq!(launcher.drawer().x(), 400.0);

        launcher.show_menu().await;
        assert_eq!(launcher.drawer().x(), 150.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_toggles_are_rejected() {
        let renderer = RecordingRenderer::timed();
        let session = session_with(renderer.clone(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        let (a, b, c) = tokio::join!(
            launcher.toggle_menu(),
            launcher.toggle_menu(),
            launcher.toggle_menu()
        );
        assert_eq!((a, b, c), (true, false, false));
        assert!(launcher.is_expanded());
        assert!(!launcher.is_animating());
        assert_eq!(renderer.max_in_flight("menu-drawer"), 1);

        assert!(launcher.toggle_menu().await);
        assert!(!launcher.is_expanded());
    }

    #[tokio::test]
    async fn test_toggled_raised_once_per_toggle() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        let mut rx = launcher.subscribe_toggled();

        launcher.toggle_menu().await;
        assert_eq!(rx.try_recv().unwrap(), MenuToggled { expanded: true });
        assert!(rx.try_recv().is_err());

        launcher.hide_menu().await;
        assert_eq!(rx.try_recv().unwrap(), MenuToggled { expanded: false });
        assert!(rx.try_recv().is_err());

        // Already closed
        assert!(!launcher.hide_menu().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_show_waits_for_attachment() {
        let renderer = RecordingRenderer::manual_attach(RecordingMode::Instant);
        let session = session_with(renderer.clone(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        let shown = tokio::spawn({
            let launcher = Arc::clone(&launcher);
            async move { launcher.show().await }
        });
        settle().await;
        assert!(!launcher.is_expanded());
        assert!(renderer.raised().is_empty());

        launcher.drawer().mark_attached();
        assert!(shown.await.unwrap());
        assert!(launcher.is_expanded());
        assert_eq!(renderer.raised(), vec!["menu-launcher"]);
    }

    #[tokio::test]
    async fn test_hardware_back_closes_open_menu() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let navigator = Arc::clone(session.navigator());
        navigator.go(pages::home());
        navigator.go(pages::detail());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        launcher.toggle_menu().await;
        assert!(navigator.hardware_back().await);
        assert!(!launcher.is_expanded());
        assert!(navigator.can_go_back());

        // Collapsed: default back navigation happens
        assert!(navigator.hardware_back().await);
        assert!(!navigator.can_go_back());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_during_open_closes_after_slide() {
        let session = session_with(RecordingRenderer::timed(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        let mut rx = launcher.subscribe_toggled();

        let opening = tokio::spawn({
            let launcher = Arc::clone(&launcher);
            async move { launcher.toggle_menu().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(launcher.is_animating());

        Arc::clone(&launcher).on_navigated();
        assert!(opening.await.unwrap());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!launcher.is_expanded());
        assert!(!launcher.is_animating());
        assert!(!launcher.drawer().is_visible());
        assert_eq!(rx.try_recv().unwrap(), MenuToggled { expanded: true });
        assert_eq!(rx.try_recv().unwrap(), MenuToggled { expanded: false });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hardware_back_during_open_closes_after_slide() {
        let session = session_with(RecordingRenderer::timed(), ChromeConfig::default());
        let navigator = Arc::clone(session.navigator());
        navigator.go(pages::home());
        navigator.go(pages::detail());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        let opening = tokio::spawn({
            let launcher = Arc::clone(&launcher);
            async move { launcher.show_menu().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(navigator.hardware_back().await);
        opening.await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!launcher.is_expanded());
        assert_eq!(launcher.drawer().x(), -250.0);
        assert!(navigator.can_go_back());
    }

    #[tokio::test]
    async fn test_overlay_tap_and_swipe_close() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        assert!(!launcher.on_overlay_tapped().await);
        launcher.toggle_menu().await;
        assert!(launcher.on_overlay_tapped().await);
        assert!(!launcher.is_expanded());

        launcher.toggle_menu().await;
        assert!(!launcher.on_swipe(SwipeDirection::Right).await);
        assert!(launcher.is_expanded());
        assert!(launcher.on_swipe(SwipeDirection::Left).await);
        assert!(!launcher.is_expanded());
    }

    #[tokio::test]
    async fn test_navigation_closes_menu() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        launcher.toggle_menu().await;

        Arc::clone(&launcher).on_navigated();
        settle().await;
        assert!(!launcher.is_expanded());
    }

    #[tokio::test]
    async fn test_teardown_on_reset() {
        let renderer = RecordingRenderer::instant();
        let session = session_with(renderer.clone(), ChromeConfig::default());
        let old = MenuLauncher::<SideMenu>::setup(&session).unwrap();

        session.reset();
        assert!(MenuLauncher::<SideMenu>::current(&session).is_none());
        assert!(session.navigator().back_handlers().is_empty());
        assert!(renderer.detached().contains(&"menu-drawer".to_string()));

        let fresh = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert_eq!(session.navigator().back_handlers().len(), 1);
    }
}

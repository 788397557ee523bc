//! Application-session context
//!
//! Holds the chrome that is shared across pages for one application
//! session instead of keeping it in process-wide statics:
//! - the navigation bar background (one per session)
//! - the menu launcher (first setup wins)
//! - one tab bar per tab-set type
//!
//! Pages bind to these but never own them. [`ChromeSession::reset`] (driven
//! by the full-refresh event) releases all of them; the next page
//! initialisation or launcher setup builds fresh instances. Components must
//! look shared chrome up through the session every time rather than keep
//! their own reference across a refresh.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrome_core::{ChromeConfig, RenderLayer, TabPosition, TabSetType, View};
use chrome_platform::{resolve_tab_position, DevicePlatform, LayoutEnvironment};
use chrome_state::{Navigator, SharedSlot};

use crate::menu_launcher::LauncherControl;
use crate::nav_bar_page::NavBarPage;
use crate::tab_bar::{TabBar, TabSet};
use crate::tokens::z_index;

/// Default root size when the host does not provide one
const DEFAULT_ROOT_SIZE: (f32, f32) = (390.0, 844.0);

/// Shared chrome for one application session
pub struct ChromeSession {
    config: ChromeConfig,
    platform: DevicePlatform,
    renderer: Arc<dyn RenderLayer>,
    navigator: Arc<Navigator>,
    root: Arc<View>,
    environment: Mutex<LayoutEnvironment>,
    nav_background: SharedSlot<View>,
    pub(crate) launcher: SharedSlot<dyn LauncherControl>,
    tab_bars: Mutex<HashMap<TabSetType, Arc<TabBar>>>,
    pages: Mutex<HashMap<String, Weak<NavBarPage>>>,
}

/// Builder for [`ChromeSession`]
pub struct ChromeSessionBuilder {
    config: ChromeConfig,
    platform: DevicePlatform,
    renderer: Arc<dyn RenderLayer>,
    navigator: Arc<Navigator>,
    root_size: (f32, f32),
}

impl ChromeSessionBuilder {
    /// Use `config`
    pub fn config(mut self, config: ChromeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the detected platform
    pub fn platform(mut self, platform: DevicePlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Size of the render root
    pub fn root_size(mut self, width: f32, height: f32) -> Self {
        self.root_size = (width, height);
        self
    }

    /// Build the session
    pub fn build(self) -> Arc<ChromeSession> {
        let (width, height) = self.root_size;
        let root = View::new("root");
        root.set_size(width, height);
        root.mark_attached();

        Arc::new(ChromeSession {
            config: self.config,
            platform: self.platform,
            renderer: self.renderer,
            navigator: self.navigator,
            root,
            environment: Mutex::new(LayoutEnvironment::new(width, height)),
            nav_background: SharedSlot::new(),
            launcher: SharedSlot::new(),
            tab_bars: Mutex::new(HashMap::new()),
            pages: Mutex::new(HashMap::new()),
        })
    }
}

impl ChromeSession {
    /// Start building a session
    pub fn builder(renderer: Arc<dyn RenderLayer>, navigator: Arc<Navigator>) -> ChromeSessionBuilder {
        ChromeSessionBuilder {
            config: ChromeConfig::default(),
            platform: DevicePlatform::current(),
            renderer,
            navigator,
            root_size: DEFAULT_ROOT_SIZE,
        }
    }

    /// Chrome configuration
    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    /// Device platform
    pub fn platform(&self) -> DevicePlatform {
        self.platform
    }

    /// Rendering layer
    pub fn renderer(&self) -> &Arc<dyn RenderLayer> {
        &self.renderer
    }

    /// Host navigator
    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Render root
    pub fn root(&self) -> &Arc<View> {
        &self.root
    }

    /// Current layout environment
    pub fn environment(&self) -> LayoutEnvironment {
        *self.environment.lock()
    }

    /// Record on-screen keyboard changes
    pub fn set_keyboard_visible(&self, visible: bool) {
        self.environment.lock().keyboard_visible = visible;
    }

    /// Resize the render root
    pub fn set_root_size(&self, width: f32, height: f32) {
        {
            let mut env = self.environment.lock();
            env.root_width = width;
            env.root_height = height;
        }
        self.root.set_size(width, height);
    }

    /// Where tab bars go for this session
    pub fn tab_position(&self) -> TabPosition {
        resolve_tab_position(self.config.tab_position, self.platform)
    }

    // =========================================================================
    // Navigation bar background
    // =========================================================================

    /// The shared navigation bar background, if created
    pub fn nav_background(&self) -> Option<Arc<View>> {
        self.nav_background.get()
    }

    /// The shared background, creating and attaching it on first use
    ///
    /// A freshly created background starts hidden unless the current page
    /// is chrome-bearing.
    pub fn nav_background_or_create(&self) -> Arc<View> {
        let (background, created) = self.nav_background.get_or_create(|| {
            let view = View::new("navbar-background");
            view.set_z_index(z_index::NAV_BAR_BACKGROUND);
            view.set_size(self.environment().root_width, 0.0);
            view
        });

        if created {
            let current_has_bar = self
                .navigator
                .current_page()
                .is_some_and(|p| p.is_chrome_bearing());
            background.set_visible(current_has_bar);
            self.renderer.attach(&background);
            tracing::debug!(visible = current_has_bar, "created navbar background");
        }

        background
    }

    /// Bumped every time a full refresh releases the background
    pub fn nav_background_generation(&self) -> u64 {
        self.nav_background.generation()
    }

    // =========================================================================
    // Tab bars
    // =========================================================================

    /// The tab bar for tab set `T`, if created
    pub fn tab_bar<T: TabSet>(&self) -> Option<Arc<TabBar>> {
        self.tab_bars.lock().get(&TabSetType::of::<T>()).cloned()
    }

    /// The tab bar for `tab_set`, if created
    pub fn tab_bar_for(&self, tab_set: TabSetType) -> Option<Arc<TabBar>> {
        self.tab_bars.lock().get(&tab_set).cloned()
    }

    /// The tab bar for tab set `T`, creating it hidden on first use
    pub fn tab_bar_or_create<T: TabSet>(&self) -> Arc<TabBar> {
        let tab_set = TabSetType::of::<T>();
        let bar = {
            let mut bars = self.tab_bars.lock();
            if let Some(bar) = bars.get(&tab_set) {
                return Arc::clone(bar);
            }
            let bar = TabBar::new::<T>(Arc::clone(&self.renderer), &self.config);
            bars.insert(tab_set, Arc::clone(&bar));
            bar
        };

        bar.view().set_size(self.environment().root_width, bar.view().height());
        self.renderer.attach(bar.view());
        tracing::debug!(tab_set = ?tab_set, "created tab bar");
        bar
    }

    /// All live tab bars
    pub fn tab_bars(&self) -> Vec<Arc<TabBar>> {
        self.tab_bars.lock().values().cloned().collect()
    }

    // =========================================================================
    // Page registry
    // =========================================================================

    pub(crate) fn register_page(&self, page: &Arc<NavBarPage>) {
        let mut pages = self.pages.lock();
        pages.retain(|_, weak| weak.strong_count() > 0);
        pages.insert(page.identity().key().to_string(), Arc::downgrade(page));
    }

    pub(crate) fn unregister_page(&self, key: &str) {
        self.pages.lock().remove(key);
    }

    /// Live nav-bar page for a page instance key
    pub fn nav_bar_page(&self, key: &str) -> Option<Arc<NavBarPage>> {
        self.pages.lock().get(key).and_then(Weak::upgrade)
    }

    // =========================================================================
    // Full refresh
    // =========================================================================

    /// Release every shared chrome instance
    ///
    /// The page registry is emptied too; pages that survive the refresh
    /// rejoin it on their next [`NavBarPage::pre_render`].
    pub fn reset(&self) {
        if let Some(launcher) = self.launcher.release() {
            launcher.teardown();
        }

        if let Some(background) = self.nav_background.release() {
            self.renderer.detach(&background);
        }

        let bars: Vec<Arc<TabBar>> = self.tab_bars.lock().drain().map(|(_, bar)| bar).collect();
        for bar in &bars {
            self.renderer.detach(bar.view());
        }

        self.pages.lock().clear();

        tracing::info!(tab_bars = bars.len(), "released shared chrome after full refresh");
    }
}

//! Chrome-bearing pages
//!
//! A [`NavBarPage`] composes a page identity with its own navigation bar
//! and, for tab pages, a reference to the session's tab bar. The shared
//! navigation bar background and the tab bar belong to the session; the
//! page only binds to them.
//!
//! Host pages customise behaviour through [`NavBarPageHooks`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use chrome_core::{
    Animation, ButtonLocation, ChromeError, NavigationEvent, PageRef, PageTransition,
    PropertySet, Result, TabPosition, TabSetType, View,
};

use chrome_platform::{LayoutEnvironment, SafeAreaInsets};

use crate::binding::bind;
use crate::navigation_bar::{NavButton, NavButtonKind, NavigationBar};
use crate::session::ChromeSession;
use crate::tab_bar::{TabBar, TabSet};
use crate::tokens::easing;

// =============================================================================
// Hooks
// =============================================================================

/// Extension points of a chrome-bearing page
#[async_trait]
pub trait NavBarPageHooks: Send + Sync {
    /// Menu icon tapped
    ///
    /// Pages that declare a top menu must override this.
    async fn on_menu_tapped(&self, _page: &NavBarPage) -> Result<()> {
        Err(ChromeError::MissingOverride("NavBarPageHooks::on_menu_tapped"))
    }

    /// Back button tapped
    async fn on_back_tapped(&self, page: &NavBarPage) -> Result<()> {
        page.session().navigator().back();
        Ok(())
    }

    /// Page-defined button tapped
    async fn on_custom_tapped(&self, _page: &NavBarPage, _action: &str) -> Result<()> {
        Ok(())
    }

    /// Show the menu icon next to a back button
    fn show_menu_despite_back_button(&self, page: &NavBarPage) -> bool {
        page.session().config().show_menu_despite_back_button
    }

    /// Slot of the menu icon
    fn menu_location(&self) -> ButtonLocation {
        ButtonLocation::Left
    }

    /// Slot of the back button
    fn back_button_location(&self) -> ButtonLocation {
        ButtonLocation::Left
    }

    /// Build the back button
    fn create_back_button(&self) -> NavButton {
        NavButton::back()
    }

    /// Build the menu icon, or `None` for no icon
    fn create_menu_icon(&self) -> Option<NavButton> {
        Some(NavButton::menu())
    }
}

/// Hooks with every default
#[derive(Debug, Default)]
pub struct DefaultHooks;

impl NavBarPageHooks for DefaultHooks {}

// =============================================================================
// Page
// =============================================================================

/// Where the page body sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyLayout {
    /// Top edge
    pub top: f32,
    /// Height
    pub height: f32,
}

#[derive(Clone, Copy)]
struct TabAttachment {
    tab_set: TabSetType,
    create: fn(&ChromeSession) -> Arc<TabBar>,
}

/// A page showing a navigation bar
pub struct NavBarPage {
    identity: PageRef,
    session: Arc<ChromeSession>,
    nav_bar: NavigationBar,
    hooks: Arc<dyn NavBarPageHooks>,
    body: Arc<View>,
    tabs: Option<TabAttachment>,
    rendered: Mutex<bool>,
    bound_background: Mutex<Option<u64>>,
}

impl std::fmt::Debug for NavBarPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavBarPage")
            .field("page", &self.identity.page_type())
            .field("tabs", &self.tabs.map(|t| t.tab_set))
            .finish()
    }
}

impl NavBarPage {
    /// Page with a navigation bar only
    pub fn new(
        session: Arc<ChromeSession>,
        identity: PageRef,
        hooks: Arc<dyn NavBarPageHooks>,
    ) -> Arc<Self> {
        Self::with_attachment(session, identity, hooks, None)
    }

    /// Page with a navigation bar and the tab bar of tab set `T`
    pub fn new_with_tabs<T: TabSet>(
        session: Arc<ChromeSession>,
        identity: PageRef,
        hooks: Arc<dyn NavBarPageHooks>,
    ) -> Arc<Self> {
        let attachment = TabAttachment {
            tab_set: TabSetType::of::<T>(),
            create: ChromeSession::tab_bar_or_create::<T>,
        };
        if !identity.is_tab_bearing_for(attachment.tab_set) {
            tracing::warn!(
                page = ?identity.page_type(),
                tab_set = ?attachment.tab_set,
                "page identity does not declare the tab set it is built with"
            );
        }
        Self::with_attachment(session, identity, hooks, Some(attachment))
    }

    fn with_attachment(
        session: Arc<ChromeSession>,
        identity: PageRef,
        hooks: Arc<dyn NavBarPageHooks>,
        tabs: Option<TabAttachment>,
    ) -> Arc<Self> {
        let name = identity.page_type().short_name();
        Arc::new(Self {
            nav_bar: NavigationBar::new(name),
            body: View::new(format!("body:{}", name)),
            identity,
            session,
            hooks,
            tabs,
            rendered: Mutex::new(false),
            bound_background: Mutex::new(None),
        })
    }

    /// Page identity
    pub fn identity(&self) -> &PageRef {
        &self.identity
    }

    /// Owning session
    pub fn session(&self) -> &Arc<ChromeSession> {
        &self.session
    }

    /// This page's navigation bar
    pub fn nav_bar(&self) -> &NavigationBar {
        &self.nav_bar
    }

    /// Body container
    pub fn body(&self) -> &Arc<View> {
        &self.body
    }

    /// Title shown in the navigation bar
    pub fn title(&self) -> String {
        self.nav_bar.title()
    }

    /// Set the navigation bar title
    pub fn set_title(&self, title: impl Into<String>) {
        self.nav_bar.set_title(title);
    }

    /// The session's tab bar for this page, if it has tabs and the bar exists
    pub fn tab_bar(&self) -> Option<Arc<TabBar>> {
        let tabs = self.tabs?;
        self.session.tab_bar_for(tabs.tab_set)
    }

    /// Register the page and create shared chrome it needs
    pub fn initialize(self: &Arc<Self>) {
        self.session.register_page(self);
        self.session.nav_background_or_create();

        let renderer = self.session.renderer();
        renderer.attach(self.nav_bar.view());
        renderer.attach(&self.body);

        if let Some(tabs) = self.tabs {
            (tabs.create)(&self.session);
        }
        tracing::debug!(page = ?self.identity.page_type(), "nav bar page initialized");
    }

    /// Install buttons and bind the layout to the shared chrome
    ///
    /// Buttons are installed once. Bindings are installed once per
    /// background, so a page that outlives a full refresh follows the new
    /// one. Every call refreshes the layout and puts the page back in the
    /// session registry.
    pub fn pre_render(self: &Arc<Self>) -> Result<BodyLayout> {
        self.session.register_page(self);
        let first = !std::mem::replace(&mut *self.rendered.lock(), true);
        if first {
            self.add_back_or_menu()?;
        }

        let generation = self.session.nav_background_generation();
        let stale = *self.bound_background.lock() != Some(generation);
        if stale && self.bind_shared_chrome() {
            *self.bound_background.lock() = Some(generation);
        }
        Ok(self.apply_layout())
    }

    fn add_back_or_menu(&self) -> Result<()> {
        if self.session.navigator().can_go_back() {
            self.nav_bar.add_button(
                self.hooks.back_button_location(),
                self.hooks.create_back_button(),
            )?;

            if !self.hooks.show_menu_despite_back_button(self) {
                return Ok(());
            }
        }

        if self.identity.has_top_menu() {
            if let Some(menu) = self.hooks.create_menu_icon() {
                self.nav_bar.add_button(self.hooks.menu_location(), menu)?;
            }
        }
        Ok(())
    }

    /// Returns `false` when there is no background to bind to yet
    fn bind_shared_chrome(self: &Arc<Self>) -> bool {
        let Some(background) = self.session.nav_background() else {
            return false;
        };

        let target: Weak<View> = Arc::downgrade(&background);
        bind(self.nav_bar.view(), move |props| match target.upgrade() {
            Some(background) => {
                background.set_height(props.height);
                true
            }
            None => false,
        });
        background.set_visible(true);

        // Tab bar and body follow the background
        let page = Arc::downgrade(self);
        bind(&background, move |_| match page.upgrade() {
            Some(page) => {
                page.apply_layout();
                true
            }
            None => false,
        });

        if let Some(tab_bar) = self.tab_bar() {
            self.session.renderer().bring_to_front(tab_bar.view());

            // Layout moves the tab bar itself, so only height changes count
            let page = Arc::downgrade(self);
            let seen_height = Mutex::new(tab_bar.view().height());
            bind(tab_bar.view(), move |props| {
                let Some(page) = page.upgrade() else {
                    return false;
                };
                let mut seen = seen_height.lock();
                if *seen != props.height {
                    *seen = props.height;
                    drop(seen);
                    page.apply_layout();
                }
                true
            });
        }
        true
    }

    /// Bottom edge of the navigation chrome
    fn nav_bottom(&self) -> f32 {
        self.session
            .nav_background()
            .map(|background| background.y() + background.height().max(self.nav_bar.height()))
            .unwrap_or_else(|| self.nav_bar.height())
    }

    /// Body bounds for `env`, without touching any view
    ///
    /// Bottom tabs stop reserving space while the on-screen keyboard is up
    /// on a page that takes text input.
    pub fn body_layout(&self, env: &LayoutEnvironment) -> BodyLayout {
        let nav_bottom = self.nav_bottom();
        let Some(tab_bar) = self.tab_bar() else {
            return BodyLayout {
                top: nav_bottom,
                height: env.root_height - nav_bottom,
            };
        };

        let tabs_height = tab_bar.view().height();
        match self.session.tab_position() {
            TabPosition::Top => {
                let top = nav_bottom + tabs_height;
                BodyLayout {
                    top,
                    height: env.root_height - top,
                }
            }
            TabPosition::Bottom => {
                let reserved = if env.keyboard_visible && self.identity.has_text_input() {
                    0.0
                } else {
                    tabs_height
                };
                BodyLayout {
                    top: nav_bottom,
                    height: env.root_height - nav_bottom - reserved,
                }
            }
        }
    }

    /// Position the tab bar and the body beneath the shared chrome
    pub fn apply_layout(&self) -> BodyLayout {
        let env = self.session.environment();
        if let Some(tab_bar) = self.tab_bar() {
            tab_bar.position(self.session.tab_position(), self.nav_bottom(), env.root_height);
        }

        let layout = self.body_layout(&env);
        self.body.update(|props| {
            props.y = layout.top;
            props.height = layout.height;
        });
        layout
    }

    /// Route a tap on a navigation bar button
    ///
    /// Returns `false` when the bar has no such button.
    pub async fn tap(&self, kind: &NavButtonKind) -> Result<bool> {
        if self.nav_bar.find_button(kind).is_none() {
            return Ok(false);
        }

        match kind {
            NavButtonKind::Back => self.hooks.on_back_tapped(self).await?,
            NavButtonKind::Menu => self.hooks.on_menu_tapped(self).await?,
            NavButtonKind::Custom(action) => self.hooks.on_custom_tapped(self, action).await?,
        }
        Ok(true)
    }

    /// Fit the chrome to the device's safe area
    ///
    /// The navigation bar grows by the top inset and the render root is
    /// padded by the remaining edges. Insets without a top value are
    /// ignored.
    pub fn apply_safe_area(&self, insets: SafeAreaInsets) -> bool {
        if !self.nav_bar.apply_safe_area(insets) {
            return false;
        }
        self.session.root().update(|props| {
            props.padding_left = insets.left;
            props.padding_right = insets.right;
            props.padding_bottom = insets.bottom;
        });
        true
    }

    /// Detach the page's own views and leave the registry
    pub fn dispose(&self) {
        let renderer = self.session.renderer();
        renderer.detach(self.nav_bar.view());
        renderer.detach(&self.body);
        self.session.unregister_page(self.identity.key());
    }
}

// =============================================================================
// Navigation coordination
// =============================================================================

/// Fade navigation bars for a starting navigation
///
/// The incoming bar fades in over the base duration while the outgoing bar
/// fades out over one and a half times that. Without a transition the
/// incoming bar snaps to full opacity.
pub(crate) fn coordinate_nav_bars(session: &ChromeSession, event: &NavigationEvent) {
    let lookup = |page: &Option<PageRef>| {
        page.as_ref()
            .filter(|p| p.is_chrome_bearing())
            .and_then(|p| session.nav_bar_page(p.key()))
    };
    let incoming = lookup(&event.to);
    let outgoing = lookup(&event.from);

    let fade = event
        .to
        .as_ref()
        .is_some_and(|p| p.is_chrome_bearing() && p.transition() != PageTransition::None);

    let config = session.config();
    let renderer = session.renderer();

    if !fade {
        if let Some(page) = incoming {
            page.nav_bar().view().snap(&PropertySet::new().opacity(1.0));
        }
        return;
    }

    if let Some(page) = incoming {
        renderer
            .animate(
                page.nav_bar().view(),
                Animation::fade_in(config.default_duration(), 1.0).with_easing(easing::FADE),
            )
            .run_in_background();
    }

    if let Some(page) = outgoing {
        renderer
            .animate(
                page.nav_bar().view(),
                Animation::new(
                    config.outgoing_fade_duration(),
                    PropertySet::new().opacity(0.0),
                )
                .with_easing(easing::FADE),
            )
            .run_in_background();
    }
}

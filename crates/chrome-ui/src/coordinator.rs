//! Navigation event coordinator
//!
//! The single subscriber that turns navigation events into chrome updates,
//! in a fixed order per event:
//!
//! - `NavigationStarting`: background visibility, then navigation bar
//!   fades, then tab bar transitions
//! - `Navigated`: close the menu, then re-highlight tabs
//! - `FullRefreshed`: release all shared chrome
//!
//! Events involving a popup never touch the chrome.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;

use chrome_core::{NavEvent, NavigationEvent};

use crate::nav_bar_page::coordinate_nav_bars;
use crate::session::ChromeSession;

/// Sequences chrome reactions to navigation events
#[derive(Clone)]
pub struct ChromeCoordinator {
    session: Arc<ChromeSession>,
}

impl ChromeCoordinator {
    /// Coordinator for `session`
    pub fn new(session: Arc<ChromeSession>) -> Self {
        Self { session }
    }

    /// Session being coordinated
    pub fn session(&self) -> &Arc<ChromeSession> {
        &self.session
    }

    /// React to one event
    pub fn dispatch(&self, event: &NavEvent) {
        tracing::trace!(event = event.name(), "dispatching navigation event");
        match event {
            NavEvent::NavigationStarting(nav) => self.on_navigation_starting(nav),
            NavEvent::Navigated(nav) => self.on_navigated(nav),
            NavEvent::FullRefreshed => self.session.reset(),
        }
    }

    fn on_navigation_starting(&self, event: &NavigationEvent) {
        if event.involves_popup() {
            return;
        }

        if let Some(background) = self.session.nav_background() {
            background.set_visible(event.to_is_chrome_bearing());
        }

        coordinate_nav_bars(&self.session, event);

        let active = self.session.navigator().current_page();
        for tab_bar in self.session.tab_bars() {
            let reaction = tab_bar.on_navigation_starting(event, active.as_ref());
            tracing::trace!(tab_set = ?tab_bar.tab_set(), ?reaction, "tab bar reacted");
        }
    }

    fn on_navigated(&self, event: &NavigationEvent) {
        if let Some(launcher) = self.session.launcher.get() {
            launcher.on_navigated();
        }

        if event.involves_popup() {
            return;
        }

        let navigator = self.session.navigator();
        for tab_bar in self.session.tab_bars() {
            tab_bar.highlight_selected_tab(navigator);
        }
    }

    /// Run the coordinator on the session's bus until the handle is dropped
    ///
    /// The subscription is taken before this returns, so every event
    /// published afterwards is seen.
    pub fn spawn(self) -> CoordinatorHandle {
        let mut events = self.session.navigator().bus().subscribe();
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    received = events.recv() => match received {
                        Ok(event) => self.dispatch(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "coordinator lagged behind navigation events");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("chrome coordinator stopped");
        });

        CoordinatorHandle {
            stop_tx: Some(stop_tx),
            _handle: handle,
        }
    }
}

/// Handle for a running coordinator
///
/// When dropped, the coordinator task is stopped.
pub struct CoordinatorHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl CoordinatorHandle {
    /// Stop the coordinator manually
    pub fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu_launcher::MenuLauncher;
    use crate::nav_bar_page::{DefaultHooks, NavBarPage};
    use crate::tab_bar::TabBarPhase;
    use crate::test_support::{session_with, settle, SideMenu};
    use chrome_core::test_utils::pages::{self, MainTabs};
    use chrome_core::test_utils::RecordingRenderer;
    use chrome_core::{ChromeConfig, PageRef};

    fn tab_page(session: &Arc<ChromeSession>, identity: PageRef) -> Arc<NavBarPage> {
        let page = NavBarPage::new_with_tabs::<MainTabs>(
            Arc::clone(session),
            identity,
            Arc::new(DefaultHooks),
        );
        page.initialize();
        page
    }

    fn starting(from: &PageRef, to: &PageRef) -> NavEvent {
        NavEvent::NavigationStarting(NavigationEvent::new(Some(from.clone()), Some(to.clone())))
    }

    #[tokio::test]
    async fn test_background_follows_destination() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let coordinator = ChromeCoordinator::new(Arc::clone(&session));
        let (detail, login) = (pages::detail(), pages::login());
        let background = session.nav_background_or_create();
        background.set_visible(true);

        coordinator.dispatch(&starting(&detail, &login));
        assert!(!background.is_visible());

        coordinator.dispatch(&starting(&login, &detail));
        assert!(background.is_visible());
    }

    #[tokio::test]
    async fn test_popup_events_change_nothing() {
        let renderer = RecordingRenderer::instant();
        let session = session_with(renderer.clone(), ChromeConfig::default());
        let coordinator = ChromeCoordinator::new(Arc::clone(&session));

        let home = pages::home();
        session.navigator().go(home.clone());
        tab_page(&session, home.clone());
        let tab_bar = session.tab_bar::<MainTabs>().unwrap();
        let background = session.nav_background().unwrap();
        let before = (background.is_visible(), tab_bar.phase(), tab_bar.view().props());
        renderer.clear();

        let popup = pages::picker_popup();
        coordinator.dispatch(&starting(&home, &popup));
        coordinator.dispatch(&starting(&popup, &home));
        settle().await;

        assert_eq!(
            (background.is_visible(), tab_bar.phase(), tab_bar.view().props()),
            before
        );
        assert_eq!(renderer.animation_count(), 0);
    }

    #[tokio::test]
    async fn test_tab_bar_transitions_through_flow() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let coordinator = ChromeCoordinator::new(Arc::clone(&session));
        let (login, home, detail) = (pages::login(), pages::home(), pages::detail());
        tab_page(&session, home.clone());
        let tab_bar = session.tab_bar::<MainTabs>().unwrap();

        coordinator.dispatch(&starting(&login, &home));
        settle().await;
        assert_eq!(tab_bar.phase(), TabBarPhase::VisibleStatic);

        coordinator.dispatch(&starting(&home, &detail));
        settle().await;
        assert_eq!(tab_bar.phase(), TabBarPhase::Hidden);
        assert!(!tab_bar.view().is_visible());
    }

    #[tokio::test]
    async fn test_navigated_highlights_and_closes_menu() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let coordinator = ChromeCoordinator::new(Arc::clone(&session));
        let launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        let search = pages::search();
        tab_page(&session, search.clone());
        launcher.toggle_menu().await;

        session.navigator().go(search.clone());
        coordinator.dispatch(&NavEvent::Navigated(NavigationEvent::new(None, Some(search))));
        settle().await;

        assert!(!launcher.is_expanded());
        assert!(session.tab_bar::<MainTabs>().unwrap().is_selected(1));
    }

    #[tokio::test]
    async fn test_full_refresh_releases_everything() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let coordinator = ChromeCoordinator::new(Arc::clone(&session));
        let old_launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        let home = pages::home();
        tab_page(&session, home.clone());
        let old_tabs = session.tab_bar::<MainTabs>().unwrap();

        coordinator.dispatch(&NavEvent::FullRefreshed);
        assert!(session.tab_bar::<MainTabs>().is_none());
        assert!(session.nav_background().is_none());
        assert!(MenuLauncher::<SideMenu>::current(&session).is_none());

        let new_launcher = MenuLauncher::<SideMenu>::setup(&session).unwrap();
        tab_page(&session, pages::home());
        assert!(!Arc::ptr_eq(&old_launcher, &new_launcher));
        assert!(!Arc::ptr_eq(&old_tabs, &session.tab_bar::<MainTabs>().unwrap()));
    }

    #[tokio::test]
    async fn test_spawned_coordinator_follows_bus() {
        let session = session_with(RecordingRenderer::instant(), ChromeConfig::default());
        let handle = ChromeCoordinator::new(Arc::clone(&session)).spawn();
        let home = pages::home();
        tab_page(&session, home.clone());
        let tab_bar = session.tab_bar::<MainTabs>().unwrap();

        session.navigator().go(home);
        settle().await;
        assert_eq!(tab_bar.phase(), TabBarPhase::VisibleStatic);
        assert!(tab_bar.is_selected(0));

        handle.stop();
        settle().await;
        session.navigator().full_refresh();
        settle().await;
        assert!(session.tab_bar::<MainTabs>().is_some());
    }
}

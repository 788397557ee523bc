//! Host navigator
//!
//! Owns the navigation stack and the current page, and publishes every
//! transition on the [`NavigationBus`]:
//! - `NavigationStarting` before the page switch
//! - `Navigated` after it
//! - `FullRefreshed` when the application is reset
//!
//! Popups never enter the stack.

use parking_lot::Mutex;
use std::sync::Arc;

use chrome_core::{NavEvent, NavigationEvent, NavigationStack, PageRef};

use crate::back::BackHandlers;
use crate::bus::NavigationBus;

#[derive(Debug, Default)]
struct NavigatorState {
    stack: NavigationStack,
    current: Option<PageRef>,
}

/// Navigation host publishing on the bus
#[derive(Debug)]
pub struct Navigator {
    bus: NavigationBus,
    back_handlers: BackHandlers,
    state: Mutex<NavigatorState>,
}

impl Navigator {
    /// Create a navigator publishing on `bus`
    pub fn new(bus: NavigationBus) -> Arc<Self> {
        Arc::new(Self {
            bus,
            back_handlers: BackHandlers::new(),
            state: Mutex::new(NavigatorState::default()),
        })
    }

    /// The bus this navigator publishes on
    pub fn bus(&self) -> &NavigationBus {
        &self.bus
    }

    /// Hardware back handlers
    pub fn back_handlers(&self) -> &BackHandlers {
        &self.back_handlers
    }

    /// Page currently shown
    pub fn current_page(&self) -> Option<PageRef> {
        self.state.lock().current.clone()
    }

    /// Snapshot of the back stack
    pub fn stack(&self) -> NavigationStack {
        self.state.lock().stack.clone()
    }

    /// Whether back navigation is possible
    pub fn can_go_back(&self) -> bool {
        !self.state.lock().stack.is_empty()
    }

    /// Navigate forward to `page`
    pub fn go(&self, page: PageRef) {
        let from = self.current_page();
        let event = NavigationEvent::new(from.clone(), Some(page.clone()));

        self.bus.publish(NavEvent::NavigationStarting(event.clone()));
        {
            let mut state = self.state.lock();
            if let Some(previous) = from.filter(|p| !p.is_popup()) {
                state.stack.push(previous);
            }
            state.current = Some(page);
        }
        self.bus.publish(NavEvent::Navigated(event));
    }

    /// Navigate back, returning `false` when the stack is empty
    pub fn back(&self) -> bool {
        let (from, to) = {
            let state = self.state.lock();
            match state.stack.top() {
                Some(top) => (state.current.clone(), top.clone()),
                None => return false,
            }
        };
        let event = NavigationEvent::new(from, Some(to));

        self.bus.publish(NavEvent::NavigationStarting(event.clone()));
        {
            let mut state = self.state.lock();
            state.current = state.stack.pop();
        }
        self.bus.publish(NavEvent::Navigated(event));
        true
    }

    /// Platform back: handlers first, then back navigation
    pub async fn hardware_back(&self) -> bool {
        if self.back_handlers.dispatch().await {
            tracing::debug!("hardware back consumed by a handler");
            return true;
        }
        self.back()
    }

    /// Reset the whole application
    pub fn full_refresh(&self) {
        {
            let mut state = self.state.lock();
            state.stack.clear();
            state.current = None;
        }
        tracing::info!("full refresh requested");
        self.bus.publish(NavEvent::FullRefreshed);
    }
}

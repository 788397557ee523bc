//! Navigation events and history
//!
//! This module provides the data the chrome reacts to:
//! - Navigation events published by the host navigation system
//! - The navigation stack of pages reachable via back

use crate::page::{PageRef, PageType};

// =============================================================================
// Navigation Events
// =============================================================================

/// A transition between two pages
#[derive(Debug, Clone, Default)]
pub struct NavigationEvent {
    /// Page being left
    pub from: Option<PageRef>,
    /// Page being entered
    pub to: Option<PageRef>,
}

impl NavigationEvent {
    /// Create a navigation event
    pub fn new(from: Option<PageRef>, to: Option<PageRef>) -> Self {
        Self { from, to }
    }

    /// Whether either endpoint is a popup
    pub fn involves_popup(&self) -> bool {
        self.from.as_ref().is_some_and(|p| p.is_popup())
            || self.to.as_ref().is_some_and(|p| p.is_popup())
    }

    /// Whether either endpoint is the given page instance
    pub fn references(&self, page: &PageRef) -> bool {
        self.from.as_ref().is_some_and(|p| p.same_instance(page))
            || self.to.as_ref().is_some_and(|p| p.same_instance(page))
    }

    /// Whether the destination is chrome-bearing
    pub fn to_is_chrome_bearing(&self) -> bool {
        self.to.as_ref().is_some_and(|p| p.is_chrome_bearing())
    }
}

/// Events published on the navigation bus
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// A page transition animation is starting
    NavigationStarting(NavigationEvent),
    /// A page transition has completed
    Navigated(NavigationEvent),
    /// The whole application was reset
    FullRefreshed,
}

impl NavEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::NavigationStarting(_) => "navigation-starting",
            NavEvent::Navigated(_) => "navigated",
            NavEvent::FullRefreshed => "full-refreshed",
        }
    }
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// Pages reachable via back (bottom to top)
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    entries: Vec<PageRef>,
}

impl NavigationStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a page onto the stack
    pub fn push(&mut self, page: PageRef) {
        self.entries.push(page);
    }

    /// Pop the top page
    pub fn pop(&mut self) -> Option<PageRef> {
        self.entries.pop()
    }

    /// Top page
    pub fn top(&self) -> Option<&PageRef> {
        self.entries.last()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether back navigation is possible
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stack depth
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All pages, oldest first
    pub fn pages(&self) -> &[PageRef] {
        &self.entries
    }

    /// Whether this page instance is on the stack
    pub fn contains(&self, page: &PageRef) -> bool {
        self.entries.iter().any(|entry| entry.same_instance(page))
    }

    /// Page types, oldest first
    pub fn page_types(&self) -> Vec<PageType> {
        self.entries.iter().map(|p| p.page_type()).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageIdentity;

    struct Home;
    struct Detail;
    struct Picker;

    #[test]
    fn test_navigation_stack_push_pop() {
        let mut stack = NavigationStack::new();
        assert!(stack.is_empty());

        let home = PageIdentity::new::<Home>().shared();
        let detail = PageIdentity::new::<Detail>().shared();
        stack.push(home.clone());
        stack.push(detail.clone());
        assert_eq!(stack.len(), 2);
        assert!(stack.top().unwrap().same_instance(&detail));
        assert!(stack.contains(&home));
        assert!(!stack.contains(&PageIdentity::new::<Home>().shared()));
        assert_eq!(
            stack.page_types(),
            vec![PageType::of::<Home>(), PageType::of::<Detail>()]
        );

        assert!(stack.pop().unwrap().same_instance(&detail));
        assert!(stack.pop().unwrap().same_instance(&home));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_event_popup_detection() {
        let home = PageIdentity::new::<Home>().with_nav_bar().shared();
        let picker = PageIdentity::popup::<Picker>().with_nav_bar().shared();

        assert!(!NavigationEvent::new(None, Some(home.clone())).involves_popup());
        assert!(NavigationEvent::new(Some(home.clone()), Some(picker.clone())).involves_popup());
        assert!(NavigationEvent::new(Some(picker), Some(home)).involves_popup());
    }

    #[test]
    fn test_event_references() {
        let home = PageIdentity::new::<Home>().shared();
        let detail = PageIdentity::new::<Detail>().shared();
        let other = PageIdentity::new::<Detail>().shared();

        let event = NavigationEvent::new(Some(home.clone()), Some(detail.clone()));
        assert!(event.references(&home));
        assert!(event.references(&detail));
        assert!(!event.references(&other));
    }
}

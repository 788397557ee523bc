//! Per-page navigation bar
//!
//! A title row with a left and a right button slot. Pages lay their body
//! out beneath it by binding to the shared background, which follows the
//! bar's height.

use parking_lot::Mutex;
use std::sync::Arc;

use chrome_core::{ButtonLocation, ChromeError, Result, View};
use chrome_platform::SafeAreaInsets;

use crate::tokens::{sizing, z_index};

/// What a navigation bar button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavButtonKind {
    /// Navigate back
    Back,
    /// Open the menu
    Menu,
    /// Page-defined action
    Custom(String),
}

/// A button in one of the bar's slots
#[derive(Debug, Clone)]
pub struct NavButton {
    kind: NavButtonKind,
    view: Arc<View>,
}

impl NavButton {
    /// Button of `kind` rendered by `view`
    pub fn new(kind: NavButtonKind, view: Arc<View>) -> Self {
        Self { kind, view }
    }

    /// Default back button
    pub fn back() -> Self {
        Self::new(NavButtonKind::Back, View::new("nav-button:back"))
    }

    /// Default menu icon
    pub fn menu() -> Self {
        Self::new(NavButtonKind::Menu, View::new("nav-button:menu"))
    }

    /// Page-defined button
    pub fn custom(action: impl Into<String>) -> Self {
        let action = action.into();
        let view = View::new(format!("nav-button:{}", action));
        Self::new(NavButtonKind::Custom(action), view)
    }

    /// Button kind
    pub fn kind(&self) -> &NavButtonKind {
        &self.kind
    }

    /// Button view
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }
}

#[derive(Debug, Default)]
struct Slots {
    left: Vec<NavButton>,
    right: Vec<NavButton>,
}

/// Title row with left and right button slots
#[derive(Debug)]
pub struct NavigationBar {
    view: Arc<View>,
    title: Mutex<String>,
    slots: Mutex<Slots>,
    base_height: Mutex<Option<f32>>,
}

impl NavigationBar {
    /// Empty bar named after its page
    pub fn new(page_name: &str) -> Self {
        let view = View::new(format!("navbar:{}", page_name));
        view.set_height(sizing::NAV_BAR_HEIGHT);
        view.set_z_index(z_index::NAV_BAR);

        Self {
            view,
            title: Mutex::new(String::new()),
            slots: Mutex::new(Slots::default()),
            base_height: Mutex::new(None),
        }
    }

    /// Bar view
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Title text
    pub fn title(&self) -> String {
        self.title.lock().clone()
    }

    /// Set the title text
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.lock() = title.into();
    }

    /// Current height
    pub fn height(&self) -> f32 {
        self.view.height()
    }

    /// Append `button` to the slot at `location`
    ///
    /// Only `Left` and `Right` are slots.
    pub fn add_button(&self, location: ButtonLocation, button: NavButton) -> Result<()> {
        let mut slots = self.slots.lock();
        match location {
            ButtonLocation::Left => slots.left.push(button),
            ButtonLocation::Right => slots.right.push(button),
            other => return Err(ChromeError::UnsupportedButtonLocation(other)),
        }
        Ok(())
    }

    /// Buttons in the slot at `location`
    pub fn buttons(&self, location: ButtonLocation) -> Vec<NavButton> {
        let slots = self.slots.lock();
        match location {
            ButtonLocation::Left => slots.left.clone(),
            ButtonLocation::Right => slots.right.clone(),
            ButtonLocation::Middle => Vec::new(),
        }
    }

    /// First button of `kind` in either slot
    pub fn find_button(&self, kind: &NavButtonKind) -> Option<NavButton> {
        let slots = self.slots.lock();
        slots
            .left
            .iter()
            .chain(slots.right.iter())
            .find(|b| b.kind() == kind)
            .cloned()
    }

    /// Grow the bar under a notch or status bar
    ///
    /// The original height is remembered, so applying insets again replaces
    /// the earlier adjustment instead of adding to it. Returns `false` and
    /// changes nothing when there is no top inset.
    pub fn apply_safe_area(&self, insets: SafeAreaInsets) -> bool {
        if !insets.has_top() {
            return false;
        }

        let base = *self
            .base_height
            .lock()
            .get_or_insert_with(|| self.view.height());

        self.view.update(|props| {
            props.height = base + insets.top;
            props.padding_top = insets.top;
        });
        tracing::trace!(top = insets.top, "applied safe area to navigation bar");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_buttons_to_slots() {
        let bar = NavigationBar::new("detail");
        bar.add_button(ButtonLocation::Left, NavButton::back()).unwrap();
        bar.add_button(ButtonLocation::Right, NavButton::custom("share")).unwrap();
        bar.add_button(ButtonLocation::Right, NavButton::menu()).unwrap();

        assert_eq!(bar.buttons(ButtonLocation::Left).len(), 1);
        let right: Vec<NavButtonKind> = bar
            .buttons(ButtonLocation::Right)
            .iter()
            .map(|b| b.kind().clone())
            .collect();
        assert_eq!(
            right,
            vec![NavButtonKind::Custom("share".into()), NavButtonKind::Menu]
        );
        assert!(bar.find_button(&NavButtonKind::Menu).is_some());
    }

    #[test]
    fn test_middle_slot_is_a_configuration_error() {
        let bar = NavigationBar::new("detail");
        let err = bar
            .add_button(ButtonLocation::Middle, NavButton::back())
            .unwrap_err();
        assert!(matches!(
            err,
            ChromeError::UnsupportedButtonLocation(ButtonLocation::Middle)
        ));
        assert!(bar.find_button(&NavButtonKind::Back).is_none());
    }

    #[test]
    fn test_safe_area_applied_once() {
        let bar = NavigationBar::new("detail");
        assert_eq!(bar.height(), sizing::NAV_BAR_HEIGHT);

        assert!(bar.apply_safe_area(SafeAreaInsets::top(20.0)));
        assert!(bar.apply_safe_area(SafeAreaInsets::top(20.0)));
        assert_eq!(bar.height(), sizing::NAV_BAR_HEIGHT + 20.0);
        assert_eq!(bar.view().props().padding_top, 20.0);
    }

    #[test]
    fn test_safe_area_without_top_inset_is_ignored() {
        let bar = NavigationBar::new("detail");
        let insets = SafeAreaInsets {
            bottom: 34.0,
            ..SafeAreaInsets::default()
        };
        assert!(!bar.apply_safe_area(insets));
        assert_eq!(bar.height(), sizing::NAV_BAR_HEIGHT);
        assert_eq!(bar.view().props().padding_top, 0.0);
    }

    #[test]
    fn test_title() {
        let bar = NavigationBar::new("detail");
        bar.set_title("Settings");
        assert_eq!(bar.title(), "Settings");
        assert_eq!(bar.view().props().z_index, z_index::NAV_BAR);
    }
}

//! Navigation chrome for the chrome kit
//!
//! This crate provides the chrome that surrounds pages: the slide-in menu
//! launcher, per-page navigation bars over a shared background, the shared
//! tab bar and its selection resolver, and the coordinator that drives all
//! of them from navigation events.
//!
//! Shared chrome lives in a [`ChromeSession`], one per application
//! session, and is released only by a full refresh.
//!
//! # Modules
//!
//! - [`session`] - Application-session context holding shared chrome
//! - [`coordinator`] - Ordered reactions to navigation events
//! - [`menu_launcher`] - Overlay and drawer menu
//! - [`navigation_bar`] - Title row with button slots
//! - [`nav_bar_page`] - Chrome-bearing page composition
//! - [`tab_bar`] - Shared tab bar
//! - [`tab_resolver`] - Which tab looks selected
//! - [`binding`] - Property bindings between views
//! - [`tokens`] - Easing, sizes and stacking layers
//!
//! # Example
//!
//! ```rust
//! use chrome_core::TimedRenderer;
//! use chrome_state::{NavigationBus, Navigator};
//! use chrome_ui::ChromeSession;
//! use std::sync::Arc;
//!
//! let navigator = Navigator::new(NavigationBus::new());
//! let session = ChromeSession::builder(Arc::new(TimedRenderer::default()), navigator)
//!     .root_size(390.0, 844.0)
//!     .build();
//! assert!(session.nav_background().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod coordinator;
pub mod menu_launcher;
pub mod nav_bar_page;
pub mod navigation_bar;
pub mod session;
pub mod tab_bar;
pub mod tab_resolver;
pub mod tokens;

#[cfg(test)]
mod test_support;

pub use binding::bind;
pub use coordinator::{ChromeCoordinator, CoordinatorHandle};
pub use menu_launcher::{MenuContent, MenuLauncher, MenuToggled};
pub use nav_bar_page::{BodyLayout, DefaultHooks, NavBarPage, NavBarPageHooks};
pub use navigation_bar::{NavButton, NavButtonKind, NavigationBar};
pub use session::{ChromeSession, ChromeSessionBuilder};
pub use tab_bar::{SelectionChanged, Tab, TabBar, TabBarPhase, TabBarReaction, TabSet, TabSpec};
pub use tab_resolver::resolve_selected_tab;

//! Core types for the chrome kit
//!
//! This crate holds the vocabulary shared by every other chrome crate:
//! page identities, navigation events, retained views, the animation
//! primitive consumed from the rendering layer, configuration and errors.
//!
//! # Modules
//!
//! - [`page`] - Page identity and capability flags
//! - [`navigation`] - Navigation events and the navigation stack
//! - [`view`] - Retained view handles with observable properties
//! - [`animation`] - Easing, animations and the [`RenderLayer`] seam
//! - [`layout`] - Alignment, button locations and tab positions
//! - [`config`] - Chrome configuration
//! - [`error`] - Error taxonomy
//!
//! The `test-utils` feature adds `test_utils`, a recording rendering layer
//! and page fixtures for tests of dependent crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animation;
pub mod config;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod page;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod view;

pub use animation::{
    Animation, AnimationCompleter, AnimationHandle, AnimationOutcome, Easing, PropertySet,
    RenderLayer, TimedRenderer,
};
pub use config::ChromeConfig;
pub use error::{ChromeError, Result};
pub use layout::{ButtonLocation, HorizontalAlignment, SwipeDirection, TabPosition};
pub use navigation::{NavEvent, NavigationEvent, NavigationStack};
pub use page::{
    keys, PageData, PageIdentity, PageKind, PageRef, PageTemplate, PageTransition, PageType,
    TabSetType, TypeTag,
};
pub use view::{View, ViewId, ViewProps};

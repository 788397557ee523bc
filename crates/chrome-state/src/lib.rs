//! Navigation state for the chrome kit
//!
//! This crate provides the navigation event bus, the host navigator that
//! publishes on it, the prioritised hardware-back registry, and the
//! session-scoped slot used for shared chrome singletons.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod back;
pub mod bus;
pub mod navigator;
pub mod slot;

pub use back::{BackHandler, BackHandlerId, BackHandlers, BackPriority};
pub use bus::NavigationBus;
pub use navigator::Navigator;
pub use slot::SharedSlot;

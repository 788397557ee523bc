//! Platform-specific policy for the chrome kit
//!
//! This crate answers the few questions the chrome asks about the device:
//! which platform it runs on, where tabs go by default, how large the safe
//! area is, and whether an on-screen keyboard is covering the layout.

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrome_core::TabPosition;
use serde::{Deserialize, Serialize};

/// Device platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    /// Android phones and tablets
    Android,
    /// iPhone and iPad
    Ios,
    /// Windows desktop
    Windows,
    /// Any other desktop
    Desktop,
}

impl DevicePlatform {
    /// Platform of the current build target
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            DevicePlatform::Android
        } else if cfg!(target_os = "ios") {
            DevicePlatform::Ios
        } else if cfg!(target_os = "windows") {
            DevicePlatform::Windows
        } else {
            DevicePlatform::Desktop
        }
    }

    /// Whether this is a handheld platform
    pub fn is_mobile(&self) -> bool {
        matches!(self, DevicePlatform::Android | DevicePlatform::Ios)
    }
}

/// Tab position convention of a platform
pub fn default_tab_position(platform: DevicePlatform) -> TabPosition {
    match platform {
        DevicePlatform::Android => TabPosition::Top,
        _ => TabPosition::Bottom,
    }
}

/// Resolve a configured override against the platform default
pub fn resolve_tab_position(configured: Option<TabPosition>, platform: DevicePlatform) -> TabPosition {
    configured.unwrap_or_else(|| default_tab_position(platform))
}

/// Screen insets reserved by notches and system bars
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    /// Top inset
    pub top: f32,
    /// Left inset
    pub left: f32,
    /// Right inset
    pub right: f32,
    /// Bottom inset
    pub bottom: f32,
}

impl SafeAreaInsets {
    /// Insets with only a top value
    pub fn top(top: f32) -> Self {
        Self {
            top,
            ..Self::default()
        }
    }

    /// Whether the top edge needs adjusting
    pub fn has_top(&self) -> bool {
        self.top > 0.0
    }
}

/// Dimensions of the root container and keyboard state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutEnvironment {
    /// Root width
    pub root_width: f32,
    /// Root height
    pub root_height: f32,
    /// An on-screen keyboard is resizing the layout
    pub keyboard_visible: bool,
}

impl LayoutEnvironment {
    /// Environment without a keyboard
    pub fn new(root_width: f32, root_height: f32) -> Self {
        Self {
            root_width,
            root_height,
            keyboard_visible: false,
        }
    }

    /// Mark the keyboard as shown or hidden
    pub fn with_keyboard(mut self, visible: bool) -> Self {
        self.keyboard_visible = visible;
        self
    }
}

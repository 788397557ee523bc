//! Chrome configuration
//!
//! Every field has a default so hosts only need to spell out what they
//! change. Values are validated on load; alignment support is checked by the
//! menu launcher itself at setup time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ChromeError, Result};
use crate::layout::{HorizontalAlignment, TabPosition};

/// Default drawer width in points
pub const DEFAULT_MENU_WIDTH: f32 = 250.0;

/// Default scrim opacity when the menu is open
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.35;

/// Default duration for chrome transitions
pub const DEFAULT_DURATION_MS: u64 = 300;

/// Default duration for overlay fades
pub const DEFAULT_FADE_DURATION_MS: u64 = 300;

/// One display refresh at 60Hz
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Configuration recognised by chrome components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeConfig {
    /// Width of the menu drawer
    #[serde(default = "default_menu_width")]
    pub menu_width: f32,

    /// Target opacity of the overlay scrim
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,

    /// Edge the drawer slides in from
    #[serde(default)]
    pub menu_alignment: HorizontalAlignment,

    /// Tab bar position (platform default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_position: Option<TabPosition>,

    /// Show the menu icon even when a back button is shown
    #[serde(default)]
    pub show_menu_despite_back_button: bool,

    /// Base duration for nav bar and tab bar fades
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,

    /// Duration of the overlay fade
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: u64,

    /// Rendering frame interval
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_menu_width() -> f32 {
    DEFAULT_MENU_WIDTH
}

fn default_overlay_opacity() -> f32 {
    DEFAULT_OVERLAY_OPACITY
}

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION_MS
}

fn default_fade_duration_ms() -> u64 {
    DEFAULT_FADE_DURATION_MS
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            menu_width: DEFAULT_MENU_WIDTH,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            menu_alignment: HorizontalAlignment::Left,
            tab_position: None,
            show_menu_despite_back_button: false,
            default_duration_ms: DEFAULT_DURATION_MS,
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl ChromeConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ChromeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.menu_width.is_finite() || self.menu_width < 0.0 {
            return Err(ChromeError::InvalidConfig(format!(
                "menuWidth must be a non-negative number, got {}",
                self.menu_width
            )));
        }

        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ChromeError::InvalidConfig(format!(
                "overlayOpacity must be within 0..=1, got {}",
                self.overlay_opacity
            )));
        }

        if self.frame_interval_ms == 0 {
            return Err(ChromeError::InvalidConfig(
                "frameIntervalMs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the drawer alignment
    pub fn with_menu_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.menu_alignment = alignment;
        self
    }

    /// Set the drawer width
    pub fn with_menu_width(mut self, width: f32) -> Self {
        self.menu_width = width;
        self
    }

    /// Override the platform tab position
    pub fn with_tab_position(mut self, position: TabPosition) -> Self {
        self.tab_position = Some(position);
        self
    }

    /// Show the menu icon next to the back button
    pub fn with_menu_despite_back_button(mut self, show: bool) -> Self {
        self.show_menu_despite_back_button = show;
        self
    }

    /// Base transition duration
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    /// Outgoing nav bars fade slower than incoming ones
    pub fn outgoing_fade_duration(&self) -> Duration {
        self.default_duration().mul_f32(1.5)
    }

    /// Overlay fade duration
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Rendering frame interval
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

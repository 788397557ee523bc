//! Design tokens for navigation chrome
//!
//! Easing presets, sizes and stacking layers shared by the chrome
//! components. Durations come from [`chrome_core::ChromeConfig`].

use chrome_core::Easing;

// =============================================================================
// Easing Tokens
// =============================================================================

/// Easing presets
pub mod easing {
    use super::Easing;

    /// Drawer slides
    pub const SLIDE: Easing = Easing::Standard;
    /// Opacity fades
    pub const FADE: Easing = Easing::EaseInOut;
    /// Linear
    pub const LINEAR: Easing = Easing::Linear;
}

// =============================================================================
// Sizing Tokens
// =============================================================================

/// Chrome dimensions
pub mod sizing {
    /// Navigation bar height before safe-area adjustment
    pub const NAV_BAR_HEIGHT: f32 = 44.0;
    /// Tab bar height
    pub const TAB_BAR_HEIGHT: f32 = 56.0;
}

// =============================================================================
// Z-Index Tokens
// =============================================================================

/// Stacking layers
pub mod z_index {
    /// Navigation bar
    pub const NAV_BAR: i32 = 100_000;
    /// Shared navigation bar background, right under the bar
    pub const NAV_BAR_BACKGROUND: i32 = NAV_BAR - 1;
}

//! Layout vocabulary shared by chrome components

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a view inside its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    /// Pinned to the left edge
    #[default]
    Left,
    /// Centered
    Center,
    /// Pinned to the right edge
    Right,
    /// Stretched to both edges
    Stretch,
}

/// Button slot on a navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ButtonLocation {
    /// Leading slot
    #[default]
    Left,
    /// Title area
    Middle,
    /// Trailing slot
    Right,
}

/// Where the shared tab bar sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPosition {
    /// Pinned below the navigation bar background
    Top,
    /// Pinned to the bottom of the container
    Bottom,
}

/// Direction of a swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Swipe towards the left edge
    Left,
    /// Swipe towards the right edge
    Right,
    /// Swipe upwards
    Up,
    /// Swipe downwards
    Down,
}

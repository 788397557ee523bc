//! Error taxonomy for chrome components
//!
//! Only programmer errors surface here. Ordering races between navigation
//! events and lookups of shared chrome that does not exist yet are logged
//! no-ops, not errors.

use crate::layout::{ButtonLocation, HorizontalAlignment};

/// Chrome errors
#[derive(Debug, thiserror::Error)]
pub enum ChromeError {
    /// The menu drawer cannot slide from this alignment
    #[error("Menu alignment {0:?} is not supported")]
    UnsupportedAlignment(HorizontalAlignment),

    /// The navigation bar has no slot at this location
    #[error("Button location {0:?} is not supported")]
    UnsupportedButtonLocation(ButtonLocation),

    /// A host page exposes a feature without providing its handler
    #[error("{0} must be overridden by the host page")]
    MissingOverride(&'static str),

    /// A launcher of another menu type already owns the session
    #[error("Menu launcher for {existing} already exists, cannot set up {requested}")]
    LauncherTypeMismatch {
        /// Menu type of the live launcher
        existing: &'static str,
        /// Menu type that was requested
        requested: &'static str,
    },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for chrome operations
pub type Result<T> = std::result::Result<T, ChromeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ChromeError::UnsupportedAlignment(HorizontalAlignment::Center);
        assert!(err.to_string().contains("Center"));

        let err = ChromeError::MissingOverride("NavBarPage::on_menu_tapped");
        assert_eq!(
            err.to_string(),
            "NavBarPage::on_menu_tapped must be overridden by the host page"
        );
    }
}

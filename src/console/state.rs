//! Console lifecycle state
//!
//! Owned exclusively by the controller; every mutation goes through a
//! controller setter and lands in the audit trail.

use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::config::ConsoleConfig;

/// Font requested for the display surface
///
/// Terminal cells cannot change face mid-session, so this is advisory:
/// the host decides what to do with it (a GUI host would apply it, the
/// demo just records it).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub size: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("monospace", 12)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt", self.family, self.size)
    }
}

/// Mutable console state behind the controller's setters
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub visible: bool,
    pub always_on_top: bool,
    pub title: String,
    pub font: FontSpec,
    pub text_color: Color,
    pub error_color: Color,
    pub warning_color: Color,
    pub info_color: Color,
}

impl ConsoleState {
    /// Initial state for a freshly constructed console
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            visible: true,
            always_on_top: false,
            title: config.title.clone(),
            font: config.font.clone(),
            text_color: config.text_color,
            error_color: config.error_color,
            warning_color: config.warning_color,
            info_color: config.info_color,
        }
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::from_config(&ConsoleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ConsoleState::default();
        assert!(state.visible);
        assert!(!state.always_on_top);
        assert_eq!(state.title, "Console");
        assert_eq!(state.error_color, Color::Red);
    }

    #[test]
    fn test_font_spec_display() {
        let font = FontSpec::new("Iosevka", 14);
        assert_eq!(font.to_string(), "Iosevka 14pt");
    }

    #[test]
    fn test_font_spec_default() {
        assert_eq!(FontSpec::default(), FontSpec::new("monospace", 12));
    }
}

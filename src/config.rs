//! Console configuration
//!
//! Hosts usually construct a [`ConsoleConfig`] in code; it can also be
//! loaded from a TOML file so end users can rebrand the severity colors
//! without touching the host. Colors parse from ratatui's string forms
//! ("red", "light-blue", "#00ff00").

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::console::FontSpec;

/// Initial settings for a console instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Title shown on the display surface
    #[serde(default = "default_title")]
    pub title: String,

    /// Advisory font for the display surface
    #[serde(default)]
    pub font: FontSpec,

    /// Color of plain text
    #[serde(default = "default_text_color")]
    pub text_color: Color,

    /// Color of error entries
    #[serde(default = "default_error_color")]
    pub error_color: Color,

    /// Color of warning entries
    #[serde(default = "default_warning_color")]
    pub warning_color: Color,

    /// Color of info entries
    #[serde(default = "default_info_color")]
    pub info_color: Color,

    /// Mirror every entry to stdout. Hosts that own the terminal (a TUI
    /// in an alternate screen) should turn this off and register their
    /// own mirror sink instead.
    #[serde(default = "default_mirror_stdout")]
    pub mirror_stdout: bool,
}

fn default_title() -> String {
    "Console".to_string()
}

fn default_text_color() -> Color {
    Color::White
}

fn default_error_color() -> Color {
    Color::Red
}

fn default_warning_color() -> Color {
    Color::Yellow
}

fn default_info_color() -> Color {
    Color::Green
}

fn default_mirror_stdout() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            font: FontSpec::default(),
            text_color: default_text_color(),
            error_color: default_error_color(),
            warning_color: default_warning_color(),
            info_color: default_info_color(),
            mirror_stdout: default_mirror_stdout(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a file, or return defaults if it does not
    /// exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read console config")?;
            toml::from_str(&content).context("Failed to parse console config")
        } else {
            Ok(Self::default())
        }
    }

    /// Load from the default location (`~/.logpane/config.toml`)
    pub fn load_default() -> Result<Self> {
        Self::load(&config_file_path())
    }
}

/// Base configuration directory (`~/.logpane`), falling back to the
/// current directory if the home directory cannot be determined
pub fn config_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".logpane"),
        None => {
            tracing::warn!("Could not determine home directory, using current directory");
            PathBuf::from(".logpane")
        }
    }
}

/// Path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

//! Theme module for the chrome around the console pane
//!
//! Level colors live on the document's style table; this palette only
//! covers the surrounding chrome (borders, titles, hints).

use ratatui::style::{Color, Modifier, Style};

/// Chrome colors for the built-in view
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (titles)
    pub accent: Color,
    /// Text color for muted/secondary content
    pub text_muted: Color,
    /// Normal border color
    pub border: Color,
    /// Border color while following the newest entry
    pub border_following: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            text_muted: Color::DarkGray,
            border: Color::White,
            border_following: Color::Cyan,
        }
    }

    /// Style for the pane title
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for muted text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Border style depending on follow mode
    pub fn border_style(&self, following: bool) -> Style {
        let color = if following {
            self.border_following
        } else {
            self.border
        };
        Style::default().fg(color)
    }
}

/// Global theme instance
static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the current theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

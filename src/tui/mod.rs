//! Terminal UI module
//!
//! Terminal setup/teardown for hosts that render the console with the
//! built-in ratatui view. Embedding hosts with their own terminal
//! handling only need [`view`].

pub mod theme;
pub mod view;

pub use theme::{theme, Theme};
pub use view::{render_console, ConsoleView};

use std::io::{self, stdout};

use anyhow::Result;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;

/// Terminal wrapper
///
/// Handles raw mode and the alternate screen, and restores the terminal
/// on drop even when the host exits through an error path.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    entered: bool,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    /// Enter TUI mode (raw mode + alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        self.entered = true;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.terminal.show_cursor()?;
        stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.entered = false;
        Ok(())
    }

    /// Draw a frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Tracing may already be gone during drop; emergency diagnostics
        // go to stderr
        if !self.entered {
            return;
        }
        if let Err(e) = self.terminal.show_cursor() {
            eprintln!("TUI teardown: failed to show cursor: {}", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            eprintln!("TUI teardown: failed to leave alternate screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            eprintln!("TUI teardown: failed to disable raw mode: {}", e);
        }
    }
}

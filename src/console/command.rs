//! Command surface
//!
//! The host's menus and buttons speak a small, closed vocabulary of
//! command names. Parsing is case-insensitive; anything outside the
//! vocabulary stays a soft "not implemented" notice at dispatch time.

/// A named command accepted by [`ConsoleController::dispatch`]
///
/// [`ConsoleController::dispatch`]: crate::console::ConsoleController::dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SaveAsText,
    ClearConsole,
    CloseConsole,
    TerminateApp,
    About,
    License,
}

impl Command {
    /// Parse a command name, ignoring case and surrounding whitespace
    pub fn parse(name: &str) -> Option<Command> {
        match name.trim().to_ascii_lowercase().as_str() {
            "save as text document" => Some(Command::SaveAsText),
            "clear console" => Some(Command::ClearConsole),
            "close console" => Some(Command::CloseConsole),
            "terminate main application" => Some(Command::TerminateApp),
            "about this program" => Some(Command::About),
            "license information" => Some(Command::License),
            _ => None,
        }
    }

    /// Canonical name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::SaveAsText => "save as text document",
            Command::ClearConsole => "clear console",
            Command::CloseConsole => "close console",
            Command::TerminateApp => "terminate main application",
            Command::About => "about this program",
            Command::License => "license information",
        }
    }
}

//! Console controller
//!
//! Orchestrates the log document plus lifecycle state, exposes the
//! user-facing operations (clear, save, close, terminate) and dispatches
//! named commands from the host's action surface into them.

mod command;
mod state;

pub use command::Command;
pub use state::{ConsoleState, FontSpec};

use std::path::PathBuf;

use ratatui::style::Color;
use thiserror::Error;

use crate::config::ConsoleConfig;
use crate::document::{DisplaySurface, DocError, EntryRef, Level, LevelStyles, LogDocument};
use crate::save::{self, OverwriteChoice, SaveOutcome, SavePrompt};

/// Errors from controller operations
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The console was closed; further operations are rejected
    #[error("console is closed")]
    Closed,
    #[error(transparent)]
    Doc(#[from] DocError),
}

/// Host-registered callbacks for actions the console never performs
/// itself: ending the process and showing the about/license dialogs.
#[derive(Default)]
struct ConsoleHooks {
    on_terminate: Option<Box<dyn FnMut() + Send>>,
    on_about: Option<Box<dyn FnMut() + Send>>,
    on_license: Option<Box<dyn FnMut() + Send>>,
}

/// An embeddable, leveled logging console
///
/// Owns one [`LogDocument`] and one [`ConsoleState`] for its entire
/// lifetime. Lifecycle: constructed visible, toggles between visible and
/// hidden, and ends closed; `Closed` is sticky and rejects further
/// mutation. `terminate` is the one exception and works from any state.
pub struct ConsoleController {
    document: LogDocument,
    state: ConsoleState,
    prompt: Option<Box<dyn SavePrompt + Send>>,
    hooks: ConsoleHooks,
    closed: bool,
}

impl ConsoleController {
    /// Create a console from the given configuration
    pub fn new(config: ConsoleConfig) -> Self {
        let styles = LevelStyles::from_colors(
            config.text_color,
            config.info_color,
            config.warning_color,
            config.error_color,
        );
        let document = LogDocument::with_styles(styles, config.mirror_stdout);
        let state = ConsoleState::from_config(&config);
        Self {
            document,
            state,
            prompt: None,
            hooks: ConsoleHooks::default(),
            closed: false,
        }
    }

    /// The underlying document, for rendering and inspection
    pub fn document(&self) -> &LogDocument {
        &self.document
    }

    /// Register the file-picker collaborator used by [`save`](Self::save)
    pub fn set_prompt(&mut self, prompt: Box<dyn SavePrompt + Send>) {
        self.prompt = Some(prompt);
    }

    /// Register the hook invoked when termination of the host is requested
    pub fn on_terminate(&mut self, hook: impl FnMut() + Send + 'static) {
        self.hooks.on_terminate = Some(Box::new(hook));
    }

    /// Register the hook backing the "about this program" command
    pub fn on_about(&mut self, hook: impl FnMut() + Send + 'static) {
        self.hooks.on_about = Some(Box::new(hook));
    }

    /// Register the hook backing the "license information" command
    pub fn on_license(&mut self, hook: impl FnMut() + Send + 'static) {
        self.hooks.on_license = Some(Box::new(hook));
    }

    /// Attach the rendering widget to the document
    pub fn attach_surface(&mut self, surface: Box<dyn DisplaySurface>) {
        self.document.attach_surface(surface);
    }

    fn ensure_open(&self) -> Result<(), ConsoleError> {
        if self.closed {
            Err(ConsoleError::Closed)
        } else {
            Ok(())
        }
    }

    fn append(&self, level: Level, message: &str) -> Result<EntryRef, ConsoleError> {
        self.ensure_open()?;
        let entry = self.document.append(level, message)?;
        self.document.scroll_to_bottom();
        Ok(entry)
    }

    /// Internal audit entry for configuration changes; failures are
    /// reported but never stop the setter
    fn audit(&self, text: String) {
        match self.document.append(Level::Info, &text) {
            Ok(_) => self.document.scroll_to_bottom(),
            Err(e) => tracing::warn!("audit entry dropped: {}", e),
        }
    }

    /// Log a plain message
    pub fn log(&mut self, message: &str) -> Result<EntryRef, ConsoleError> {
        self.append(Level::Plain, message)
    }

    /// Log an info message
    pub fn log_info(&mut self, message: &str) -> Result<EntryRef, ConsoleError> {
        self.append(Level::Info, message)
    }

    /// Log a warning
    pub fn log_warning(&mut self, message: &str) -> Result<EntryRef, ConsoleError> {
        self.append(Level::Warning, message)
    }

    /// Log an error
    pub fn log_error(&mut self, message: &str) -> Result<EntryRef, ConsoleError> {
        self.append(Level::Error, message)
    }

    /// Clear the console
    pub fn clear(&mut self) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.document.clear()?;
        self.document.scroll_to_bottom();
        Ok(())
    }

    /// Save the console buffer as a text file
    ///
    /// The destination comes from the registered [`SavePrompt`]. The Info
    /// confirmation entry is appended before the snapshot is taken, so a
    /// saved file records its own save. Write failures become an
    /// Error-level entry and [`SaveOutcome::Failed`], never a propagated
    /// error.
    pub fn save(&mut self) -> Result<SaveOutcome, ConsoleError> {
        self.ensure_open()?;
        let prompt = match self.prompt.as_mut() {
            Some(prompt) => prompt,
            None => {
                tracing::warn!("save requested without a prompt collaborator");
                return Ok(SaveOutcome::NoPathChosen);
            }
        };

        let chosen = match prompt.choose_path() {
            Some(chosen) => chosen,
            None => return Ok(SaveOutcome::NoPathChosen),
        };

        if chosen.exists() {
            let choice = prompt.confirm_overwrite(&chosen);
            match choice {
                OverwriteChoice::Overwrite => Ok(self.write_to(chosen)),
                OverwriteChoice::Decline => Ok(SaveOutcome::DeclinedOverwrite),
                OverwriteChoice::Cancel => Ok(SaveOutcome::Cancelled),
            }
        } else {
            let target = save::resolve_target(&chosen);
            Ok(self.write_to(target))
        }
    }

    fn write_to(&mut self, path: PathBuf) -> SaveOutcome {
        self.audit(format!("File saved as: {}", path.display()));
        let text = self.document.snapshot_text();
        match save::write_snapshot(&path, &text) {
            Ok(()) => SaveOutcome::Saved(path),
            Err(e) => {
                let message = save::friendly_io_error_message(&e, "Failed to save console");
                match self.document.append(Level::Error, &message) {
                    Ok(_) => self.document.scroll_to_bottom(),
                    Err(e) => tracing::warn!("save failure entry dropped: {}", e),
                }
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Close the console: release the display surface and stop accepting
    /// operations. Does not terminate the host. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.document.detach_surface();
        self.state.visible = false;
        self.closed = true;
        tracing::debug!("console closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Request termination of the entire host application
    ///
    /// Destructive and irreversible once the host honors it; distinct
    /// from [`close`](Self::close). The console never exits the process
    /// itself - the registered hook decides. Works from any state.
    pub fn terminate(&mut self) {
        if !self.closed {
            match self.document.append(Level::Info, "Terminating main application...") {
                Ok(_) => self.document.scroll_to_bottom(),
                Err(e) => tracing::warn!("termination entry dropped: {}", e),
            }
        }
        match self.hooks.on_terminate.as_mut() {
            Some(hook) => hook(),
            None => tracing::warn!("terminate requested but no handler is registered"),
        }
    }

    /// Show or hide the console
    pub fn set_visible(&mut self, visible: bool) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.visible = visible;
        self.audit(format!("Visibility set to: {}", visible));
        Ok(())
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn set_always_on_top(&mut self, always_on_top: bool) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.always_on_top = always_on_top;
        self.audit(format!("Always on top set to: {}", always_on_top));
        Ok(())
    }

    pub fn is_always_on_top(&self) -> bool {
        self.state.always_on_top
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.title = title.to_string();
        self.audit(format!("Console title set to: {}", title));
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn set_font(&mut self, font: FontSpec) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.audit(format!("Font set to: {}", font));
        self.state.font = font;
        Ok(())
    }

    pub fn font(&self) -> &FontSpec {
        &self.state.font
    }

    /// Set the color of plain text; affects subsequent entries only
    pub fn set_text_color(&mut self, color: Color) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.text_color = color;
        self.document.set_style(Level::Plain, color, false);
        self.audit(format!("Normal text color set to: {:?}", color));
        Ok(())
    }

    /// Set the color of error entries; affects subsequent entries only
    pub fn set_error_color(&mut self, color: Color) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.error_color = color;
        self.document.set_style(Level::Error, color, true);
        self.audit(format!("Error text color set to: {:?}", color));
        Ok(())
    }

    /// Set the color of warning entries; affects subsequent entries only
    pub fn set_warning_color(&mut self, color: Color) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.warning_color = color;
        self.document.set_style(Level::Warning, color, false);
        self.audit(format!("Warning text color set to: {:?}", color));
        Ok(())
    }

    /// Set the color of info entries; affects subsequent entries only
    pub fn set_info_color(&mut self, color: Color) -> Result<(), ConsoleError> {
        self.ensure_open()?;
        self.state.info_color = color;
        self.document.set_style(Level::Info, color, false);
        self.audit(format!("Info text color set to: {:?}", color));
        Ok(())
    }

    /// Dispatch a named command from the host's action surface
    ///
    /// Unknown names never fail: they degrade to an Info notice so a host
    /// wiring new menu items without updating the table fails soft.
    pub fn dispatch(&mut self, name: &str) {
        match Command::parse(name) {
            Some(Command::SaveAsText) => match self.save() {
                Ok(outcome) => tracing::debug!("save finished: {:?}", outcome),
                Err(e) => tracing::warn!("save rejected: {}", e),
            },
            Some(Command::ClearConsole) => {
                if let Err(e) = self.clear() {
                    tracing::warn!("clear rejected: {}", e);
                }
            }
            Some(Command::CloseConsole) => self.close(),
            Some(Command::TerminateApp) => self.terminate(),
            Some(Command::About) => match self.hooks.on_about.as_mut() {
                Some(hook) => hook(),
                None => tracing::debug!("no about hook registered"),
            },
            Some(Command::License) => match self.hooks.on_license.as_mut() {
                Some(hook) => hook(),
                None => tracing::debug!("no license hook registered"),
            },
            None => {
                if !self.closed {
                    self.audit(format!("Not implemented: {}", name));
                }
            }
        }
    }
}

impl Default for ConsoleController {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

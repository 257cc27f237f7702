//! Demo host for the logpane console
//!
//! Plays the role of the owning application: feeds leveled messages into
//! the console, wires keys to the command surface, and honors the
//! termination request hook.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing_subscriber::EnvFilter;

use logpane::config::ConsoleConfig;
use logpane::console::ConsoleController;
use logpane::save::{OverwriteChoice, SavePrompt};
use logpane::tui::{render_console, theme, ConsoleView, Tui};

/// Headless stand-in for a file-picker dialog: always saves next to the
/// demo and overwrites without asking
struct DemoPrompt;

impl SavePrompt for DemoPrompt {
    fn choose_path(&mut self) -> Option<PathBuf> {
        Some(PathBuf::from("console-session"))
    }

    fn confirm_overwrite(&mut self, _path: &Path) -> OverwriteChoice {
        OverwriteChoice::Overwrite
    }
}

fn main() -> Result<()> {
    // The terminal belongs to the TUI, so tracing goes to a file
    let log_file = File::create("logpane-demo.log").context("Failed to create demo log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "logpane=info".into()),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    let mut config = ConsoleConfig::load_default().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        ConsoleConfig::default()
    });
    // Stdout is the alternate screen here; mirror to a file instead
    config.mirror_stdout = false;

    let mut console = ConsoleController::new(config);
    let mirror =
        File::create("logpane-demo.mirror.txt").context("Failed to create demo mirror file")?;
    console.document().add_mirror(Box::new(mirror));
    console.set_prompt(Box::new(DemoPrompt));

    let quit = Arc::new(AtomicBool::new(false));
    let quit_on_terminate = Arc::clone(&quit);
    console.on_terminate(move || {
        quit_on_terminate.store(true, Ordering::SeqCst);
    });

    let view = Arc::new(Mutex::new(ConsoleView::new()));
    console.attach_surface(Box::new(Arc::clone(&view)));

    console.log_info("Demo host started")?;
    console.log("Press p/i/w/e to log, c to clear, s to save, t to terminate, q to quit")?;

    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut counter = 0usize;
    while !quit.load(Ordering::SeqCst) {
        tui.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(2)])
                .split(frame.size());

            if let Ok(mut view) = view.lock() {
                render_console(
                    frame,
                    chunks[0],
                    console.document(),
                    &mut view,
                    console.title(),
                );
            }

            let footer = Paragraph::new(
                "p: plain | i: info | w: warn | e: error | c: clear | s: save | \
                 t: terminate | j/k: scroll | g/G: top/follow | q: quit",
            )
            .style(theme().muted_style())
            .block(Block::default().borders(Borders::TOP));
            frame.render_widget(footer, chunks[1]);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) => key,
            _ => continue,
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => {
                console.dispatch("close console");
                break;
            }
            KeyCode::Char('p') => {
                counter += 1;
                let _ = console.log(&format!("plain message #{}", counter));
            }
            KeyCode::Char('i') => {
                counter += 1;
                let _ = console.log_info(&format!("info message #{}", counter));
            }
            KeyCode::Char('w') => {
                counter += 1;
                let _ = console.log_warning(&format!("warning message #{}", counter));
            }
            KeyCode::Char('e') => {
                counter += 1;
                let _ = console.log_error(&format!("error message #{}", counter));
            }
            KeyCode::Char('c') => console.dispatch("clear console"),
            KeyCode::Char('s') => console.dispatch("save as text document"),
            KeyCode::Char('t') => console.dispatch("terminate main application"),
            KeyCode::Char('j') | KeyCode::Down => {
                if let Ok(mut view) = view.lock() {
                    view.scroll_down(1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Ok(mut view) = view.lock() {
                    view.scroll_up(1);
                }
            }
            KeyCode::Char('g') => {
                if let Ok(mut view) = view.lock() {
                    view.scroll_to_top();
                }
            }
            KeyCode::Char('G') => {
                if let Ok(mut view) = view.lock() {
                    view.scroll_to_bottom();
                }
            }
            _ => {}
        }
    }

    tui.exit()?;
    Ok(())
}

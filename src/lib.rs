//! Logpane - embeddable leveled logging console for terminal applications
//!
//! A host application instantiates a [`console::ConsoleController`] to
//! receive timestamped, severity-tagged messages, render them as styled
//! auto-scrolling text, and optionally persist them to disk. Every entry
//! is mirrored unstyled to registered plain-text sinks (stdout by
//! default) for headless inspection.

pub mod config;
pub mod console;
pub mod document;
pub mod save;
pub mod tui;

//! Save-to-file workflow
//!
//! The file picker and overwrite confirmation are host collaborators
//! behind [`SavePrompt`]; this module owns target-path resolution, the
//! actual write, and friendly messages for the failures that end up in
//! the console itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Host-provided destination picker for `ConsoleController::save`
pub trait SavePrompt {
    /// Ask for a destination path; `None` means the prompt was cancelled
    fn choose_path(&mut self) -> Option<PathBuf>;

    /// Ask whether an existing file should be overwritten
    fn confirm_overwrite(&mut self, path: &Path) -> OverwriteChoice;
}

/// Answer to the overwrite confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    Overwrite,
    Decline,
    Cancel,
}

/// How a save attempt ended
///
/// Only `Saved` touched the filesystem; the cancel/decline variants are
/// normal outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Snapshot written to the contained path
    Saved(PathBuf),
    /// The path prompt was cancelled; nothing happened
    NoPathChosen,
    /// The user declined to overwrite an existing file
    DeclinedOverwrite,
    /// The overwrite confirmation was cancelled
    Cancelled,
    /// The write failed; carries the message also logged as an Error entry
    Failed(String),
}

/// Resolve the final target for a freshly chosen path: `.txt` is appended
/// only when the path has no extension and nothing exists there yet
pub fn resolve_target(chosen: &Path) -> PathBuf {
    if chosen.exists() || chosen.extension().is_some() {
        chosen.to_path_buf()
    } else {
        let mut name = chosen.as_os_str().to_os_string();
        name.push(".txt");
        PathBuf::from(name)
    }
}

/// Write the snapshot verbatim as UTF-8
pub fn write_snapshot(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

/// Categories of disk errors for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full - free space needed to save",
            DiskErrorKind::PermissionDenied => "permission denied writing the file",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "failed to write the file",
        }
    }
}

/// Categorize an IO error into a user-facing category
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use io::ErrorKind;

    match e.kind() {
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        // Disk full may surface as WriteZero on some systems
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 on Linux / 69 on macOS
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Build the message logged into the console when a write fails
pub fn friendly_io_error_message(e: &io::Error, context: &str) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => format!("{}: {}", context, e),
        kind => format!("{}: {}", context, kind.user_message()),
    }
}

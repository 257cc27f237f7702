//! Append-only log document
//!
//! The document owns the ordered entry sequence, the level-to-style table,
//! and the mirrored plain-text output. Everything the console displays or
//! persists comes from here.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Plain,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Fixed textual tag rendered into the line, `None` for plain messages
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Level::Plain => None,
            Level::Info => Some("INFO"),
            Level::Warning => Some("WARNING"),
            Level::Error => Some("ERROR"),
        }
    }

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Plain => "PLAIN",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// Display style resolved for an entry at append time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    pub color: Color,
    pub bold: bool,
}

impl StyleSpec {
    pub fn new(color: Color, bold: bool) -> Self {
        Self { color, bold }
    }

    /// Convert to a ratatui style for rendering
    pub fn as_style(&self) -> Style {
        let style = Style::default().fg(self.color);
        if self.bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

/// Per-level display styles, read at append time only
///
/// The textual level tags are fixed; only color and weight are
/// configurable, so restyling never changes the mirrored text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyles {
    plain: StyleSpec,
    info: StyleSpec,
    warning: StyleSpec,
    error: StyleSpec,
}

impl LevelStyles {
    /// Build a style table from the four level colors
    pub fn from_colors(text: Color, info: Color, warning: Color, error: Color) -> Self {
        Self {
            plain: StyleSpec::new(text, false),
            info: StyleSpec::new(info, false),
            warning: StyleSpec::new(warning, false),
            error: StyleSpec::new(error, true),
        }
    }

    pub fn get(&self, level: Level) -> StyleSpec {
        match level {
            Level::Plain => self.plain,
            Level::Info => self.info,
            Level::Warning => self.warning,
            Level::Error => self.error,
        }
    }

    pub fn set(&mut self, level: Level, style: StyleSpec) {
        match level {
            Level::Plain => self.plain = style,
            Level::Info => self.info = style,
            Level::Warning => self.warning = style,
            Level::Error => self.error = style,
        }
    }
}

impl Default for LevelStyles {
    fn default() -> Self {
        Self::from_colors(Color::White, Color::Green, Color::Yellow, Color::Red)
    }
}

/// A single log entry, immutable once appended
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp when the entry was appended (informational; append order
    /// is the authoritative order)
    pub timestamp: DateTime<Local>,
    /// Severity level
    pub level: Level,
    /// Raw message text
    pub text: String,
    /// Style resolved from the level table at append time
    pub style: StyleSpec,
    /// Fully rendered line, identical to what the mirror sinks receive
    pub line: String,
}

/// Position of a committed entry in the append sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef(usize);

impl EntryRef {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Errors from document operations
#[derive(Debug, Error)]
pub enum DocError {
    /// The display surface rejected the insertion. The entry is still
    /// committed to the in-memory sequence, which stays authoritative.
    #[error("display surface rejected the append: {0}")]
    Render(String),
    /// The entry store lock is poisoned and the document is unrecoverable
    #[error("log store lock poisoned")]
    Poisoned,
}

/// Rendering widget attached to a document
///
/// Implementations must never panic; a failed insertion is reported back
/// through the `Result` and handled by the document.
pub trait DisplaySurface: Send {
    /// Commit one rendered line to the widget
    fn insert_line(&mut self, line: &str, style: StyleSpec) -> anyhow::Result<()>;
    /// Wipe the widget after a document clear
    fn clear(&mut self) -> anyhow::Result<()>;
    /// Advance the visible scroll position to the newest entry
    fn scroll_to_bottom(&mut self);
}

struct DocInner {
    entries: Vec<LogEntry>,
    styles: LevelStyles,
    mirrors: Vec<Box<dyn Write + Send>>,
    surface: Option<Box<dyn DisplaySurface>>,
}

impl DocInner {
    /// Format, commit and fan out one entry. Returns `Err` only when the
    /// display surface rejects the line; the entry is committed either way.
    fn push(&mut self, level: Level, message: &str) -> Result<EntryRef, DocError> {
        let timestamp = Local::now();
        let style = self.styles.get(level);
        let line = format_line(&timestamp, level, message);

        self.entries.push(LogEntry {
            timestamp,
            level,
            text: message.to_string(),
            style,
            line: line.clone(),
        });
        let entry = EntryRef(self.entries.len() - 1);

        self.write_mirrors(&line);

        let render_err = match self.surface.as_mut() {
            Some(surface) => surface.insert_line(&line, style).err(),
            None => None,
        };
        if let Some(e) = render_err {
            // Report to the mirror sinks only; the host must keep running
            let notice = format!("  [!] display rejected entry {}: {}", entry.index(), e);
            self.write_mirrors(&notice);
            return Err(DocError::Render(e.to_string()));
        }

        Ok(entry)
    }

    fn write_mirrors(&mut self, line: &str) {
        for sink in &mut self.mirrors {
            if let Err(e) = writeln!(sink, "{}", line) {
                tracing::warn!("mirror sink write failed: {}", e);
            }
        }
    }
}

/// Render one entry line: `"  [HH:MM]"` plus a level tag for non-plain
/// levels, then `": "` and the message
fn format_line(timestamp: &DateTime<Local>, level: Level, message: &str) -> String {
    match level.tag() {
        Some(tag) => format!("  [{}] [{}]: {}", timestamp.format("%H:%M"), tag, message),
        None => format!("  [{}]: {}", timestamp.format("%H:%M"), message),
    }
}

/// Ordered, append-only sequence of styled log entries
///
/// All mutation goes through one internal lock, so concurrent producers
/// serialize and append order is the lock-acquisition order. Every new
/// document starts with a synthetic "Console started..." entry.
pub struct LogDocument {
    inner: Mutex<DocInner>,
}

impl LogDocument {
    /// Create a document that mirrors every line to stdout
    pub fn new() -> Self {
        Self::with_styles(LevelStyles::default(), true)
    }

    /// Create a document without the stdout mirror, for hosts that own
    /// stdout themselves (a TUI in an alternate screen, tests)
    pub fn without_stdout_mirror() -> Self {
        Self::with_styles(LevelStyles::default(), false)
    }

    /// Create a document with an explicit style table
    pub fn with_styles(styles: LevelStyles, mirror_stdout: bool) -> Self {
        let mut mirrors: Vec<Box<dyn Write + Send>> = Vec::new();
        if mirror_stdout {
            mirrors.push(Box::new(io::stdout()));
        }
        let doc = Self {
            inner: Mutex::new(DocInner {
                entries: Vec::new(),
                styles,
                mirrors,
                surface: None,
            }),
        };
        if doc.append(Level::Plain, "Console started...").is_err() {
            tracing::warn!("start marker was not rendered");
        }
        doc
    }

    /// Append one entry and fan it out to the mirrors and the display
    /// surface. Never fails on well-formed input; see [`DocError::Render`]
    /// for the one caught failure mode.
    pub fn append(&self, level: Level, message: &str) -> Result<EntryRef, DocError> {
        let mut inner = self.inner.lock().map_err(|_| DocError::Poisoned)?;
        inner.push(level, message)
    }

    /// Delete all entries atomically, then append the two synthetic
    /// session markers
    pub fn clear(&self) -> Result<(), DocError> {
        let mut inner = self.inner.lock().map_err(|_| DocError::Poisoned)?;
        inner.entries.clear();
        if let Some(surface) = inner.surface.as_mut() {
            if let Err(e) = surface.clear() {
                tracing::warn!("display surface clear failed: {}", e);
            }
        }
        // Render failures on the markers are already reported to the
        // mirrors inside push; the clear itself has happened
        let _ = inner.push(Level::Plain, "Console cleared...");
        let _ = inner.push(Level::Plain, "New console started...");
        Ok(())
    }

    /// Full rendered buffer, one entry per line in append order,
    /// terminated by a newline. Style-independent plain text.
    pub fn snapshot_text(&self) -> String {
        match self.inner.lock() {
            Ok(inner) => {
                let mut out = String::new();
                for entry in &inner.entries {
                    out.push_str(&entry.line);
                    out.push('\n');
                }
                out
            }
            Err(_) => String::new(),
        }
    }

    /// Replace the style for a level; affects subsequent appends only
    pub fn set_style(&self, level: Level, color: Color, bold: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.styles.set(level, StyleSpec::new(color, bold));
        }
    }

    /// Style currently associated with a level
    pub fn style_for(&self, level: Level) -> StyleSpec {
        self.inner
            .lock()
            .map(|inner| inner.styles.get(level))
            .unwrap_or(StyleSpec::new(Color::Reset, false))
    }

    /// Number of committed entries, synthetic markers included
    pub fn entry_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    /// Entry at the given append position
    pub fn entry_at(&self, index: usize) -> Option<LogEntry> {
        self.inner.lock().ok()?.entries.get(index).cloned()
    }

    /// All entries in append order (for rendering)
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .map(|inner| inner.entries.clone())
            .unwrap_or_default()
    }

    /// Register an additional plain-text observer
    pub fn add_mirror(&self, sink: Box<dyn Write + Send>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.mirrors.push(sink);
        }
    }

    /// Attach the rendering widget; replaces any previous surface
    pub fn attach_surface(&self, surface: Box<dyn DisplaySurface>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.surface = Some(surface);
        }
    }

    /// Release the rendering widget (the console keeps its entries)
    pub fn detach_surface(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.surface = None;
        }
    }

    /// Ask the attached surface to follow the newest entry
    pub fn scroll_to_bottom(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(surface) = inner.surface.as_mut() {
                surface.scroll_to_bottom();
            }
        }
    }
}

impl Default for LogDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mirror sink that records everything written to it
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Surface that records inserted lines, optionally failing every insert
    struct RecordingSurface {
        lines: Arc<Mutex<Vec<String>>>,
        fail: bool,
        follows: Arc<Mutex<usize>>,
    }

    impl DisplaySurface for RecordingSurface {
        fn insert_line(&mut self, line: &str, _style: StyleSpec) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("widget out of bounds");
            }
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            self.lines.lock().unwrap().clear();
            Ok(())
        }

        fn scroll_to_bottom(&mut self) {
            *self.follows.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_starts_with_synthetic_entry() {
        let doc = LogDocument::without_stdout_mirror();
        assert_eq!(doc.entry_count(), 1);
        let entry = doc.entry_at(0).unwrap();
        assert_eq!(entry.level, Level::Plain);
        assert_eq!(entry.text, "Console started...");
    }

    #[test]
    fn test_append_preserves_call_order() {
        let doc = LogDocument::without_stdout_mirror();
        for i in 0..50 {
            let entry = doc.append(Level::Info, &format!("msg {}", i)).unwrap();
            assert_eq!(entry.index(), i + 1);
        }
        assert_eq!(doc.entry_count(), 51);
        for i in 0..50 {
            assert_eq!(doc.entry_at(i + 1).unwrap().text, format!("msg {}", i));
        }
    }

    #[test]
    fn test_line_format_per_level() {
        let doc = LogDocument::without_stdout_mirror();
        let plain = doc.append(Level::Plain, "hello").unwrap();
        let info = doc.append(Level::Info, "hello").unwrap();
        let warning = doc.append(Level::Warning, "hello").unwrap();
        let error = doc.append(Level::Error, "hello").unwrap();

        let stamp_of = |entry: EntryRef| {
            let entry = doc.entry_at(entry.index()).unwrap();
            entry.timestamp.format("%H:%M").to_string()
        };

        assert_eq!(
            doc.entry_at(plain.index()).unwrap().line,
            format!("  [{}]: hello", stamp_of(plain))
        );
        assert_eq!(
            doc.entry_at(info.index()).unwrap().line,
            format!("  [{}] [INFO]: hello", stamp_of(info))
        );
        assert_eq!(
            doc.entry_at(warning.index()).unwrap().line,
            format!("  [{}] [WARNING]: hello", stamp_of(warning))
        );
        assert_eq!(
            doc.entry_at(error.index()).unwrap().line,
            format!("  [{}] [ERROR]: hello", stamp_of(error))
        );
    }

    #[test]
    fn test_mirror_receives_identical_lines() {
        let doc = LogDocument::without_stdout_mirror();
        let sink = SharedSink::default();
        doc.add_mirror(Box::new(sink.clone()));

        doc.append(Level::Warning, "low disk").unwrap();
        doc.append(Level::Plain, "tick").unwrap();

        let mirrored = sink.contents();
        let expected = format!(
            "{}\n{}\n",
            doc.entry_at(1).unwrap().line,
            doc.entry_at(2).unwrap().line
        );
        assert_eq!(mirrored, expected);
    }

    #[test]
    fn test_clear_resets_to_two_markers() {
        let doc = LogDocument::without_stdout_mirror();
        for i in 0..10 {
            doc.append(Level::Plain, &format!("{}", i)).unwrap();
        }
        doc.clear().unwrap();
        assert_eq!(doc.entry_count(), 2);
        assert_eq!(doc.entry_at(0).unwrap().text, "Console cleared...");
        assert_eq!(doc.entry_at(1).unwrap().text, "New console started...");
    }

    #[test]
    fn test_clear_is_idempotent_in_effect() {
        let doc = LogDocument::without_stdout_mirror();
        doc.append(Level::Error, "boom").unwrap();
        doc.clear().unwrap();
        let first = doc.snapshot_text();
        doc.clear().unwrap();
        assert_eq!(doc.entry_count(), 2);
        assert_eq!(doc.snapshot_text(), first);
    }

    #[test]
    fn test_snapshot_is_one_line_per_entry() {
        let doc = LogDocument::without_stdout_mirror();
        doc.append(Level::Info, "a").unwrap();
        doc.append(Level::Error, "b").unwrap();

        let snapshot = doc.snapshot_text();
        let lines: Vec<&str> = snapshot.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], doc.entry_at(0).unwrap().line);
        assert_eq!(lines[2], doc.entry_at(2).unwrap().line);
        assert!(snapshot.ends_with('\n'));
    }

    #[test]
    fn test_restyle_is_not_retroactive() {
        let doc = LogDocument::without_stdout_mirror();
        let before = doc.append(Level::Error, "old").unwrap();
        let snapshot_before = doc.snapshot_text();

        doc.set_style(Level::Error, Color::Magenta, false);
        let after = doc.append(Level::Error, "new").unwrap();

        assert_eq!(
            doc.entry_at(before.index()).unwrap().style,
            StyleSpec::new(Color::Red, true)
        );
        assert_eq!(
            doc.entry_at(after.index()).unwrap().style,
            StyleSpec::new(Color::Magenta, false)
        );
        // Plain text is style-independent: only the new entry's line differs
        assert!(doc.snapshot_text().starts_with(&snapshot_before));
    }

    #[test]
    fn test_surface_receives_appends_and_scrolls() {
        let doc = LogDocument::without_stdout_mirror();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let follows = Arc::new(Mutex::new(0));
        doc.attach_surface(Box::new(RecordingSurface {
            lines: Arc::clone(&lines),
            fail: false,
            follows: Arc::clone(&follows),
        }));

        doc.append(Level::Info, "shown").unwrap();
        doc.scroll_to_bottom();

        assert_eq!(lines.lock().unwrap().len(), 1);
        assert_eq!(*follows.lock().unwrap(), 1);
    }

    #[test]
    fn test_render_failure_keeps_entry_committed() {
        let doc = LogDocument::without_stdout_mirror();
        let sink = SharedSink::default();
        doc.add_mirror(Box::new(sink.clone()));
        doc.attach_surface(Box::new(RecordingSurface {
            lines: Arc::new(Mutex::new(Vec::new())),
            fail: true,
            follows: Arc::new(Mutex::new(0)),
        }));

        let before = doc.entry_count();
        let result = doc.append(Level::Plain, "lost on screen");
        assert!(matches!(result, Err(DocError::Render(_))));

        // The in-memory sequence stays authoritative
        assert_eq!(doc.entry_count(), before + 1);
        assert_eq!(doc.entry_at(before).unwrap().text, "lost on screen");
        // And the failure was reported to the mirror sinks
        assert!(sink.contents().contains("display rejected entry"));
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        use std::thread;

        let doc = Arc::new(LogDocument::without_stdout_mirror());
        let mut handles = Vec::new();
        for t in 0..4 {
            let doc = Arc::clone(&doc);
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    doc.append(Level::Plain, &format!("t{} m{}", t, i)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 100 appends plus the start marker, every line intact
        assert_eq!(doc.entry_count(), 101);
        let snapshot = doc.snapshot_text();
        assert_eq!(snapshot.lines().count(), 101);
        for line in snapshot.lines().skip(1) {
            assert!(line.contains(" m"), "interleaved line: {:?}", line);
        }
    }
}

//! Console view
//!
//! Scroll state and the ratatui rendering of a log document. The view is
//! also the document's display surface: inserts are satisfied by the next
//! frame (immediate-mode rendering reads the document directly), and
//! scroll-to-bottom requests turn follow mode back on.

use std::sync::{Arc, Mutex};

use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::document::{DisplaySurface, LogDocument, StyleSpec};
use crate::tui::theme::theme;

/// Scroll position over the entry sequence
///
/// Follow mode pins the viewport to the newest entry; any manual scroll
/// releases it until the next scroll-to-bottom.
#[derive(Debug, Clone)]
pub struct ConsoleView {
    scroll_offset: usize,
    follow: bool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
        }
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for Arc<Mutex<ConsoleView>> {
    fn insert_line(&mut self, _line: &str, _style: StyleSpec) -> anyhow::Result<()> {
        // Immediate-mode rendering reads the document on the next frame;
        // there is nothing to commit here
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        match self.lock() {
            Ok(mut view) => {
                view.scroll_offset = 0;
                view.follow = true;
                Ok(())
            }
            Err(_) => anyhow::bail!("view lock poisoned"),
        }
    }

    fn scroll_to_bottom(&mut self) {
        if let Ok(mut view) = self.lock() {
            view.scroll_to_bottom();
        }
    }
}

/// First visible entry for a viewport of `visible` lines over `count`
/// entries
fn effective_scroll(count: usize, visible: usize, follow: bool, offset: usize) -> usize {
    let max_offset = count.saturating_sub(visible.max(1));
    if follow {
        count.saturating_sub(visible)
    } else {
        offset.min(max_offset)
    }
}

/// Render the console pane: bordered entry list plus scrollbar
pub fn render_console(
    frame: &mut Frame,
    area: Rect,
    document: &LogDocument,
    view: &mut ConsoleView,
    title: &str,
) {
    let t = theme();
    let entries = document.entries();
    let entry_count = entries.len();
    let visible_height = area.height.saturating_sub(2) as usize;

    let scroll = effective_scroll(entry_count, visible_height, view.follow, view.scroll_offset);
    view.scroll_offset = scroll;

    if entries.is_empty() {
        let empty = Paragraph::new("No log entries yet.")
            .style(t.muted_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(t.border_style(view.follow))
                    .title(title.to_string()),
            );
        frame.render_widget(empty, area);
        return;
    }

    let visible_entries: Vec<_> = entries.iter().skip(scroll).take(visible_height).collect();

    let items: Vec<ListItem> = visible_entries
        .iter()
        .map(|entry| ListItem::new(Line::from(Span::styled(entry.line.clone(), entry.style.as_style()))))
        .collect();

    let follow_marker = if view.follow { " [follow]" } else { "" };
    let pane_title = format!(
        "{} [{}-{} of {}]{}",
        title,
        scroll + 1,
        (scroll + visible_entries.len()).min(entry_count),
        entry_count,
        follow_marker
    );

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style(view.follow))
            .title(Span::styled(pane_title, t.title_style())),
    );
    frame.render_widget(list, area);

    if entry_count > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(entry_count)
            .position(scroll)
            .viewport_content_length(visible_height);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Level;

    #[test]
    fn test_follow_pins_viewport_to_newest() {
        // 100 entries, 10 visible: follow shows the last page
        assert_eq!(effective_scroll(100, 10, true, 0), 90);
        // fewer entries than the viewport: no scrolling
        assert_eq!(effective_scroll(5, 10, true, 0), 0);
    }

    #[test]
    fn test_manual_offset_is_clamped() {
        assert_eq!(effective_scroll(100, 10, false, 50), 50);
        assert_eq!(effective_scroll(100, 10, false, 500), 90);
        assert_eq!(effective_scroll(0, 10, false, 3), 0);
    }

    #[test]
    fn test_scrolling_releases_and_restores_follow() {
        let mut view = ConsoleView::new();
        assert!(view.is_following());

        view.scroll_up(5);
        assert!(!view.is_following());

        view.scroll_to_bottom();
        assert!(view.is_following());

        view.scroll_to_top();
        assert!(!view.is_following());
    }

    #[test]
    fn test_surface_impl_restores_follow_on_append_path() {
        let shared = Arc::new(Mutex::new(ConsoleView::new()));
        shared.lock().unwrap().scroll_up(3);

        let document = LogDocument::without_stdout_mirror();
        document.attach_surface(Box::new(Arc::clone(&shared)));
        document.append(Level::Info, "fresh").unwrap();
        document.scroll_to_bottom();

        assert!(shared.lock().unwrap().is_following());
    }

    #[test]
    fn test_surface_clear_resets_scroll() {
        let shared = Arc::new(Mutex::new(ConsoleView::new()));
        shared.lock().unwrap().scroll_up(3);
        shared.lock().unwrap().scroll_down(10);

        let document = LogDocument::without_stdout_mirror();
        document.attach_surface(Box::new(Arc::clone(&shared)));
        document.clear().unwrap();

        let view = shared.lock().unwrap();
        assert!(view.is_following());
        assert_eq!(view.scroll_offset, 0);
    }
}

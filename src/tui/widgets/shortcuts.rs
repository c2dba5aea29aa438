//! Shortcuts bar widget

use crate::tui::state::{AppState, Focus, Screen};
use crate::tui::theme::Styles;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render shortcuts bar at the bottom of the screen
pub fn render_shortcuts(f: &mut Frame, area: Rect, shortcuts: &[(&str, &str)]) {
    if shortcuts.is_empty() {
        return;
    }

    let available_width = area.width.saturating_sub(2) as usize;
    let mut spans: Vec<Span> = vec![];
    let mut current_width = 0;

    for (i, (key, desc)) in shortcuts.iter().enumerate() {
        let separator = if i > 0 { " • " } else { "" };
        let key_text = format!("[{}]", key);
        let desc_text = format!(" {}", desc);
        let item_width = separator.width() + key_text.width() + desc_text.width();

        if i > 0 && current_width + item_width > available_width {
            spans.push(Span::styled(" ...", Styles::secondary()));
            break;
        }

        if i > 0 {
            spans.push(Span::styled(separator, Styles::muted()));
        }
        spans.push(Span::styled(key_text, Styles::emphasis()));
        spans.push(Span::styled(desc_text, Styles::secondary()));
        current_width += item_width;
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Styles::border())
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get shortcuts for the current screen
pub fn get_shortcuts(app_state: &AppState) -> Vec<(&'static str, &'static str)> {
    match &app_state.screen {
        Screen::Browse if app_state.search_mode => vec![
            ("Type", "Search"),
            ("Enter", "Done"),
            ("Esc", "Clear"),
            ("↑↓", "Navigate"),
        ],
        Screen::Browse if app_state.focus == Focus::Sidebar => vec![
            ("↑↓", "Category"),
            ("Enter", "Open"),
            ("Tab", "Assets"),
            ("Q", "Quit"),
        ],
        Screen::Browse if app_state.showing_folders() => vec![
            ("Enter", "Open Folder"),
            ("/", "Search"),
            ("F", "Filters"),
            ("Shift+N", "New Folder"),
            ("n", "New Asset"),
            ("E", "Rename"),
            ("D", "Delete"),
            ("Esc", "All"),
            ("R", "Refresh"),
            ("Q", "Quit"),
        ],
        Screen::Browse => {
            let mut keys = vec![("Enter", "Details"), ("/", "Search")];
            if app_state.active_category().is_some() {
                keys.extend([("F", "Filters"), ("n", "New")]);
            }
            keys.extend([("E", "Edit"), ("D", "Delete"), ("V/O", "Voice/Original")]);
            if app_state.session.history().is_nested() {
                keys.push(("B", "Back"));
            }
            keys.extend([("Tab", "Sidebar"), ("R", "Refresh"), ("Q", "Quit")]);
            keys
        }
        Screen::Detail { .. } => vec![
            ("V", "Voice Clone"),
            ("O", "Original Video"),
            ("E", "Edit"),
            ("D", "Delete"),
            ("Esc", "Back"),
        ],
        Screen::Filters { .. } => vec![
            ("↑↓", "Filter"),
            ("←→", "Change"),
            ("Space", "Toggle"),
            ("X", "Clear All"),
            ("Esc", "Done"),
        ],
        Screen::Form(_) => vec![
            ("Tab/↑↓", "Field"),
            ("Enter", "Next"),
            ("Ctrl+S", "Save"),
            ("Esc", "Cancel"),
        ],
        Screen::Confirm(_) => vec![("Y", "Delete"), ("N/Esc", "Cancel")],
        Screen::Prompt(_) => vec![("Enter", "Save"), ("Esc", "Cancel")],
    }
}

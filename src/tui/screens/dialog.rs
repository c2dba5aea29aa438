//! Confirmation and text prompt overlays

use crate::tui::{
    state::{ConfirmAction, PromptState},
    theme::Styles,
};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Rect of `width` x `height` centred in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let rect = centered_rect(60, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::warning())
        .title(Span::styled(format!(" {} ", title), Styles::header()));
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false }),
        rect,
    );
}

pub fn render_confirm(f: &mut Frame, area: Rect, action: &ConfirmAction) {
    let (title, target, note) = match action {
        ConfirmAction::DeleteRecord { title, category, .. } => (
            "Delete asset",
            format!("{} ({})", title, category.label()),
            "This cannot be undone.",
        ),
        ConfirmAction::DeleteFolder { name, .. } => (
            "Delete folder",
            name.clone(),
            "Assets inside are kept and show up under \"Orphaned\".",
        ),
    };
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ⚠  Permanently delete ", Styles::warning()),
            Span::styled(target, Styles::emphasis()),
            Span::styled("?", Styles::warning()),
        ]),
        Line::from(Span::styled(format!("     {}", note), Styles::secondary())),
        Line::from(""),
        Line::from(vec![
            Span::styled("     [Y]", Styles::emphasis()),
            Span::styled(" delete   ", Styles::secondary()),
            Span::styled("[N]", Styles::emphasis()),
            Span::styled(" cancel", Styles::secondary()),
        ]),
    ];
    popup(f, area, title, lines);
}

pub fn render_prompt(f: &mut Frame, area: Rect, prompt: &PromptState, tick: u64) {
    let caret = if tick % 8 < 4 { "▌" } else { " " };
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Name: ", Styles::secondary()),
            Span::styled(prompt.input.clone(), Styles::input()),
            Span::styled(caret, Styles::emphasis()),
        ]),
        Line::from(""),
    ];
    popup(f, area, prompt.title(), lines);
}

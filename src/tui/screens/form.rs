//! Record create / edit form

use crate::tui::{state::FormState, theme::{category_style, Styles}};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn label(key: &str) -> &str {
    match key {
        "tags_string" => "tags (comma separated)",
        "folder_id" => "folder id",
        other => other,
    }
}

pub fn render(f: &mut Frame, area: Rect, form: &FormState, tick: u64) {
    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let active = i == form.cursor;
        let required = if field.required { "*" } else { " " };
        let caret = if active && tick % 8 < 4 { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(if active { " › " } else { "   " }, Styles::emphasis()),
            Span::styled(
                format!("{:<26}", format!("{}{}", label(&field.key), required)),
                if active { Styles::header() } else { Styles::secondary() },
            ),
            Span::styled(
                field.value.clone(),
                if active { Styles::input() } else { Styles::primary() },
            ),
            Span::styled(caret, Styles::emphasis()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   * required",
        Styles::muted(),
    )));

    let verb = if form.is_edit() { "Edit" } else { "New" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_focused())
        .title(Span::styled(
            format!(" {} {} asset ", verb, form.category.label()),
            category_style(form.category),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

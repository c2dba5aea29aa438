//! Filter panel for the active category

use crate::filter::FilterBlock;
use crate::tui::{state::AppState, theme::Styles};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app_state: &AppState, cursor: usize) {
    let Some(category) = app_state.active_category() else {
        return;
    };
    let options = app_state.session.filter_options();

    let mut lines = vec![Line::from("")];
    for (i, key) in app_state.filter_keys().iter().enumerate() {
        let selected = i == cursor;
        let value = match (FilterBlock::is_toggle(key), app_state.filter_value(key)) {
            (true, Some(_)) => "on".to_string(),
            (true, None) => "off".to_string(),
            (false, Some(v)) => v,
            (false, None) => "any".to_string(),
        };
        let marker = if selected { "›" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), Styles::emphasis()),
            Span::styled(
                format!("{:<22}", key),
                if selected { Styles::header() } else { Styles::secondary() },
            ),
            Span::styled(
                format!("◂ {} ▸", value),
                if selected { Styles::selected() } else { Styles::primary() },
            ),
        ]));

        if selected {
            if let Some(option) = options.iter().find(|o| o.key == *key) {
                let hint = if option.values.is_empty() {
                    "no values yet".to_string()
                } else {
                    option.values.join(" · ")
                };
                lines.push(Line::from(Span::styled(format!("     {}", hint), Styles::muted())));
            }
        }
    }

    let visible = app_state.session.visible_assets().len();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("   {} matching assets", visible),
        Styles::secondary(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_focused())
        .title(Span::styled(format!(" Filters · {} ", category.label()), Styles::header()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

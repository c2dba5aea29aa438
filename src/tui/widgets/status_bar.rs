//! Breadcrumb and message line above the shortcuts bar

use crate::tui::state::{AppState, MessageLevel};
use crate::tui::theme::Styles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Scope, then the open folder, then the related-jump depth.
pub fn breadcrumb(app_state: &AppState) -> String {
    let view = app_state.session.view();
    let mut crumb = view.scope.label().to_string();
    if let Some(folder) = app_state.session.folder_label() {
        crumb.push_str(" › ");
        crumb.push_str(&folder);
    }
    let depth = app_state.session.history().depth();
    if depth > 0 {
        crumb.push_str(&format!(" ‹ {}", depth));
    }
    crumb
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app_state: &AppState) {
    let mut spans = vec![Span::styled(format!(" {} ", breadcrumb(app_state)), Styles::emphasis())];

    if app_state.refresh_pending {
        spans.push(Span::styled(
            format!("{} Loading...", crate::spinner::get_spinner(app_state.tick)),
            Styles::secondary(),
        ));
    } else if let Some(message) = &app_state.message {
        let style = match message.level {
            MessageLevel::Info => Styles::success(),
            MessageLevel::Error => Styles::error(),
        };
        spans.push(Span::styled(message.text.clone(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

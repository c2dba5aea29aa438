//! Screen rendering modules

pub mod browse;
pub mod detail;
pub mod dialog;
pub mod filters;
pub mod form;

use crate::tui::{
    state::{AppState, Screen},
    widgets::{
        logo::{render_logo, render_tagline, LOGO_WITH_TAGLINE_HEIGHT},
        shortcuts::{get_shortcuts, render_shortcuts},
        status_bar::render_status_bar,
    },
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Main render function that dispatches to the appropriate screen
pub fn render(f: &mut Frame, app_state: &mut AppState) {
    let area = f.area();
    let is_small = area.height < 28 || area.width < 80;
    let header_height = if is_small { 0 } else { LOGO_WITH_TAGLINE_HEIGHT };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(2), // Shortcuts
        ])
        .split(area);

    if !is_small {
        render_logo(f, chunks[0], app_state.refresh_pending, app_state.tick);
        let backend = app_state.session.gateway().backend().describe();
        render_tagline(f, chunks[0], &backend);
    }

    let body = chunks[1];
    let tick = app_state.tick;
    match &app_state.screen {
        Screen::Browse => browse::render(f, body, app_state),
        Screen::Detail { .. } => detail::render(f, body, app_state),
        Screen::Filters { cursor } => {
            let cursor = *cursor;
            filters::render(f, body, app_state, cursor)
        }
        Screen::Form(form) => form::render(f, body, form, tick),
        Screen::Confirm(action) => {
            let action = action.clone();
            browse::render(f, body, app_state);
            dialog::render_confirm(f, body, &action);
        }
        Screen::Prompt(prompt) => {
            let prompt = prompt.clone();
            browse::render(f, body, app_state);
            dialog::render_prompt(f, body, &prompt, tick);
        }
    }

    render_status_bar(f, chunks[2], app_state);
    render_shortcuts(f, chunks[3], &get_shortcuts(app_state));
}

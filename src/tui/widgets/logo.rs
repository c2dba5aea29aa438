//! BHHUB ASCII logo widget

use crate::tui::theme::Styles;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// ASCII art lines for the BHHUB logo
const LOGO_LINES: &[&str] = &[
    " ██████╗ ██╗  ██╗██╗  ██╗██╗   ██╗██████╗ ",
    " ██╔══██╗██║  ██║██║  ██║██║   ██║██╔══██╗",
    " ██████╔╝███████║███████║██║   ██║██████╔╝",
    " ██╔══██╗██╔══██║██╔══██║██║   ██║██╔══██╗",
    " ██████╔╝██║  ██║██║  ██║╚██████╔╝██████╔╝",
    " ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ",
];

/// Height of the logo in lines
pub const LOGO_HEIGHT: u16 = 6;

/// Width of the logo in characters
pub const LOGO_WIDTH: u16 = 43;

/// Logo plus the tagline row.
pub const LOGO_WITH_TAGLINE_HEIGHT: u16 = LOGO_HEIGHT + 1;

/// Render the logo with a shimmer while `loading` is set.
pub fn render_logo(f: &mut Frame, area: Rect, loading: bool, tick: u64) {
    let shimmer = (tick as usize / 2) % LOGO_WIDTH as usize;
    let lines: Vec<Line> = LOGO_LINES
        .iter()
        .map(|line| {
            if !loading {
                return Line::from(Span::styled(*line, Styles::title()));
            }
            let spans: Vec<Span> = line
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    let near = (i as i32 - shimmer as i32).unsigned_abs() < 3;
                    let style = if near && c != ' ' {
                        Styles::header()
                    } else {
                        Styles::title()
                    };
                    Span::styled(c.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let logo_area = Rect {
        height: LOGO_HEIGHT.min(area.height),
        ..area
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Left), logo_area);
}

/// Render the tagline directly under the logo
pub fn render_tagline(f: &mut Frame, area: Rect, backend: &str) {
    if area.height <= LOGO_HEIGHT {
        return;
    }
    let tagline = Paragraph::new(Line::from(vec![
        Span::styled(" Creative asset library", Styles::secondary()),
        Span::styled(" • ", Styles::muted()),
        Span::styled(backend.to_string(), Styles::muted()),
    ]));
    let tagline_area = Rect {
        y: area.y + LOGO_HEIGHT,
        height: 1,
        ..area
    };
    f.render_widget(tagline, tagline_area);
}

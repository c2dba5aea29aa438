//! Browse screen: category sidebar, folder cards and the asset grid

use crate::filter::Scope;
use crate::output::truncate_to_width;
use crate::tui::{
    state::{AppState, Focus},
    theme::{category_style, Styles},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 28;

pub fn render(f: &mut Frame, area: Rect, app_state: &mut AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);

    render_sidebar(f, columns[0], app_state);

    let show_search = app_state.search_mode || !app_state.session.view().search.is_empty();
    let show_stats = app_state.session.view().scope == Scope::All
        && !show_search
        && !app_state.session.history().is_nested();

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if show_search { 3 } else { 0 }),
            Constraint::Length(if show_stats { 4 } else { 0 }),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    if show_search {
        render_search(f, main[0], app_state);
    }
    if show_stats {
        render_stats(f, main[1], app_state);
    }
    if app_state.showing_folders() {
        render_folders(f, main[2], app_state);
    } else {
        render_assets(f, main[2], app_state);
    }
}

fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Styles::border_focused()
        } else {
            Styles::border()
        })
        .title(Span::styled(title, Styles::header()))
}

fn render_sidebar(f: &mut Frame, area: Rect, app_state: &AppState) {
    let counts = app_state.session.snapshot().category_counts();
    let current = app_state.session.view().scope;
    let focused = app_state.focus == Focus::Sidebar;

    let items: Vec<ListItem> = AppState::sidebar_scopes()
        .into_iter()
        .enumerate()
        .map(|(i, scope)| {
            let count = match scope {
                Scope::All => app_state.session.snapshot().total(),
                Scope::Category(c) => counts.get(&c).copied().unwrap_or(0),
            };
            let marker = if scope == current { "●" } else { " " };
            let label_style = match scope {
                Scope::All => Styles::primary(),
                Scope::Category(c) => category_style(c),
            };
            let line = Line::from(vec![
                Span::styled(format!("{} ", marker), Styles::emphasis()),
                Span::styled(format!("{:<18}", scope.label()), label_style),
                Span::styled(format!("{:>4}", count), Styles::muted()),
            ]);
            let item = ListItem::new(line);
            if focused && i == app_state.sidebar_cursor {
                item.style(Styles::selected())
            } else {
                item
            }
        })
        .collect();

    f.render_widget(List::new(items).block(panel(" Library ".to_string(), focused)), area);
}

fn render_search(f: &mut Frame, area: Rect, app_state: &AppState) {
    let term = &app_state.session.view().search;
    let cursor = if app_state.search_mode && app_state.tick % 8 < 4 {
        "▌"
    } else {
        " "
    };
    let line = Line::from(vec![
        Span::styled("/ ", Styles::emphasis()),
        Span::styled(term.clone(), Styles::input()),
        Span::styled(cursor, Styles::emphasis()),
    ]);
    f.render_widget(
        Paragraph::new(line).block(panel(" Search ".to_string(), app_state.search_mode)),
        area,
    );
}

fn render_stats(f: &mut Frame, area: Rect, app_state: &AppState) {
    let stats = app_state.session.stats(app_state.recent_limit);
    let summary = Line::from(vec![
        Span::styled(format!("{}", stats.total), Styles::emphasis()),
        Span::styled(" assets  ", Styles::secondary()),
        Span::styled(format!("{}", stats.folders), Styles::emphasis()),
        Span::styled(" folders", Styles::secondary()),
    ]);
    let recent: Vec<Span> = std::iter::once(Span::styled("Recent: ", Styles::muted()))
        .chain(stats.recent.iter().take(5).flat_map(|a| {
            [
                Span::styled(truncate_to_width(&a.title, 18), category_style(a.category)),
                Span::styled("  ", Styles::muted()),
            ]
        }))
        .collect();
    f.render_widget(
        Paragraph::new(vec![summary, Line::from(recent)])
            .block(panel(" Overview ".to_string(), false)),
        area,
    );
}

fn render_folders(f: &mut Frame, area: Rect, app_state: &mut AppState) {
    let listing = app_state.listing();
    app_state.visible_height = area.height.saturating_sub(3) as usize;
    let focused = app_state.focus == Focus::Main;

    let rows: Vec<Row> = listing
        .iter()
        .enumerate()
        .skip(app_state.scroll_offset)
        .take(app_state.visible_height.max(1))
        .map(|(i, entry)| {
            let icon = if entry.is_virtual() { "◇" } else { "▸" };
            let name_style = if entry.is_virtual() {
                Styles::secondary()
            } else {
                Styles::primary()
            };
            let row = Row::new(vec![
                Cell::from(Span::styled(icon, Styles::emphasis())),
                Cell::from(Span::styled(entry.name.clone(), name_style)),
                Cell::from(Span::styled(format!("{}", entry.count), Styles::muted())),
            ]);
            if focused && i == app_state.cursor {
                row.style(Styles::selected())
            } else {
                row
            }
        })
        .collect();

    let title = match app_state.active_category() {
        Some(c) => format!(" {} · folders ", c.label()),
        None => " Folders ".to_string(),
    };
    let table = Table::new(
        rows,
        [Constraint::Length(2), Constraint::Min(10), Constraint::Length(8)],
    )
    .header(Row::new(vec!["", "Folder", "Assets"]).style(Styles::muted()))
    .block(panel(title, focused));
    f.render_widget(table, area);

    if listing.is_empty() {
        render_empty(f, area, "No folders or assets match. Shift+N creates a folder.");
    }
}

fn render_assets(f: &mut Frame, area: Rect, app_state: &mut AppState) {
    app_state.visible_height = area.height.saturating_sub(3) as usize;
    let focused = app_state.focus == Focus::Main;
    let show_category = app_state.active_category().is_none();
    let assets = app_state.session.visible_assets();
    let total = assets.len();

    let rows: Vec<Row> = assets
        .iter()
        .enumerate()
        .skip(app_state.scroll_offset)
        .take(app_state.visible_height.max(1))
        .map(|(i, asset)| {
            let flags = app_state.session.related_flags(asset);
            let mut badges = String::new();
            if flags.voice {
                badges.push_str("🎙 ");
            }
            if flags.original {
                badges.push_str("🎬");
            }
            let mut cells = vec![Cell::from(Span::styled(
                truncate_to_width(&asset.title, 32),
                Styles::primary(),
            ))];
            if show_category {
                cells.push(Cell::from(Span::styled(
                    asset.category.label(),
                    category_style(asset.category),
                )));
            }
            cells.push(Cell::from(Span::styled(
                truncate_to_width(&asset.subtitle, 28),
                Styles::secondary(),
            )));
            cells.push(Cell::from(Span::styled(
                truncate_to_width(&asset.tags.join(", "), 24),
                Styles::tag(),
            )));
            cells.push(Cell::from(badges));
            let row = Row::new(cells);
            if focused && i == app_state.cursor {
                row.style(Styles::selected())
            } else {
                row
            }
        })
        .collect();

    let mut widths = vec![Constraint::Min(16)];
    let mut header = vec!["Title"];
    if show_category {
        widths.push(Constraint::Length(18));
        header.push("Category");
    }
    widths.extend([Constraint::Length(28), Constraint::Length(24), Constraint::Length(5)]);
    header.extend(["Details", "Tags", ""]);

    let title = match app_state.session.folder_label() {
        Some(folder) => format!(" {} · {} ({}) ", app_state.session.view().scope.label(), folder, total),
        None => format!(" {} ({}) ", app_state.session.view().scope.label(), total),
    };
    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Styles::muted()))
        .block(panel(title, focused));
    f.render_widget(table, area);

    if total == 0 && !app_state.refresh_pending {
        render_empty(f, area, "Nothing here. Try another search or clear filters with X.");
    }
}

fn render_empty(f: &mut Frame, area: Rect, text: &str) {
    let inner = Rect {
        x: area.x + 2,
        y: area.y + 2,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(3).min(1),
    };
    f.render_widget(Paragraph::new(Span::styled(text.to_string(), Styles::muted())), inner);
}

//! Asset detail screen

use crate::category::Category;
use crate::folders::{FolderIndex, FolderRef};
use crate::tui::{
    state::AppState,
    theme::{category_style, Styles},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<20}", label), Styles::muted()),
        Span::styled(value, Styles::primary()),
    ])
}

pub fn render(f: &mut Frame, area: Rect, app_state: &AppState) {
    let Some(asset) = app_state.detail_asset() else {
        return;
    };
    let flags = app_state.session.related_flags(asset);
    let record = &asset.record;

    let index = FolderIndex::new(app_state.session.folders());
    let folder = match &record.folder_id {
        None => "—".to_string(),
        Some(id) if index.is_orphaned(asset.category, asset) => format!("{} (orphaned)", id),
        Some(id) => index.label(&FolderRef::Id(id.clone())),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}", asset.title), Styles::title()),
            Span::styled(format!("  {}", asset.category.label()), category_style(asset.category)),
        ]),
        Line::from(Span::styled(format!("  {}", asset.subtitle), Styles::secondary())),
        Line::from(""),
    ];

    for col in asset.category.columns() {
        if matches!(*col, "tags" | "folder_id") {
            continue;
        }
        let value = record.column(col).unwrap_or("").to_string();
        lines.push(field(col, value));
    }
    lines.push(field("tags", asset.tags.join(", ")));
    lines.push(field("folder", folder));
    lines.push(field(
        "created",
        record.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ));
    if let Some(thumbnail) = asset.thumbnail() {
        lines.push(field("thumbnail", thumbnail));
    }

    if asset.category == Category::Deepfakes {
        lines.push(Line::from(""));
        let badge = |on: bool, label: &'static str| {
            if on {
                Span::styled(format!("  ✔ {}", label), Styles::success())
            } else {
                Span::styled(format!("  · {}", label), Styles::muted())
            }
        };
        lines.push(Line::from(vec![
            badge(flags.voice, "voice clone [V]"),
            badge(flags.original, "original video [O]"),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_focused())
        .title(Span::styled(" Asset ", Styles::header()));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

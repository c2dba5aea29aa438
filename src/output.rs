//! Human and JSON rendering for CLI commands

use crate::category::Category;
use crate::filter::FilterOption;
use crate::folders::FolderEntry;
use crate::normalize::AssetView;
use crate::session::{RelatedFlags, Stats};
use crate::theme::Theme;
use anyhow::Result;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // Adds ids, links and folders
    VeryVerbose, // Adds timestamps and debug logging
}

impl OutputMode {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else {
            match verbose {
                0 => OutputMode::Normal,
                1 => OutputMode::Verbose,
                _ => OutputMode::VeryVerbose,
            }
        }
    }

    /// Default log filter for this verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self {
            OutputMode::Quiet => "error",
            OutputMode::Normal => "warn",
            OutputMode::Verbose => "bhhub=info,warn",
            OutputMode::VeryVerbose => "bhhub=debug,info",
        }
    }

    pub fn is_quiet(&self) -> bool {
        *self == OutputMode::Quiet
    }
}

/// Truncate a string to a maximum display width (adds ellipsis if needed).
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }

    let ellipsis = "…";
    let target = max_width.saturating_sub(UnicodeWidthStr::width(ellipsis));

    let mut out = String::new();
    let mut w = 0usize;
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > target {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push_str(ellipsis);
    out
}

/// Pad/truncate content to a specific display width (Unicode-aware).
pub fn pad_right_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let w = UnicodeWidthStr::width(truncated.as_str());
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(w)))
}

fn table_row(cols: &[(String, usize)]) -> String {
    let mut row = String::from("│");
    for (content, width) in cols {
        row.push(' ');
        row.push_str(&pad_right_to_width(content, *width));
        row.push_str(" │");
    }
    row
}

fn table_separator(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
    let mut sep = left.to_string();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            sep.push_str(mid);
        }
        sep.push_str(&"─".repeat(width + 2));
    }
    sep.push_str(right);
    sep
}

/// Render a boxed table; column widths fit the content up to `max`.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(UnicodeWidthStr::width(cell.as_str())).min(max);
            }
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(table_separator(&widths, "┌", "┬", "┐"));
    let header: Vec<(String, usize)> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| (h.to_uppercase(), *w))
        .collect();
    out.push(table_row(&header));
    out.push(table_separator(&widths, "├", "┼", "┤"));
    for row in rows {
        let cols: Vec<(String, usize)> = row.iter().cloned().zip(widths.iter().copied()).collect();
        out.push(table_row(&cols));
    }
    out.push(table_separator(&widths, "└", "┴", "┘"));
    out.join("\n")
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn badges(flags: RelatedFlags) -> String {
    let mut out = Vec::new();
    if flags.voice {
        out.push("VOZ");
    }
    if flags.original {
        out.push("ORIGINAL");
    }
    out.join(" ")
}

/// Asset list as a table. `flags` supplies the deepfake badges per row.
pub fn print_assets<F>(assets: &[&AssetView], mode: OutputMode, flags: F)
where
    F: Fn(&AssetView) -> RelatedFlags,
{
    if mode.is_quiet() {
        return;
    }
    if assets.is_empty() {
        println!("{}", Theme::muted("No assets match the current view."));
        return;
    }

    let detailed = mode != OutputMode::Normal;
    let mut headers = vec!["title", "subtitle", "category", "duration", "tags", "related"];
    if detailed {
        headers.insert(0, "id");
        headers.push("folder");
        headers.push("link");
    }
    if mode == OutputMode::VeryVerbose {
        headers.push("created");
    }

    let rows: Vec<Vec<String>> = assets
        .iter()
        .map(|a| {
            let mut row = vec![
                a.title.clone(),
                a.subtitle.clone(),
                a.category.label().to_string(),
                a.duration.clone().unwrap_or_default(),
                a.tags.join(", "),
                badges(flags(a)),
            ];
            if detailed {
                row.insert(0, a.id.clone());
                row.push(a.record.folder_id.clone().unwrap_or_else(|| "-".into()));
                row.push(a.link.clone());
            }
            if mode == OutputMode::VeryVerbose {
                row.push(a.record.created_at.format("%Y-%m-%d %H:%M").to_string());
            }
            row
        })
        .collect();

    println!("{}", render_table(&headers, &rows, 40));
    println!("{}", Theme::muted(&format!("{} asset(s)", assets.len())));
}

pub fn print_folder_listing(category: Category, entries: &[FolderEntry], mode: OutputMode) {
    if mode.is_quiet() {
        return;
    }
    println!("{}", Theme::header(category.label()));
    if entries.is_empty() {
        println!("{}", Theme::muted("No folders with matching assets."));
        return;
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let id = if e.is_virtual() {
                e.folder.to_string().to_lowercase()
            } else {
                e.folder.to_string()
            };
            vec![e.name.clone(), e.count.to_string(), id]
        })
        .collect();
    println!("{}", render_table(&["folder", "assets", "id"], &rows, 40));
}

pub fn print_stats(stats: &Stats, mode: OutputMode) {
    if mode.is_quiet() {
        return;
    }
    println!("{}", Theme::accent("BH•HUB"));
    println!("{}", Theme::divider(40));
    for (category, count) in &stats.per_category {
        println!(
            "  {} {}",
            pad_right_to_width(category.label(), 24),
            Theme::primary(&count.to_string())
        );
    }
    println!("{}", Theme::divider(40));
    println!(
        "  {} {}",
        pad_right_to_width("Total", 24),
        Theme::success(&stats.total.to_string())
    );
    println!(
        "  {} {}",
        pad_right_to_width("Pastas", 24),
        stats.folders
    );

    if !stats.recent.is_empty() {
        println!();
        println!("{}", Theme::header("Últimos assets"));
        for a in &stats.recent {
            println!(
                "  {} {} {}",
                Theme::category(&format!("[{}]", a.category.label())),
                a.title,
                Theme::muted(&a.record.created_at.format("%d/%m/%Y").to_string())
            );
        }
    }
}

pub fn print_filter_options(category: Category, options: &[FilterOption], mode: OutputMode) {
    if mode.is_quiet() {
        return;
    }
    if options.is_empty() {
        println!("{}", Theme::muted(&format!("{} has no filters.", category.label())));
        return;
    }
    println!("{}", Theme::header(&format!("Filtros: {}", category.label())));
    for opt in options {
        let values = if opt.values.is_empty() {
            Theme::muted("(no values)")
        } else {
            opt.values.join(" | ")
        };
        println!("  {} {}", Theme::command(&pad_right_to_width(opt.key, 16)), values);
    }
}

/// One asset, every populated column.
pub fn print_asset_detail(asset: &AssetView, flags: RelatedFlags) {
    println!("{}", Theme::primary(&asset.title));
    println!("{}", Theme::muted(&asset.subtitle));
    println!("{}", Theme::divider(40));
    println!("  id        {}", asset.id);
    println!("  category  {}", Theme::category(asset.category.label()));
    for col in asset.category.columns() {
        if let Some(v) = asset.record.column(col) {
            println!("  {} {}", pad_right_to_width(col, 9), v);
        }
    }
    if !asset.tags.is_empty() {
        let tags: Vec<String> = asset.tags.iter().map(|t| Theme::tag(t)).collect();
        println!("  tags      {}", tags.join(" "));
    }
    if let Some(thumb) = asset.thumbnail() {
        println!("  preview   {}", Theme::link(&thumb));
    }
    let b = badges(flags);
    if !b.is_empty() {
        println!("  related   {}", Theme::accent(&b));
    }
}

//! Record command features.
//!
//! Owns "bhhub add", "bhhub edit", "bhhub delete" and "bhhub show".

use super::{parse_category, CommandContext};
use crate::cli::{confirm, parse_assignments};
use crate::output::{self, OutputMode};
use crate::theme::Theme;
use serde_json::{Map, Value};

fn overlay(
    draft: &mut Map<String, Value>,
    fields: &[String],
    tags: Option<String>,
    folder: Option<String>,
) -> anyhow::Result<()> {
    draft.extend(parse_assignments(fields)?);
    if let Some(tags) = tags {
        draft.insert("tags_string".to_string(), Value::String(tags));
    }
    if let Some(folder) = folder {
        draft.insert("folder_id".to_string(), Value::String(folder));
    }
    Ok(())
}

pub(crate) fn handle_add(
    ctx: &CommandContext,
    category: &str,
    fields: &[String],
    tags: Option<String>,
    folder: Option<String>,
) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut draft = Map::new();
    overlay(&mut draft, fields, tags, folder)?;

    let mut session = ctx.open_session()?;
    session.save_record(category, &draft, None)?;

    if ctx.output_mode != OutputMode::Quiet {
        println!(
            "{} Asset added to {} ({} total).",
            Theme::success("OK"),
            category.label(),
            session.snapshot().records(category).len()
        );
    }
    Ok(())
}

pub(crate) fn handle_edit(
    ctx: &CommandContext,
    category: &str,
    id: &str,
    fields: &[String],
    tags: Option<String>,
    folder: Option<String>,
) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut session = ctx.open_session()?;

    let mut draft = session
        .snapshot()
        .find(category, id)
        .map(|r| r.to_draft())
        .ok_or_else(|| anyhow::anyhow!("{} record {} not found", category.label(), id))?;
    overlay(&mut draft, fields, tags, folder)?;

    session.save_record(category, &draft, Some(id))?;
    if ctx.output_mode != OutputMode::Quiet {
        println!("{} Asset {} updated.", Theme::success("OK"), id);
    }
    Ok(())
}

pub(crate) fn handle_delete(ctx: &CommandContext, category: &str, id: &str, yes: bool) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut session = ctx.open_session()?;

    let deleted = session.delete_record(category, id, |asset| {
        if yes {
            return true;
        }
        println!();
        println!(
            "{} {} ({})",
            Theme::warning("Permanently delete"),
            Theme::primary(&asset.title),
            asset.category.label()
        );
        confirm("Are you sure you want to continue?")
    })?;

    if ctx.output_mode != OutputMode::Quiet {
        if deleted {
            println!("{} Asset deleted.", Theme::success("OK"));
        } else {
            println!("Delete cancelled.");
        }
    }
    Ok(())
}

pub(crate) fn handle_show(ctx: &CommandContext, category: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let session = ctx.open_session()?;
    let asset = session
        .find_asset(category, id)
        .ok_or_else(|| anyhow::anyhow!("{} record {} not found", category.label(), id))?;

    if json {
        return output::print_json(&asset.record);
    }
    output::print_asset_detail(asset, session.related_flags(asset));
    Ok(())
}

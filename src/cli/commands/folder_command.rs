//! Folder command features.
//!
//! Owns "bhhub folders" and "bhhub folder create|rename|delete".

use super::{apply_filters, parse_category, CommandContext, DynSession};
use crate::cli::{confirm, prompt};
use crate::filter::Scope;
use crate::output::{self, OutputMode};
use crate::theme::Theme;

pub(crate) fn handle_folders(
    ctx: &CommandContext,
    category: &str,
    search: Option<&str>,
    filters: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut session = ctx.open_session()?;
    session.select_scope(Scope::Category(category));
    if let Some(term) = search {
        session.set_search(term);
    }
    apply_filters(&mut session, filters)?;

    let listing = session.root_listing();
    if json {
        return output::print_json(&listing);
    }
    output::print_folder_listing(category, &listing, ctx.output_mode);
    Ok(())
}

fn folder_category(session: &DynSession, id: &str) -> Option<String> {
    session
        .folders()
        .iter()
        .find(|f| f.id == id)
        .map(|f| f.category.clone())
}

pub(crate) fn handle_create(ctx: &CommandContext, category: &str, name: &str) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut session = ctx.open_session()?;
    session.select_scope(Scope::Category(category));
    session.create_folder(name)?;

    if ctx.output_mode != OutputMode::Quiet {
        println!(
            "{} Folder \"{}\" created in {}.",
            Theme::success("OK"),
            name.trim(),
            category.label()
        );
    }
    Ok(())
}

pub(crate) fn handle_rename(ctx: &CommandContext, id: &str, name: Option<String>) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    if folder_category(&session, id).is_none() {
        anyhow::bail!("Folder {} not found", id);
    }

    let name = match name {
        Some(n) => Some(n),
        None => prompt("New folder name"),
    };
    if session.rename_folder(id, name.as_deref())? {
        if ctx.output_mode != OutputMode::Quiet {
            println!("{} Folder renamed.", Theme::success("OK"));
        }
    } else if ctx.output_mode != OutputMode::Quiet {
        println!("Rename cancelled.");
    }
    Ok(())
}

pub(crate) fn handle_delete(ctx: &CommandContext, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let quiet = ctx.output_mode == OutputMode::Quiet;

    let deleted = session.delete_folder(id, |folder| {
        if yes {
            return true;
        }
        println!();
        println!(
            "{}",
            Theme::warning(&format!("Delete folder \"{}\"?", folder.name))
        );
        println!("Assets inside are kept; they will show up under \"Orphaned\".");
        confirm("Are you sure you want to continue?")
    })?;

    if !quiet {
        if deleted {
            println!("{} Folder deleted.", Theme::success("OK"));
        } else {
            println!("Delete cancelled.");
        }
    }
    Ok(())
}

//! List and options command features.
//!
//! Owns "bhhub list" and "bhhub options".

use super::{apply_filters, parse_category, parse_scope, CommandContext};
use crate::filter::Scope;
use crate::folders::FolderRef;
use crate::output;
use crate::output::OutputMode;

pub(crate) fn handle_list(
    ctx: &CommandContext,
    category: &str,
    search: Option<&str>,
    filters: &[String],
    folder: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let scope = parse_scope(category)?;
    let mut session = ctx.open_session()?;

    session.select_scope(scope);
    if let Some(term) = search {
        session.set_search(term);
    }
    apply_filters(&mut session, filters)?;
    if let Some(folder) = folder {
        if scope == Scope::All {
            anyhow::bail!("--folder needs a category");
        }
        session.open_folder(FolderRef::parse(folder))?;
    }

    let assets = session.visible_assets();
    if json {
        return output::print_json(&assets);
    }

    if ctx.output_mode != OutputMode::Quiet {
        if let Some(label) = session.folder_label() {
            println!("{} / {}", scope.label(), label);
        }
    }
    output::print_assets(&assets, ctx.output_mode, |a| session.related_flags(a));
    Ok(())
}

pub(crate) fn handle_options(ctx: &CommandContext, category: &str, json: bool) -> anyhow::Result<()> {
    let category = parse_category(category)?;
    let mut session = ctx.open_session()?;
    session.select_scope(Scope::Category(category));

    let options = session.filter_options();
    if json {
        return output::print_json(&options);
    }
    output::print_filter_options(category, &options, ctx.output_mode);
    Ok(())
}

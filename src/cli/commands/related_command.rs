//! Related command feature.
//!
//! "bhhub related" follows a deepfake to its voice clone or original video,
//! the same jump the dashboard makes.

use super::CommandContext;
use crate::category::Category;
use crate::output::{self, OutputMode};
use crate::session::RelatedTarget;
use crate::theme::Theme;

pub(crate) fn handle_related(
    ctx: &CommandContext,
    id: &str,
    target: RelatedTarget,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = ctx.open_session()?;
    let asset = session
        .find_asset(Category::Deepfakes, id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Deepfake {} not found", id))?;

    session.follow_related(&asset, target);
    let matches = session.visible_assets();

    if json {
        return output::print_json(&matches);
    }
    if ctx.output_mode != OutputMode::Quiet {
        println!(
            "{} → {} \"{}\"",
            Theme::primary(&asset.title),
            Theme::category(target.category().label()),
            session.view().search
        );
    }
    output::print_assets(&matches, ctx.output_mode, |a| session.related_flags(a));
    Ok(())
}

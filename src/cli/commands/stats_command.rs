//! Stats command feature.
//!
//! This module owns and handles the "bhhub stats" command behavior.

use super::CommandContext;
use crate::output;

pub(crate) fn handle_stats(ctx: &CommandContext, json: bool) -> anyhow::Result<()> {
    let session = ctx.open_session()?;
    let stats = session.stats(ctx.config.ui.recent_limit);
    if json {
        return output::print_json(&stats);
    }
    output::print_stats(&stats, ctx.output_mode);
    Ok(())
}

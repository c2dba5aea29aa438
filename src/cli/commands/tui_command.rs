//! TUI command feature.
//!
//! Opens the interactive dashboard; also the default when no subcommand is given.

use super::CommandContext;
use crate::filter::Scope;
use crate::session::Session;
use crate::tui::{self, state::AppState};

pub(crate) fn handle_tui(ctx: &CommandContext) -> anyhow::Result<()> {
    let backend = ctx.backend()?;
    let mut session = Session::new(backend);
    if let Some(category) = ctx.config.default_category() {
        session.select_scope(Scope::Category(category));
    }

    let mut app_state = AppState::new(session, &ctx.config);
    // First load happens inside the loop so the loading state is drawn.
    app_state.request_refresh();
    tui::run(app_state)
}

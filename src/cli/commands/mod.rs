//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod auth_command;
pub mod config_command;
pub mod folder_command;
pub mod list_command;
pub mod record_command;
pub mod related_command;
pub mod stats_command;
pub mod tui_command;

use crate::auth::SessionStore;
use crate::category::Category;
use crate::config::Config;
use crate::filter::Scope;
use crate::gateway::{Backend, MemoryBackend, RestBackend};
use crate::output::OutputMode;
use crate::session::Session;
use crate::spinner;
use anyhow::Context;
use chrono::Utc;
use tracing::debug;

pub type DynSession = Session<Box<dyn Backend>>;

/// What every command needs: settings, verbosity and the backend choice.
pub struct CommandContext {
    pub config: Config,
    pub output_mode: OutputMode,
    pub demo: bool,
}

impl CommandContext {
    pub fn new(config: Config, output_mode: OutputMode, demo: bool) -> Self {
        Self {
            config,
            output_mode,
            demo,
        }
    }

    /// Build the backend handle for this run.
    pub fn backend(&self) -> anyhow::Result<Box<dyn Backend>> {
        if self.demo {
            debug!("using in-memory demo backend");
            return Ok(Box::new(MemoryBackend::demo()));
        }
        if !self.config.is_configured() {
            crate::cli::print_setup_hint();
            anyhow::bail!("Backend is not configured");
        }
        let bearer = Config::data_dir()
            .ok()
            .and_then(|dir| SessionStore::new(&dir).bearer(Utc::now()));
        debug!(signed_in = bearer.is_some(), url = %self.config.backend.url, "using REST backend");
        Ok(Box::new(RestBackend::new(
            &self.config.backend.url,
            &self.config.backend.anon_key,
            bearer,
            self.config.timeout(),
        )))
    }

    /// Open a session with records and folders loaded, behind a spinner.
    pub fn open_session(&self) -> anyhow::Result<DynSession> {
        let backend = self.backend()?;
        let pb = spinner::start(
            &format!("Loading library from {}...", backend.describe()),
            !self.output_mode.is_quiet(),
        );
        let session = Session::open(backend);
        pb.finish_and_clear();
        Ok(session)
    }
}

pub(crate) fn parse_category(s: &str) -> anyhow::Result<Category> {
    s.parse::<Category>()
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("Unknown category '{}'", s))
}

pub(crate) fn parse_scope(s: &str) -> anyhow::Result<Scope> {
    s.parse::<Scope>()
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("Unknown category '{}'", s))
}

/// Apply `key=value` filter arguments to the session's active category.
pub(crate) fn apply_filters(session: &mut DynSession, filters: &[String]) -> anyhow::Result<()> {
    for pair in filters {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{}'", pair))?;
        session.set_filter(key.trim(), value.trim())?;
    }
    Ok(())
}

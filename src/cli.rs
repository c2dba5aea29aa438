use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};

pub(crate) mod commands;

use crate::config::Config;
use crate::output::OutputMode;
use crate::session::RelatedTarget;
use crate::theme::Theme;
use commands::CommandContext;

/// Read one line from stdin after flushing any pending prompt.
pub(crate) fn read_line_from_stdin() -> io::Result<String> {
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input)
}

/// Ask a yes/no question. Unreadable input counts as "no".
pub(crate) fn confirm(question: &str) -> bool {
    print!("{} [y/N]: ", question);
    match read_line_from_stdin() {
        Ok(line) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"),
        Err(_) => false,
    }
}

/// Prompt for a line of text; `None` when stdin is closed.
pub(crate) fn prompt(label: &str) -> Option<String> {
    print!("{}: ", label);
    match read_line_from_stdin() {
        Ok(line) if !line.is_empty() => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        _ => None,
    }
}

/// Parse repeated `key=value` arguments into a form draft.
pub(crate) fn parse_assignments(pairs: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut draft = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Empty field name in '{}'", pair);
        }
        draft.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(draft)
}

#[derive(Parser)]
#[command(name = "bhhub")]
#[command(version)]
#[command(about = "Browse and manage the BH•HUB creative asset library")]
#[command(
    long_about = "bhhub is a terminal dashboard and CLI for the team's asset library: \
    deepfakes, voice clones, original videos, TikTok assets, music, SFX, VEO3 clips, \
    social proof and UGC testimonials.\n\n\
    Interactive Mode:\n  \
    bhhub                            # Launch the dashboard\n  \
    bhhub --demo                     # Dashboard over a built-in sample library\n\n\
    Examples:\n  \
    bhhub list music -f emocao=Urgência\n  \
    bhhub folders sfx\n  \
    bhhub add music --set nome=Epic --set link_audio=https://... --tags \"trailer, epic\"\n  \
    bhhub related 42 --to voice"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use the built-in sample library instead of the hosted backend
    #[arg(long, global = true)]
    pub demo: bool,

    /// Backend URL (overrides config and BHHUB_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RelatedArg {
    Voice,
    Original,
}

impl From<RelatedArg> for RelatedTarget {
    fn from(arg: RelatedArg) -> Self {
        match arg {
            RelatedArg::Voice => RelatedTarget::Voice,
            RelatedArg::Original => RelatedTarget::Original,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Tui,

    /// List assets, optionally narrowed by category, search, filters and folder
    #[command(visible_alias = "ls")]
    List {
        /// Category slug (music, sfx, deepfakes, ...) or "all"
        #[arg(default_value = "all")]
        category: String,

        /// Free-text search over title and tags
        #[arg(short = 's', long)]
        search: Option<String>,

        /// Filter as key=value (repeatable), e.g. -f emocao=Urgência
        #[arg(short = 'f', long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Only assets in this folder (folder id, "raw" or "orphaned")
        #[arg(long)]
        folder: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one asset in full
    Show {
        category: String,
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Library counters and latest assets
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// List the filter values available in a category
    Options {
        category: String,

        #[arg(long)]
        json: bool,
    },

    /// Folder listing of a category (only folders with matching assets)
    Folders {
        category: String,

        #[arg(short = 's', long)]
        search: Option<String>,

        #[arg(short = 'f', long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Create, rename or delete folders
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },

    /// Add a new asset
    Add {
        category: String,

        /// Column value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Folder id ("" for none)
        #[arg(long)]
        folder: Option<String>,
    },

    /// Update an existing asset (unspecified columns keep their values)
    Edit {
        category: String,
        id: String,

        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,

        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        folder: Option<String>,
    },

    /// Permanently delete an asset
    #[command(visible_alias = "rm")]
    Delete {
        category: String,
        id: String,

        /// Skip confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Show the voice clone or original video related to a deepfake
    Related {
        /// Deepfake id
        id: String,

        #[arg(long = "to", value_enum, default_value = "voice")]
        target: RelatedArg,

        #[arg(long)]
        json: bool,
    },

    /// Sign in, sign up, reset password or sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// View or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,

        /// Print the config file path
        #[arg(long)]
        path: bool,

        /// Store the backend URL
        #[arg(long, value_name = "URL")]
        set_url: Option<String>,

        /// Store the anonymous key
        #[arg(long, value_name = "KEY")]
        set_anon_key: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// Create a top-level folder in a category
    Create { category: String, name: String },

    /// Rename a folder (prompts when no name is given)
    Rename { id: String, name: Option<String> },

    /// Delete a folder; its assets stay where they are
    Delete {
        id: String,

        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthAction {
    Login {
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    Signup {
        email: String,

        #[arg(long)]
        password: Option<String>,
    },
    /// Send a password reset e-mail
    Reset { email: String },
    Logout,
    Status,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.verbose, self.quiet)
    }

    /// True when the dashboard will take over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = self.output_mode();
        let mut config = Config::load_or_create();
        config.apply_env_overrides();
        config.apply_cli_overrides(self.url.clone(), None);
        let ctx = CommandContext::new(config, output_mode, self.demo);

        match self.command.unwrap_or(Commands::Tui) {
            Commands::Tui => commands::tui_command::handle_tui(&ctx),
            Commands::List {
                category,
                search,
                filters,
                folder,
                json,
            } => commands::list_command::handle_list(
                &ctx,
                &category,
                search.as_deref(),
                &filters,
                folder.as_deref(),
                json,
            ),
            Commands::Show { category, id, json } => {
                commands::record_command::handle_show(&ctx, &category, &id, json)
            }
            Commands::Stats { json } => commands::stats_command::handle_stats(&ctx, json),
            Commands::Options { category, json } => {
                commands::list_command::handle_options(&ctx, &category, json)
            }
            Commands::Folders {
                category,
                search,
                filters,
                json,
            } => commands::folder_command::handle_folders(
                &ctx,
                &category,
                search.as_deref(),
                &filters,
                json,
            ),
            Commands::Folder { action } => match action {
                FolderAction::Create { category, name } => {
                    commands::folder_command::handle_create(&ctx, &category, &name)
                }
                FolderAction::Rename { id, name } => {
                    commands::folder_command::handle_rename(&ctx, &id, name)
                }
                FolderAction::Delete { id, yes } => {
                    commands::folder_command::handle_delete(&ctx, &id, yes)
                }
            },
            Commands::Add {
                category,
                fields,
                tags,
                folder,
            } => commands::record_command::handle_add(&ctx, &category, &fields, tags, folder),
            Commands::Edit {
                category,
                id,
                fields,
                tags,
                folder,
            } => commands::record_command::handle_edit(
                &ctx, &category, &id, &fields, tags, folder,
            ),
            Commands::Delete { category, id, yes } => {
                commands::record_command::handle_delete(&ctx, &category, &id, yes)
            }
            Commands::Related { id, target, json } => {
                commands::related_command::handle_related(&ctx, &id, target.into(), json)
            }
            Commands::Auth { action } => commands::auth_command::handle_auth(&ctx, action),
            Commands::Config {
                show,
                reset,
                path,
                set_url,
                set_anon_key,
            } => commands::config_command::handle_config(show, reset, path, set_url, set_anon_key),
        }
    }
}

/// Short usage hint printed after errors that need configuration.
pub(crate) fn print_setup_hint() {
    eprintln!();
    eprintln!(
        "{} Set {} and {} or run {}",
        Theme::warning("Hint:"),
        Theme::command("BHHUB_URL"),
        Theme::command("BHHUB_ANON_KEY"),
        Theme::command("bhhub config --set-url <URL> --set-anon-key <KEY>"),
    );
    eprintln!(
        "      Try {} for a sample library.",
        Theme::command("bhhub --demo")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let draft = parse_assignments(&["nome=Epic Rise".into(), " emocao = Urgência ".into()]).unwrap();
        assert_eq!(draft["nome"], Value::String("Epic Rise".into()));
        assert_eq!(draft["emocao"], Value::String("Urgência".into()));
        assert!(parse_assignments(&["novalue".into()]).is_err());
        assert!(parse_assignments(&["=x".into()]).is_err());
    }

    #[test]
    fn test_link_values_keep_equals_signs() {
        let draft = parse_assignments(&["link_video=https://x/watch?v=abc".into()]).unwrap();
        assert_eq!(draft["link_video"], Value::String("https://x/watch?v=abc".into()));
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from(["bhhub", "--demo", "list", "music", "-f", "emocao=Urgência", "-s", "epic"]).unwrap();
        assert!(cli.demo);
        match cli.command {
            Some(Commands::List { category, filters, search, .. }) => {
                assert_eq!(category, "music");
                assert_eq!(filters, vec!["emocao=Urgência"]);
                assert_eq!(search.as_deref(), Some("epic"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_no_command_is_interactive() {
        let cli = Cli::try_parse_from(["bhhub"]).unwrap();
        assert!(cli.is_interactive());
        let cli = Cli::try_parse_from(["bhhub", "stats"]).unwrap();
        assert!(!cli.is_interactive());
    }
}

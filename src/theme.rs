//! Terminal text styling for CLI output
//!
//! Colors are dropped automatically when stdout is not a terminal or
//! `NO_COLOR` is set (handled by `colored`).

use colored::Colorize;

/// Formatting helpers used by every command
pub struct Theme;

impl Theme {
    pub fn primary(text: &str) -> String {
        text.bold().to_string()
    }

    /// Brand gold
    pub fn accent(text: &str) -> String {
        text.truecolor(255, 215, 0).bold().to_string()
    }

    pub fn secondary(text: &str) -> String {
        text.white().to_string()
    }

    pub fn muted(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn success(text: &str) -> String {
        text.green().bold().to_string()
    }

    pub fn warning(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn error(text: &str) -> String {
        text.red().bold().to_string()
    }

    pub fn header(text: &str) -> String {
        text.to_uppercase().bold().to_string()
    }

    pub fn category(text: &str) -> String {
        text.cyan().to_string()
    }

    pub fn tag(text: &str) -> String {
        format!("#{}", text).magenta().to_string()
    }

    pub fn link(text: &str) -> String {
        text.blue().underline().to_string()
    }

    pub fn command(text: &str) -> String {
        text.truecolor(255, 215, 0).to_string()
    }

    pub fn divider(width: usize) -> String {
        "─".repeat(width).dimmed().to_string()
    }

    pub fn divider_bold(width: usize) -> String {
        "═".repeat(width)
    }
}

//! Spinner shared by the CLI loaders and the TUI status bar

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Braille spinner frames (same set indicatif uses by default)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame for a TUI tick; advances every second tick.
pub fn get_spinner(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize / 2) % SPINNER_FRAMES.len()]
}

pub fn spinner_chars() -> &'static str {
    "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"
}

/// Start a steady spinner with `message`. Hidden when `visible` is false.
pub fn start(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.yellow} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(spinner_chars());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_spinner_cycles() {
        let seen: std::collections::HashSet<_> = (0..20).map(get_spinner).collect();
        assert_eq!(seen.len(), SPINNER_FRAMES.len());
    }

    #[test]
    fn test_spinner_chars_matches_frames() {
        let expected: String = SPINNER_FRAMES.iter().copied().collect();
        assert_eq!(spinner_chars(), expected);
    }

    #[test]
    fn test_hidden_spinner() {
        let pb = start("loading", false);
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}

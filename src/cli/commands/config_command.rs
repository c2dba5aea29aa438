//! Config command feature.
//!
//! This module owns and handles the "bhhub config" command behavior.

use crate::config::Config;
use crate::theme::Theme;

fn mask(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key.chars().take(6).collect();
    format!("{}…", visible)
}

fn print_config(config: &Config) {
    println!("{}", Theme::header("Current Configuration"));
    println!("{}", Theme::divider_bold(60));
    println!();
    println!("Backend:");
    if config.backend.url.is_empty() {
        println!("  URL: (not set)");
    } else {
        println!("  URL: {}", config.backend.url);
    }
    println!("  Anon key: {}", mask(&config.backend.anon_key));
    println!("  Timeout: {} s", config.backend.timeout_secs);
    println!();
    println!("UI Settings:");
    match &config.ui.default_category {
        Some(c) => println!("  Default category: {}", c),
        None => println!("  Default category: (home)"),
    }
    println!("  Recent assets: {}", config.ui.recent_limit);
    println!("  Tick rate: {} ms", config.ui.tick_rate_ms);
    println!();
    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

pub(crate) fn handle_config(
    show: bool,
    reset: bool,
    path: bool,
    set_url: Option<String>,
    set_anon_key: Option<String>,
) -> anyhow::Result<()> {
    if show {
        print_config(&Config::load_or_create());
    } else if reset {
        Config::default().save()?;
        println!("{} Configuration reset to defaults.", Theme::success("OK"));
    } else if path {
        println!("{}", Config::config_path()?.display());
    } else if set_url.is_some() || set_anon_key.is_some() {
        let mut config = Config::load_or_create();
        config.apply_cli_overrides(set_url, set_anon_key);
        config.save()?;
        println!("{} Configuration saved.", Theme::success("OK"));
    } else {
        // Default: show config
        print_config(&Config::load_or_create());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_key() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("eyJhbGciOiJIUzI1NiJ9"), "eyJhbG…");
    }
}

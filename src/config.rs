//! User configuration
//!
//! Stored as TOML in the per-user config directory. Missing keys take their
//! defaults, so an old or partial file always loads.

use crate::category::Category;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const ENV_URL: &str = "BHHUB_URL";
pub const ENV_ANON_KEY: &str = "BHHUB_ANON_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Public anonymous key
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Category opened at start (slug), or none for the home view
    #[serde(default)]
    pub default_category: Option<String>,

    /// Size of the "latest assets" strip
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_category: None,
            recent_limit: default_recent_limit(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_recent_limit() -> usize {
    8
}
fn default_tick_rate_ms() -> u64 {
    120
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "bhever", "bhhub").context("Could not determine home directory")
}

impl Config {
    /// `<config dir>/bhhub/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Per-user data directory (session file, logs).
    pub fn data_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Load config from file or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config file");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config file");
                Self::default()
            }
        }
    }

    /// Load, writing the defaults out first if no file exists yet.
    pub fn load_or_create() -> Self {
        if let Ok(path) = Self::config_path() {
            if !path.exists() {
                if let Err(e) = Self::default().save_to(&path) {
                    warn!(error = %e, "could not write default config");
                }
            }
        }
        Self::load()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml).context("Failed to write config file")?;
        Ok(())
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_URL).ok(),
            std::env::var(ENV_ANON_KEY).ok(),
        );
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(&mut self, url: Option<String>, anon_key: Option<String>) {
        self.apply_overrides(url, anon_key);
    }

    fn apply_overrides(&mut self, url: Option<String>, anon_key: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = anon_key.filter(|k| !k.trim().is_empty()) {
            self.backend.anon_key = key;
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.backend.url.trim().is_empty() && !self.backend.anon_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs.max(1))
    }

    /// Start-up category; unknown slugs are ignored.
    pub fn default_category(&self) -> Option<Category> {
        self.ui
            .default_category
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.ui.recent_limit, 8);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_config_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.backend.url = "https://x.supabase.co".into();
        config.ui.default_category = Some("music".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.default_category(), Some(Category::Music));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"https://y\"\n").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.backend.url, "https://y");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.ui.tick_rate_ms, 120);
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_config_apply_cli_overrides() {
        let mut config = Config::default();
        config.backend.anon_key = "file-key".into();
        config.apply_cli_overrides(Some("https://cli".into()), None);
        assert_eq!(config.backend.url, "https://cli");
        assert_eq!(config.backend.anon_key, "file-key");

        config.apply_cli_overrides(Some("  ".into()), Some("k2".into()));
        assert_eq!(config.backend.url, "https://cli");
        assert_eq!(config.backend.anon_key, "k2");
        assert!(config.is_configured());
    }

    #[test]
    fn test_unknown_default_category_ignored() {
        let mut config = Config::default();
        config.ui.default_category = Some("podcasts".into());
        assert_eq!(config.default_category(), None);
    }
}

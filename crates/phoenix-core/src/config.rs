use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::invoker::InvokeOptions;

/// Environment variable that overrides `backend.anon_key`.
pub const ANON_KEY_ENV: &str = "PHOENIX_ANON_KEY";

/// Hosted backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent as `apikey` and bearer token.
    #[serde(default)]
    pub anon_key: String,
    /// Per-call transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries allowed after the first failed attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Global configuration loaded from `~/.config/phoenix/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoenixConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl PhoenixConfig {
    /// Invoke options for the configured (or default) retry policy.
    pub fn retry_options(&self) -> InvokeOptions {
        let retry = self.retry.unwrap_or_default();
        InvokeOptions::new()
            .max_retries(retry.max_retries)
            .base_delay(Duration::from_millis(retry.base_delay_ms))
    }

    /// Apply `PHOENIX_ANON_KEY` if it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(ANON_KEY_ENV) {
            if !key.is_empty() {
                self.backend.anon_key = key;
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("phoenix")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PhoenixConfig> {
    let mut cfg = load_or_init_at(&config_path()?)?;
    cfg.apply_env();
    Ok(cfg)
}

/// Like [`load_or_init`] for an explicit path, without the env override.
pub fn load_or_init_at(path: &Path) -> Result<PhoenixConfig> {
    if !path.exists() {
        let default_cfg = PhoenixConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: PhoenixConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

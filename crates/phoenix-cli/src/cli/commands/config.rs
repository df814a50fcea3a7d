//! `phoenix config` – show config path and effective settings.

use anyhow::Result;
use phoenix_core::config::{self, PhoenixConfig};

pub fn run_config(cfg: &PhoenixConfig) -> Result<()> {
    let path = config::config_path()?;
    let retry = cfg.retry.unwrap_or_default();
    println!("config:        {}", path.display());
    println!("backend url:   {}", cfg.backend.url);
    println!("anon key:      {}", redact(&cfg.backend.anon_key));
    println!("timeout:       {}s", cfg.backend.timeout_secs);
    println!("max retries:   {}", retry.max_retries);
    println!("base delay:    {} ms", retry.base_delay_ms);
    Ok(())
}

fn redact(key: &str) -> String {
    match key.chars().count() {
        0 => "(not set)".to_string(),
        n if n <= 8 => "********".to_string(),
        _ => format!("{}…", key.chars().take(4).collect::<String>()),
    }
}

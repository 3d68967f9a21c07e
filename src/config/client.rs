// src/config/client.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

use crate::history::DEFAULT_HISTORY_CAP;

pub const ENV_CONFIG_PATH: &str = "FACTLENS_CONFIG";
const ENV_BASE_URL: &str = "FACTLENS_BASE_URL";
const ENV_HISTORY_CAP: &str = "FACTLENS_HISTORY_CAP";
const ENV_DEBOUNCE_MS: &str = "FACTLENS_DEBOUNCE_MS";

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}
fn default_debounce_ms() -> u64 {
    1000
}
fn default_connect_timeout() -> u64 {
    4
}
fn default_request_timeout() -> u64 {
    30
}
fn default_theme_path() -> PathBuf {
    PathBuf::from("state/theme.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Classification service root, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Quiet period before a URL preview is fetched.
    #[serde(default = "default_debounce_ms")]
    pub preview_debounce_ms: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_theme_path")]
    pub theme_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            history_cap: default_history_cap(),
            preview_debounce_ms: default_debounce_ms(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            theme_path: default_theme_path(),
        }
    }
}

impl ClientConfig {
    /// Load from an explicit path. TOML or JSON, picked by extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading client config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: ClientConfig = match ext.as_str() {
            "toml" => toml::from_str(&data)
                .with_context(|| format!("parsing TOML config {}", path.display()))?,
            _ => serde_json::from_str(&data)
                .with_context(|| format!("parsing JSON config {}", path.display()))?,
        };
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks, then apply env overrides:
    /// 1) $FACTLENS_CONFIG
    /// 2) config/client.toml
    /// 3) config/client.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let toml_p = PathBuf::from("config/client.toml");
            let json_p = PathBuf::from("config/client.json");
            if toml_p.exists() {
                Self::load_from_file(&toml_p)?
            } else if json_p.exists() {
                Self::load_from_file(&json_p)?
            } else {
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Ok(v) = env::var(ENV_HISTORY_CAP) {
            self.history_cap = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_HISTORY_CAP} must be a positive integer"))?;
        }
        if let Ok(v) = env::var(ENV_DEBOUNCE_MS) {
            self.preview_debounce_ms = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEBOUNCE_MS} must be milliseconds"))?;
        }
        Ok(self.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        if self.history_cap == 0 {
            self.history_cap = 1;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = default_connect_timeout();
        }
        self
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.preview_debounce_ms)
    }
}

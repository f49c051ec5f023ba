use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "scrape-dash.toml";
const ENV_FILE: &str = ".env";
const API_BASE_ENV: &str = "SCRAPE_DASH_API_BASE";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Mock,
    Rest,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub mode: BackendMode,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub mock_latency_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Mock,
            base_url: "http://localhost:8080/api".to_string(),
            request_timeout_ms: 5000,
            mock_latency_ms: 400,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub default_minutes: u32,
    /// Upper bound (inclusive) of the simulated posts added per tick.
    pub max_posts_per_tick: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_minutes: 10,
            max_posts_per_tick: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub page_size: usize,
    pub recent_posts: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            recent_posts: 8,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Environment overrides. Real env vars take precedence over `.env`.
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            let base = sanitize(&base);
            if !base.is_empty() {
                self.api.base_url = base;
            }
        }
    }

    /// Load `.env` into the process environment without overwriting
    /// variables that are already set.
    pub fn load_env_file() {
        let content = match std::fs::read_to_string(ENV_FILE) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

/// `KEY=VALUE` pairs from a dotenv file. Comments, blank lines and a
/// leading BOM are skipped; surrounding quotes are stripped.
fn parse_env(content: &str) -> Vec<(String, String)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| {
            (
                k.trim().to_string(),
                v.trim().trim_matches('"').trim_matches('\'').to_string(),
            )
        })
        .collect()
}

fn sanitize(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "").trim().to_string()
}

//! Configuration types for chatpulse.
//!
//! [`Config::load`] layers, in order: the embedded defaults, a TOML file, and
//! `CHATPULSE__SECTION__KEY` environment variables. Without an explicit path
//! the file is `$XDG_CONFIG_HOME/chatpulse/config.toml` (falling back to
//! `~/.config`), created with the defaults if it does not yet exist.
//! [`Config::defaults`] returns the defaults without touching the filesystem
//! (useful in tests).

use crate::classifier::ProfanityFilter;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[storage]
backend         = "memory"
path            = "chatpulse.db"
busy_timeout_ms = 2000

[classifier]
denylist = ["madarchod", "bhosdike", "chutiya", "gaand", "bc"]

[privilege]
premium_users = []

[enrichment]
enabled     = false
endpoint    = "https://api.openai.com/v1/responses"
model       = "gemini-2.5-flash-lite"
api_key_env = "GEMINI_API_KEY"
timeout_ms  = 5000

[alerts]

[export]

[dashboard]
bind             = "0.0.0.0:5000"
top_n            = 5
unknown_username = "unknown"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub privilege: PrivilegeConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Which [`RecordStore`](crate::store::RecordStore) implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Sqlite,
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// SQLite database file. Ignored by the memory backend.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Upper bound on how long a durable write waits for the database lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_storage_path() -> PathBuf { PathBuf::from("chatpulse.db") }
fn default_busy_timeout_ms() -> u64 { 2000 }

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_storage_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// `[classifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

fn default_denylist() -> Vec<String> {
    crate::classifier::DEFAULT_DENYLIST
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ClassifierConfig {
    pub fn profanity_filter(&self) -> ProfanityFilter {
        ProfanityFilter::new(&self.denylist)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { denylist: default_denylist() }
    }
}

/// `[privilege]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivilegeConfig {
    #[serde(default)]
    pub premium_users: HashSet<i64>,
}

/// `[enrichment]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_enrichment_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_enrichment_model")]
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_enrichment_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_enrichment_endpoint() -> String { "https://api.openai.com/v1/responses".to_string() }
fn default_enrichment_model() -> String { "gemini-2.5-flash-lite".to_string() }
fn default_api_key_env() -> String { "GEMINI_API_KEY".to_string() }
fn default_enrichment_timeout_ms() -> u64 { 5000 }

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Bearer token read from `api_key_env`, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_enrichment_endpoint(),
            model: default_enrichment_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_enrichment_timeout_ms(),
        }
    }
}

/// `[alerts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Alert text; `{user}` is replaced by the offender's username.
    #[serde(default = "default_alert_template")]
    pub template: String,
    /// Optional HTTP endpoint receiving `{"chat_id":..,"text":..}` alerts.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

fn default_alert_template() -> String { crate::ingest::DEFAULT_ALERT_TEMPLATE.to_string() }

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            template: default_alert_template(),
            webhook_url: None,
        }
    }
}

/// `[export]` section. Export is disabled unless `path` is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[dashboard]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Leaderboard label for messages whose sender has no username.
    #[serde(default = "default_unknown_username")]
    pub unknown_username: String,
}

fn default_bind() -> String { "0.0.0.0:5000".to_string() }
fn default_top_n() -> usize { 5 }
fn default_unknown_username() -> String { "unknown".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            top_n: default_top_n(),
            unknown_username: default_unknown_username(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration layered on top of the built-in defaults.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file
    /// is used and created with the defaults if missing.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => {
                let p = config_path();
                if !p.exists() {
                    if let Some(parent) = p.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&p, DEFAULT_CONFIG.trim_start())?;
                }
                (p, false)
            }
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix("CHATPULSE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Load from a TOML string layered on the defaults. No filesystem or
    /// environment access.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("chatpulse")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

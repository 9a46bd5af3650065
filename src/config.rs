//! Server configuration.
//!
//! Read from YAML, every field optional:
//!
//! ```yaml
//! server:
//!   listen_addr: "127.0.0.1:8080"
//!   max_connections: 256
//!   read_timeout_secs: 30     # null disables the timeout; 0 is rejected
//! site:
//!   document_root: "webroot"
//!   index_file: "index.html"
//!   legacy_status: false      # true: always answer 200
//! log_level: "info"
//! ```
//!
//! The file is `$DOCSERVE_CONFIG` if set, else `docserve.yaml` if present.
//! `LISTEN`, `DOCUMENT_ROOT` and `LOG_LEVEL` override the file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::Semaphore;

pub const CONFIG_ENV: &str = "DOCSERVE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "docserve.yaml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Connections handled at once; more are refused with 503.
    pub max_connections: usize,
    pub read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub document_root: PathBuf,
    pub index_file: String,
    pub legacy_status: bool,
}

/// Log verbosity, as accepted by `tracing::Level`'s parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_connections: 256,
            read_timeout_secs: Some(30),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("webroot"),
            index_file: "index.html".to_string(),
            legacy_status: false,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl LogLevel {
    pub fn to_level(&self) -> anyhow::Result<tracing::Level> {
        self.0
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.0))
    }
}

impl Config {
    /// Loads configuration from file and process environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        Self::from_yaml_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LISTEN`, `DOCUMENT_ROOT` and `LOG_LEVEL` as returned by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup("DOCUMENT_ROOT") {
            self.site.document_root = PathBuf::from(root);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = LogLevel(level);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.max_connections == 0 {
            anyhow::bail!("server.max_connections must be at least 1");
        }
        if self.server.max_connections > Semaphore::MAX_PERMITS {
            anyhow::bail!(
                "server.max_connections must be at most {}",
                Semaphore::MAX_PERMITS
            );
        }
        if self.server.read_timeout_secs == Some(0) {
            anyhow::bail!("server.read_timeout_secs must be at least 1, or null to disable");
        }
        if self.site.index_file.is_empty() {
            anyhow::bail!("site.index_file must not be empty");
        }
        self.log_level.to_level()?;
        Ok(())
    }
}

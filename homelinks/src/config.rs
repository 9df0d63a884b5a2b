//! Configuration management for homelinks

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::document::DEFAULT_CATEGORY;

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV_VAR: &str = "HOMELINKS_CONFIG";

/// Storage key of the builder working copy
pub const DEFAULT_STORAGE_KEY: &str = "homepageBookmarks";

/// Default enrichment request timeout (10 seconds)
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/get";

/// Icon services probed in order; `{domain}` is replaced by the URL host
pub const DEFAULT_ICON_SOURCES: [&str; 4] = [
    "https://www.google.com/s2/favicons?domain={domain}&sz=64",
    "https://favicon.ico?domain={domain}",
    "https://api.faviconkit.com/{domain}/64",
    "https://icon.horse/icon/{domain}",
];

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category used when a bookmark is added without one
    pub default_category: String,
    /// Builder working copy storage
    pub storage: StorageConfig,
    /// Title and icon lookup
    pub enrichment: EnrichmentConfig,
    /// Export settings
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            storage: StorageConfig::default(),
            enrichment: EnrichmentConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file (defaults to `<data dir>/homelinks/store.db`)
    pub path: Option<PathBuf>,
    /// Key holding the serialized working copy
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Enrichment configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Look up titles and icons over the network
    pub enabled: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Proxy answering `GET ?url=<page>` with `{"contents": "<html>"}`
    pub proxy_url: String,
    /// Icon service templates, tried in order
    pub icon_sources: Vec<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            icon_sources: DEFAULT_ICON_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when exporting into a directory
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "homepage-bookmarks.yaml".to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration, falling back to defaults.
    ///
    /// Looks at `explicit`, then `HOMELINKS_CONFIG`, then
    /// `<config dir>/homelinks/config.toml`. A file that cannot be read or
    /// parsed is reported and ignored.
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = Self::resolve_path(explicit) else {
            return Self::default();
        };

        let loaded = std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Self::from_toml_str(&content));
        match loaded {
            Ok(config) => {
                tracing::debug!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring configuration file {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("homelinks").join("config.toml"))
            .filter(|path| path.is_file())
    }
}

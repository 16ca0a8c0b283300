//! Configuration file support
//!
//! An optional `config.toml` lives in the data directory
//! (`~/.local/share/finsight/config.toml` on Linux) or wherever
//! `FINSIGHT_CONFIG` points. Every key is optional:
//!
//! ```toml
//! [storage]
//! path = "/home/me/finsight.db"
//!
//! [import]
//! classify_concurrency = 1
//!
//! [insights]
//! debounce_ms = 1500
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::insights::DEFAULT_DEBOUNCE;
use crate::store::ImportOptions;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file location
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Classifier calls allowed in flight during an import
    pub classify_concurrency: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            classify_concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Quiet period before insights are recomputed
    pub debounce_ms: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load from `FINSIGHT_CONFIG` or the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("FINSIGHT_CONFIG")
            .map(PathBuf::from)
            .or_else(default_config_path);

        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config");
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.import.classify_concurrency == 0 {
            return Err(Error::Config(
                "import.classify_concurrency must be at least 1".into(),
            ));
        }
        Ok(config)
    }

    /// Database path: explicit path (`--db` or `FINSIGHT_DB`), then config, then default
    pub fn db_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.storage.path.clone())
            .unwrap_or_else(default_db_path)
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            classify_concurrency: self.import.classify_concurrency.max(1),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.insights.debounce_ms)
    }
}

/// FinSight's directory under the platform data dir
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finsight"))
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("config.toml"))
}

/// Default database location (falls back to the working directory)
pub fn default_db_path() -> PathBuf {
    data_dir()
        .map(|d| d.join("finsight.db"))
        .unwrap_or_else(|| PathBuf::from("finsight.db"))
}

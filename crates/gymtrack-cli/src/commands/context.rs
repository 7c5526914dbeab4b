//! Shared command context
//!
//! Resolves the config file and data directory once per invocation and opens
//! the session store on demand.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use gymtrack_core::config::{Config, DisplayConfig};
use gymtrack_core::session::SessionStore;
use gymtrack_storage::FileSystemStore;

/// Resolved settings for one CLI invocation
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub data_dir: PathBuf,
}

impl AppContext {
    /// Load the config and pick the data directory
    ///
    /// The `--data-dir` flag (or `GYMTRACK_DATA_DIR`) wins over
    /// `[storage] data_dir`, which wins over the platform default.
    pub fn load(config_path: &Path, data_dir_override: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_dir = data_dir_override
            .map(Path::to_path_buf)
            .or_else(|| config.storage.data_dir.clone())
            .unwrap_or_else(FileSystemStore::default_dir);

        tracing::debug!("Using data directory {}", data_dir.display());
        Ok(Self { config, data_dir })
    }

    /// Open the session store on the data directory
    pub fn open_store(&self) -> Result<SessionStore> {
        let kv = FileSystemStore::new(&self.data_dir).with_context(|| {
            format!("Failed to open data directory {}", self.data_dir.display())
        })?;
        Ok(SessionStore::open(kv))
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.config.display
    }
}

/// Config file location: the explicit path, else `<config_dir>/config.toml`
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    directories::ProjectDirs::from("com", "gymtrack", "gymtrack")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".gymtrack")
        })
        .join("config.toml")
}

//! Portal core configuration.
//!
//! Loaded from a `config.toml` next to the data directory. Everything is
//! optional — an absent file means pure defaults:
//!
//! ```toml
//! # Where table JSON files live. Omit to run on the in-memory fallback
//! # (nothing persists - the "backend not configured" mode).
//! data_dir = "data"
//!
//! [import]
//! # Fixed year applied to imported devotional dates. Omit to use the
//! # current calendar year at import time.
//! target_year = 2026
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::import;
use crate::store::{LocalBackend, MemoryBackend, Store};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which backend a config selects.
pub enum ConfiguredStore {
    /// `data_dir` is set: durable JSON files.
    Local(Store<LocalBackend>),
    /// No `data_dir`: the in-process fallback, nothing persists.
    Memory(Store<MemoryBackend>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    /// Directory for table JSON files. `None` selects the in-memory
    /// fallback backend.
    pub data_dir: Option<PathBuf>,
    /// Bulk import settings.
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Fixed year for imported devotional dates. `None` = current year,
    /// resolved at import time.
    pub target_year: Option<i32>,
}

impl PortalConfig {
    /// Load `config.toml` from a directory. A missing file yields defaults;
    /// a present-but-invalid file is an error.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(year) = self.import.target_year
            && !(1..=9999).contains(&year)
        {
            return Err(ConfigError::Validation(
                "import.target_year must be a four-digit year".into(),
            ));
        }
        Ok(())
    }

    /// The year to stamp onto imported devotional dates.
    pub fn target_year(&self) -> i32 {
        self.import.target_year.unwrap_or_else(import::current_year)
    }

    /// Open the store this config selects.
    pub fn open_store(&self) -> ConfiguredStore {
        match &self.data_dir {
            Some(dir) => ConfiguredStore::Local(Store::new(LocalBackend::new(dir))),
            None => ConfiguredStore::Memory(Store::new(MemoryBackend::new())),
        }
    }
}

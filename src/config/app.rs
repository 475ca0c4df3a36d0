use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the inventory database, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "inventario_hardware_v3.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Insert the example dataset when the door table is empty.
    pub seed: bool,
}

impl AppConfig {
    /// Loads a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e.message())))
    }

    /// Resolves the effective configuration: defaults, then the optional
    /// config file, then an explicit database path.
    pub fn resolve(config_file: Option<&Path>, db_path: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(db_path) = db_path {
            config.db_path = db_path;
        }
        if config.db_path.as_os_str().is_empty() {
            return Err(Error::Config("db_path cannot be empty".to_string()));
        }
        Ok(config)
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            seed: true,
        }
    }
}

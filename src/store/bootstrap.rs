use std::fs;

use serde::Serialize;
use tracing::{error, info};

use super::{SqliteStore, Store};
use crate::config::AppConfig;
use crate::error::Result;

/// What [`bootstrap`] did to the database file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// The file did not exist and was created.
    pub created: bool,
    /// The example dataset was inserted.
    pub seeded: bool,
}

/// Opens the inventory database, creating the file and schema when missing
/// and seeding the example dataset when no door exists yet.
///
/// Only failing to open the file is returned as an error. Schema and seed
/// failures are logged and leave the store as it is; the first query
/// against it then reports the problem.
pub fn bootstrap(config: &AppConfig) -> Result<(SqliteStore, BootstrapReport)> {
    let path = config.db_path();
    let mut report = BootstrapReport {
        created: !path.exists(),
        seeded: false,
    };

    if report.created {
        info!("Creating database file '{}'", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(path)?;

    if let Err(e) = store.initialize() {
        error!("Failed to create database schema: {e}");
        return Ok((store, report));
    }

    if !config.seed {
        return Ok((store, report));
    }

    match store.is_empty() {
        Ok(true) => match store.seed() {
            Ok(()) => {
                info!("Inserted example dataset");
                report.seeded = true;
            }
            Err(e) => error!("Failed to insert example dataset: {e}"),
        },
        Ok(false) => info!("Database already populated"),
        Err(e) => error!("Failed to check database contents: {e}"),
    }

    Ok((store, report))
}

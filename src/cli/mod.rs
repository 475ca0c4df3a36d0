mod commands;
mod door;
mod info;
mod init;
pub mod logging;
pub mod pickers;
mod tree;

pub use commands::DoorCommands;
pub use door::{run_door_edit, run_door_show};
pub use info::run_info;
pub use init::run_init;
pub use tree::run_tree;

use crate::config::AppConfig;
use crate::store::{SqliteStore, Store};

/// Opens an existing inventory database, refusing to create a new one.
pub fn init_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'doorway init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(db_path)?;
    store.initialize()?;
    Ok(store)
}

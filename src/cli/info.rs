use crate::config::AppConfig;
use crate::store::Store;

use super::init_store;

pub fn run_info(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let store = init_store(config)?;
    let counts = store.counts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!();
    println!("Doorway Inventory");
    println!("{}", "─".repeat(17));
    println!("Database:          {}", config.db_path().display());
    println!("Buildings:         {}", counts.buildings);
    println!("Floors:            {}", counts.floors);
    println!("Rooms:             {}", counts.rooms);
    println!("Doors:             {}", counts.doors);
    println!("Device types:      {}", counts.device_types);
    println!("Devices:           {}", counts.devices);
    println!("External systems:  {}", counts.external_systems);
    println!("Interconnections:  {}", counts.interconnections);
    println!();

    Ok(())
}

use crate::config::AppConfig;
use crate::store::{Store, bootstrap};

pub fn run_init(config: &AppConfig) -> anyhow::Result<()> {
    let (store, report) = bootstrap(config)?;
    let counts = store.counts()?;

    println!();
    if report.created {
        println!("Created database at {}", config.db_path().display());
    } else {
        println!("Database already exists at {}", config.db_path().display());
    }
    if report.seeded {
        println!(
            "Inserted example dataset ({} buildings, {} doors, {} devices)",
            counts.buildings, counts.doors, counts.devices
        );
    }
    println!();

    Ok(())
}

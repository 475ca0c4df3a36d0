use crate::config::AppConfig;
use crate::hierarchy::{load_hierarchy, render_text};

use super::init_store;

pub fn run_tree(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let store = init_store(config)?;
    let sections = load_hierarchy(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
    } else if sections.is_empty() {
        println!("No buildings.");
    } else {
        print!("{}", render_text(&sections));
    }

    Ok(())
}

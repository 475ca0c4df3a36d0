use crate::config::AppConfig;
use crate::door_form::DoorForm;
use crate::error::Error;
use crate::store::{SqliteStore, Store};

use super::init_store;
use super::pickers::{pick_room, prompt_door_name, prompt_text};

fn load_form(store: &SqliteStore, id: i64) -> anyhow::Result<DoorForm> {
    match DoorForm::load(store, id) {
        Ok(form) => Ok(form),
        Err(Error::NotFound) => anyhow::bail!("Door {} not found", id),
        Err(e) => Err(e.into()),
    }
}

fn print_form(store: &SqliteStore, form: &DoorForm) -> anyhow::Result<()> {
    let room = match form.room_id {
        Some(room_id) => store
            .get_room(room_id)?
            .map(|r| format!("{} ({})", r.name, r.id))
            .unwrap_or_else(|| format!("<unknown> ({})", room_id)),
        None => "None".to_string(),
    };

    println!();
    println!("Door {}: {}", form.door_id, form.name);
    println!("{}", "─".repeat(20));
    println!("Room:      {}", room);
    println!("Location:  {}", form.location);
    println!("Notes:     {}", form.notes);
    println!();
    println!("Devices:");
    if form.devices.is_empty() {
        println!("  (none)");
    }
    for device in &form.devices {
        println!("  {}", device);
    }
    println!();
    println!("Interconnections:");
    if form.interconnections.is_empty() {
        println!("  (none)");
    }
    for link in &form.interconnections {
        println!("  {}", link);
    }
    println!();

    Ok(())
}

pub fn run_door_show(config: &AppConfig, id: i64, json: bool) -> anyhow::Result<()> {
    let store = init_store(config)?;
    let form = load_form(&store, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    print_form(&store, &form)
}

pub fn run_door_edit(
    config: &AppConfig,
    id: i64,
    name: Option<String>,
    room: Option<i64>,
    no_room: bool,
    notes: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(config)?;
    let mut form = load_form(&store, id)?;

    let name = match name {
        Some(name) => Some(name),
        None if non_interactive => None,
        None => prompt_door_name(&form.name)?,
    };
    if let Some(name) = name.filter(|n| *n != form.name) {
        form.set_name(name);
    }

    let room_id = if no_room {
        Some(None)
    } else if let Some(room_id) = room {
        if store.get_room(room_id)?.is_none() {
            anyhow::bail!("Room {} not found", room_id);
        }
        Some(Some(room_id))
    } else if non_interactive {
        None
    } else {
        pick_room(&store, form.room_id)?
    };
    if let Some(room_id) = room_id.filter(|r| *r != form.room_id) {
        form.select_room(&store, room_id)?;
    }

    let notes = match notes {
        Some(notes) => Some(notes),
        None if non_interactive => None,
        None => prompt_text("Notes:", &form.notes)?,
    };
    if let Some(notes) = notes.filter(|n| *n != form.notes) {
        form.set_notes(notes);
    }

    if !form.is_dirty() {
        println!("No changes to door {}", id);
        return Ok(());
    }

    form.save(&store)?;

    println!();
    println!("Updated door {}: \"{}\"", id, form.name);
    if !form.location.is_empty() {
        println!("Location: {}", form.location);
    }
    println!();

    Ok(())
}

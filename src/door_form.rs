//! Door detail form: editable name, room and notes plus read-only views of
//! the door's devices, their interconnections and the room's location.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Door, DoorDevice, DoorInterconnection, Room};

/// One entry of the room selector. `room_id == None` is "no room".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomChoice {
    pub room_id: Option<i64>,
    pub label: String,
}

impl From<Room> for RoomChoice {
    fn from(room: Room) -> Self {
        Self {
            room_id: Some(room.id),
            label: room.name,
        }
    }
}

impl fmt::Display for RoomChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.room_id {
            Some(id) => write!(f, "{} ({})", self.label, id),
            None => f.write_str(&self.label),
        }
    }
}

/// Room selector options: "None" first, then every room by name.
pub fn room_choices<S: Store + ?Sized>(store: &S) -> Result<Vec<RoomChoice>> {
    let mut choices = vec![RoomChoice {
        room_id: None,
        label: "None".to_string(),
    }];
    choices.extend(store.list_all_rooms()?.into_iter().map(RoomChoice::from));
    Ok(choices)
}

/// Location text for a room: the full path when the room sits on a floor,
/// the bare room name otherwise, empty when no room is selected.
pub fn location_text<S: Store + ?Sized>(store: &S, room_id: Option<i64>) -> Result<String> {
    let Some(room_id) = room_id else {
        return Ok(String::new());
    };

    if let Some(path) = store.room_location(room_id)? {
        return Ok(path.to_string());
    }

    Ok(store
        .get_room(room_id)?
        .map(|room| room.name)
        .unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct DoorForm {
    pub door_id: i64,
    pub name: String,
    pub room_id: Option<i64>,
    pub notes: String,
    /// Derived from `room_id`; see [`location_text`].
    pub location: String,
    pub devices: Vec<DoorDevice>,
    pub interconnections: Vec<DoorInterconnection>,
    #[serde(skip)]
    dirty: bool,
}

impl DoorForm {
    /// Loads a door with its devices and the interconnections reachable
    /// through them.
    pub fn load<S: Store + ?Sized>(store: &S, door_id: i64) -> Result<Self> {
        let door = store.get_door(door_id)?.ok_or(Error::NotFound)?;
        let location = location_text(store, door.room_id)?;
        let devices = store.list_door_devices(door_id)?;
        let interconnections = store.list_door_interconnections(door_id)?;

        Ok(Self {
            door_id,
            name: door.name,
            room_id: door.room_id,
            notes: door.notes.unwrap_or_default(),
            location,
            devices,
            interconnections,
            dirty: false,
        })
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.dirty = true;
    }

    /// Changes the selected room and recomputes the location field.
    pub fn select_room<S: Store + ?Sized>(&mut self, store: &S, room_id: Option<i64>) -> Result<()> {
        self.location = location_text(store, room_id)?;
        self.room_id = room_id;
        self.dirty = true;
        Ok(())
    }

    /// Writes name, room and notes back in a single UPDATE. No conflict
    /// detection: the last save wins.
    pub fn save<S: Store + ?Sized>(&mut self, store: &S) -> Result<()> {
        let door = Door {
            id: self.door_id,
            name: self.name.clone(),
            room_id: self.room_id,
            notes: Some(self.notes.clone()),
        };
        store.update_door(&door)?;
        tracing::info!(door_id = self.door_id, room_id = ?self.room_id, "Saved door");
        self.name = door.name.trim().to_string();
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use crate::types::NewRoom;

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.seed().unwrap();
        store
    }

    #[test]
    fn test_load_seeded_door() {
        let store = seeded_store();
        let form = DoorForm::load(&store, 2).unwrap();

        assert_eq!(form.name, "Porta Sala Server");
        assert_eq!(form.room_id, Some(1));
        assert_eq!(form.location, "Edificio A > Piano 1 > Locale CED");
        assert_eq!(form.devices.len(), 1);
        assert_eq!(form.devices[0].model, "BioLite N2");
        assert!(form.interconnections.is_empty());
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_load_unknown_door() {
        let store = seeded_store();
        assert!(matches!(DoorForm::load(&store, 99), Err(Error::NotFound)));
    }

    #[test]
    fn test_select_room_recomputes_location() {
        let store = seeded_store();
        let mut form = DoorForm::load(&store, 1).unwrap();
        assert_eq!(form.location, "Edificio A > Piano Terra > Reception");

        form.select_room(&store, Some(1)).unwrap();
        assert_eq!(form.location, "Edificio A > Piano 1 > Locale CED");
        assert!(form.is_dirty());

        form.select_room(&store, None).unwrap();
        assert_eq!(form.location, "");
    }

    #[test]
    fn test_location_falls_back_to_room_name() {
        let store = seeded_store();
        let room = store
            .create_room(&NewRoom {
                name: "Deposito".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(location_text(&store, Some(room)).unwrap(), "Deposito");
    }

    #[test]
    fn test_reparent_and_save_persists() {
        let store = seeded_store();
        let mut form = DoorForm::load(&store, 1).unwrap();
        form.select_room(&store, Some(1)).unwrap();
        form.set_notes("Badge + PIN");
        form.save(&store).unwrap();
        assert!(!form.is_dirty());

        let reloaded = DoorForm::load(&store, 1).unwrap();
        assert_eq!(reloaded.room_id, Some(1));
        assert_eq!(reloaded.notes, "Badge + PIN");
        assert_eq!(reloaded.location, "Edificio A > Piano 1 > Locale CED");
        // Devices stay attached to the door, not the room.
        assert_eq!(reloaded.devices.len(), 2);
    }

    #[test]
    fn test_last_writer_wins() {
        let store = seeded_store();
        let mut first = DoorForm::load(&store, 1).unwrap();
        let mut second = DoorForm::load(&store, 1).unwrap();

        first.set_name("Ingresso Nord");
        first.save(&store).unwrap();
        second.set_name("Ingresso Sud");
        second.save(&store).unwrap();

        assert_eq!(DoorForm::load(&store, 1).unwrap().name, "Ingresso Sud");
    }

    #[test]
    fn test_save_blank_name_is_rejected() {
        let store = seeded_store();
        let mut form = DoorForm::load(&store, 1).unwrap();
        form.set_name("   ");

        assert!(matches!(form.save(&store), Err(Error::BadRequest(_))));
        assert!(form.is_dirty());
        assert_eq!(store.get_door(1).unwrap().unwrap().name, "Ingresso Principale");
    }

    #[test]
    fn test_room_choices_start_with_none() {
        let store = seeded_store();
        let labels: Vec<_> = room_choices(&store)
            .unwrap()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, ["None", "Locale CED", "Reception"]);
    }
}

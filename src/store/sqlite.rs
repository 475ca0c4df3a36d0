use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::name::{normalize_name, normalize_optional};
use super::schema::{SCHEMA, TABLES};
use super::seed::SEED;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Not persisted in the file: every new handle has to turn it on.
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True when `device_id` is `candidate` or one of its ancestors.
    fn is_ancestor_or_self(conn: &Connection, device_id: i64, candidate: i64) -> Result<bool> {
        // UNION (not UNION ALL) stops the walk on rows that already loop.
        let found: bool = conn.query_row(
            "WITH RECURSIVE ancestors(id) AS (
                 SELECT ?1
                 UNION
                 SELECT d.parent_device_id FROM devices d
                 JOIN ancestors a ON d.id = a.id
                 WHERE d.parent_device_id IS NOT NULL
             )
             SELECT EXISTS(SELECT 1 FROM ancestors WHERE id = ?2)",
            params![candidate, device_id],
            |row| row.get(0),
        )?;
        Ok(found)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| tracing::error!("Invalid date in database: '{}' - {}", s, e))
        .ok()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn building_from_row(row: &Row<'_>) -> rusqlite::Result<Building> {
    Ok(Building {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        notes: row.get(3)?,
    })
}

fn floor_from_row(row: &Row<'_>) -> rusqlite::Result<Floor> {
    Ok(Floor {
        id: row.get(0)?,
        name: row.get(1)?,
        building_id: row.get(2)?,
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        floor_id: row.get(3)?,
    })
}

fn door_from_row(row: &Row<'_>) -> rusqlite::Result<Door> {
    Ok(Door {
        id: row.get(0)?,
        name: row.get(1)?,
        room_id: row.get(2)?,
        notes: row.get(3)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn seed(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute_batch(SEED).map_err(Error::from_write)?;
        tx.commit()?;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM doors", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    fn counts(&self) -> Result<InventoryCounts> {
        let conn = self.conn();
        let mut values = [0i64; TABLES.len()];
        for (value, table) in values.iter_mut().zip(TABLES) {
            *value = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        }

        let [
            buildings,
            floors,
            rooms,
            doors,
            device_types,
            devices,
            external_systems,
            interconnections,
        ] = values;

        Ok(InventoryCounts {
            buildings,
            floors,
            rooms,
            doors,
            device_types,
            devices,
            external_systems,
            interconnections,
        })
    }

    // Building operations

    fn create_building(&self, building: &NewBuilding) -> Result<i64> {
        let name = normalize_name("building name", &building.name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO buildings (name, address, notes) VALUES (?1, ?2, ?3)",
            params![
                name,
                normalize_optional(building.address.as_deref()),
                normalize_optional(building.notes.as_deref()),
            ],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_building(&self, id: i64) -> Result<Option<Building>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, address, notes FROM buildings WHERE id = ?1",
            params![id],
            building_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_buildings(&self) -> Result<Vec<Building>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, address, notes FROM buildings ORDER BY name")?;

        let rows = stmt.query_map([], building_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_building(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM buildings WHERE id = ?1", params![id])
            .map_err(Error::from_write)?;
        Ok(rows > 0)
    }

    // Floor operations

    fn create_floor(&self, name: &str, building_id: i64) -> Result<i64> {
        let name = normalize_name("floor name", name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO floors (name, building_id) VALUES (?1, ?2)",
            params![name, building_id],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_floor(&self, id: i64) -> Result<Option<Floor>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, building_id FROM floors WHERE id = ?1",
            params![id],
            floor_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_floors(&self, building_id: i64) -> Result<Vec<Floor>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, building_id FROM floors WHERE building_id = ?1 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![building_id], floor_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_floor(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM floors WHERE id = ?1", params![id])
            .map_err(Error::from_write)?;
        Ok(rows > 0)
    }

    // Room operations

    fn create_room(&self, room: &NewRoom) -> Result<i64> {
        let name = normalize_name("room name", &room.name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO rooms (name, description, floor_id) VALUES (?1, ?2, ?3)",
            params![
                name,
                normalize_optional(room.description.as_deref()),
                room.floor_id,
            ],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_room(&self, id: i64) -> Result<Option<Room>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, description, floor_id FROM rooms WHERE id = ?1",
            params![id],
            room_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_rooms(&self, floor_id: i64) -> Result<Vec<Room>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, floor_id FROM rooms WHERE floor_id = ?1 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![floor_id], room_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_unassigned_rooms(&self) -> Result<Vec<Room>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, floor_id FROM rooms WHERE floor_id IS NULL ORDER BY name",
        )?;

        let rows = stmt.query_map([], room_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_all_rooms(&self) -> Result<Vec<Room>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, description, floor_id FROM rooms ORDER BY name")?;

        let rows = stmt.query_map([], room_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn room_location(&self, room_id: i64) -> Result<Option<LocationPath>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT b.name, f.name, r.name
             FROM rooms r
             JOIN floors f ON r.floor_id = f.id
             JOIN buildings b ON f.building_id = b.id
             WHERE r.id = ?1",
            params![room_id],
            |row| {
                Ok(LocationPath {
                    building: row.get(0)?,
                    floor: row.get(1)?,
                    room: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Door operations

    fn create_door(&self, door: &NewDoor) -> Result<i64> {
        let name = normalize_name("door name", &door.name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO doors (name, room_id, notes) VALUES (?1, ?2, ?3)",
            params![name, door.room_id, normalize_optional(door.notes.as_deref())],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_door(&self, id: i64) -> Result<Option<Door>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, room_id, notes FROM doors WHERE id = ?1",
            params![id],
            door_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_doors(&self, room_id: Option<i64>) -> Result<Vec<Door>> {
        let conn = self.conn();
        let rows = match room_id {
            Some(room_id) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, room_id, notes FROM doors WHERE room_id = ?1 ORDER BY name",
                )?;
                stmt.query_map(params![room_id], door_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT id, name, room_id, notes FROM doors ORDER BY name")?;
                stmt.query_map([], door_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    fn list_unassigned_doors(&self) -> Result<Vec<Door>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, room_id, notes FROM doors WHERE room_id IS NULL ORDER BY name",
        )?;

        let rows = stmt.query_map([], door_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_door(&self, door: &Door) -> Result<()> {
        let name = normalize_name("door name", &door.name)?;
        let rows = self
            .conn()
            .execute(
                "UPDATE doors SET name = ?1, room_id = ?2, notes = ?3 WHERE id = ?4",
                params![
                    name,
                    door.room_id,
                    normalize_optional(door.notes.as_deref()),
                    door.id
                ],
            )
            .map_err(Error::from_write)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Device type operations

    fn create_device_type(&self, name: &str, description: Option<&str>) -> Result<i64> {
        let name = normalize_name("device type name", name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO device_types (name, description) VALUES (?1, ?2)",
            params![name, normalize_optional(description)],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn list_device_types(&self) -> Result<Vec<DeviceType>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, description FROM device_types ORDER BY name")?;

        let rows = stmt.query_map([], |row| {
            Ok(DeviceType {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Device operations

    fn create_device(&self, device: &NewDevice) -> Result<i64> {
        let model = normalize_name("device model", &device.model)?;
        let status = normalize_optional(device.status.as_deref())
            .unwrap_or_else(|| DEFAULT_DEVICE_STATUS.to_string());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO devices (model, serial, description, install_date, status,
                                  type_id, parent_device_id, room_id, door_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                model,
                normalize_optional(device.serial.as_deref()),
                normalize_optional(device.description.as_deref()),
                device.install_date.as_ref().map(format_date),
                status,
                device.type_id,
                device.parent_device_id,
                device.room_id,
                device.door_id,
            ],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_device(&self, id: i64) -> Result<Option<Device>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, model, serial, description, install_date, status,
                    type_id, parent_device_id, room_id, door_id
             FROM devices WHERE id = ?1",
            params![id],
            |row| {
                Ok(Device {
                    id: row.get(0)?,
                    model: row.get(1)?,
                    serial: row.get(2)?,
                    description: row.get(3)?,
                    install_date: row
                        .get::<_, Option<String>>(4)?
                        .and_then(|s| parse_date(&s)),
                    status: row
                        .get::<_, Option<String>>(5)?
                        .unwrap_or_else(|| DEFAULT_DEVICE_STATUS.to_string()),
                    type_id: row.get(6)?,
                    parent_device_id: row.get(7)?,
                    room_id: row.get(8)?,
                    door_id: row.get(9)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn set_device_parent(&self, device_id: i64, parent_id: Option<i64>) -> Result<()> {
        let conn = self.conn();

        if let Some(parent_id) = parent_id {
            if Self::is_ancestor_or_self(&conn, device_id, parent_id)? {
                return Err(Error::DeviceCycle {
                    device_id,
                    parent_id,
                });
            }
        }

        let rows = conn
            .execute(
                "UPDATE devices SET parent_device_id = ?1 WHERE id = ?2",
                params![parent_id, device_id],
            )
            .map_err(Error::from_write)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn list_door_devices(&self, door_id: i64) -> Result<Vec<DoorDevice>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.model, t.name, d.serial
             FROM devices d
             JOIN device_types t ON d.type_id = t.id
             WHERE d.door_id = ?1
             ORDER BY t.name, d.model",
        )?;

        let rows = stmt.query_map(params![door_id], |row| {
            Ok(DoorDevice {
                id: row.get(0)?,
                model: row.get(1)?,
                type_name: row.get(2)?,
                serial: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // External system and interconnection operations

    fn create_external_system(
        &self,
        name: &str,
        system_type: Option<&str>,
        technical_contact: Option<&str>,
    ) -> Result<i64> {
        let name = normalize_name("system name", name)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO external_systems (name, system_type, technical_contact)
             VALUES (?1, ?2, ?3)",
            params![
                name,
                normalize_optional(system_type),
                normalize_optional(technical_contact),
            ],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn list_external_systems(&self) -> Result<Vec<ExternalSystem>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, system_type, technical_contact FROM external_systems ORDER BY name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ExternalSystem {
                id: row.get(0)?,
                name: row.get(1)?,
                system_type: row.get(2)?,
                technical_contact: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn create_interconnection(&self, interconnection: &NewInterconnection) -> Result<i64> {
        let description = normalize_name("connection description", &interconnection.description)?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO interconnections (device_id, system_id, description, signal_type, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                interconnection.device_id,
                interconnection.system_id,
                description,
                normalize_optional(interconnection.signal_type.as_deref()),
                normalize_optional(interconnection.notes.as_deref()),
            ],
        )
        .map_err(Error::from_write)?;
        Ok(conn.last_insert_rowid())
    }

    fn list_door_interconnections(&self, door_id: i64) -> Result<Vec<DoorInterconnection>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT i.id, s.name, i.description, d.model
             FROM interconnections i
             JOIN devices d ON i.device_id = d.id
             JOIN external_systems s ON i.system_id = s.id
             WHERE d.door_id = ?1
             ORDER BY s.name, i.id",
        )?;

        let rows = stmt.query_map(params![door_id], |row| {
            Ok(DoorInterconnection {
                id: row.get(0)?,
                system_name: row.get(1)?,
                description: row.get(2)?,
                device_model: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.seed().unwrap();
        store
    }

    fn building(name: &str) -> NewBuilding {
        NewBuilding {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for table in TABLES {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = seeded_store();
        store.initialize().unwrap();
        assert_eq!(store.counts().unwrap().doors, 2);
    }

    #[test]
    fn test_duplicate_building_name_is_rejected() {
        let store = seeded_store();

        let result = store.create_building(&building("Edificio A"));
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        assert_eq!(store.counts().unwrap().buildings, 2);
    }

    #[test]
    fn test_floor_name_unique_per_building_only() {
        let store = seeded_store();

        // "Piano Terra" already exists in both seeded buildings.
        let result = store.create_floor("Piano Terra", 1);
        assert!(matches!(result, Err(Error::AlreadyExists(_))));

        let other = store.create_building(&building("Edificio C")).unwrap();
        store.create_floor("Piano Terra", other).unwrap();
    }

    #[test]
    fn test_delete_building_cascades_to_floors() {
        let store = seeded_store();
        let b = store.create_building(&building("Edificio C")).unwrap();
        let f1 = store.create_floor("Piano 1", b).unwrap();
        let f2 = store.create_floor("Piano 2", b).unwrap();

        assert!(store.delete_building(b).unwrap());

        assert!(store.get_floor(f1).unwrap().is_none());
        assert!(store.get_floor(f2).unwrap().is_none());
        assert!(store.list_floors(b).unwrap().is_empty());
        assert_eq!(store.counts().unwrap().floors, 3);
    }

    #[test]
    fn test_delete_floor_detaches_rooms() {
        let store = seeded_store();
        let b = store.create_building(&building("Edificio C")).unwrap();
        let f = store.create_floor("Piano 1", b).unwrap();
        let room = store
            .create_room(&NewRoom {
                name: "Archivio".to_string(),
                description: None,
                floor_id: Some(f),
            })
            .unwrap();

        assert!(store.delete_floor(f).unwrap());

        let room = store.get_room(room).unwrap().unwrap();
        assert_eq!(room.floor_id, None);
        assert!(
            store
                .list_unassigned_rooms()
                .unwrap()
                .iter()
                .any(|r| r.name == "Archivio")
        );
    }

    #[test]
    fn test_foreign_keys_enabled_on_every_connection() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.db");
        {
            let store = SqliteStore::new(&path).unwrap();
            store.initialize().unwrap();
            store.seed().unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let enabled: i64 = store
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);

        // Building 2 owns floor 3; the cascade only happens when enforced.
        assert!(store.delete_building(2).unwrap());
        assert!(store.get_floor(3).unwrap().is_none());
    }

    #[test]
    fn test_door_with_unknown_room_is_rejected() {
        let store = seeded_store();

        let result = store.create_door(&NewDoor {
            name: "Uscita Sicurezza".to_string(),
            room_id: Some(99),
            notes: None,
        });
        assert!(matches!(result, Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_room_location_for_seeded_room() {
        let store = seeded_store();

        let path = store.room_location(1).unwrap().unwrap();
        assert_eq!(path.to_string(), "Edificio A > Piano 1 > Locale CED");
    }

    #[test]
    fn test_room_location_without_floor_is_none() {
        let store = seeded_store();
        let room = store
            .create_room(&NewRoom {
                name: "Deposito".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert!(store.room_location(room).unwrap().is_none());
        assert!(store.room_location(999).unwrap().is_none());
    }

    #[test]
    fn test_update_door_reparents() {
        let store = seeded_store();
        let mut door = store.get_door(1).unwrap().unwrap();
        assert_eq!(door.room_id, Some(2));

        door.room_id = Some(1);
        door.notes = Some("Spostata".to_string());
        store.update_door(&door).unwrap();

        let reloaded = store.get_door(1).unwrap().unwrap();
        assert_eq!(reloaded.room_id, Some(1));
        assert_eq!(reloaded.notes.as_deref(), Some("Spostata"));
        assert_eq!(store.list_doors(Some(1)).unwrap().len(), 2);
        assert!(store.list_doors(Some(2)).unwrap().is_empty());
    }

    #[test]
    fn test_update_missing_door_is_not_found() {
        let store = seeded_store();
        let door = Door {
            id: 42,
            name: "Fantasma".to_string(),
            room_id: None,
            notes: None,
        };
        assert!(matches!(store.update_door(&door), Err(Error::NotFound)));
    }

    #[test]
    fn test_update_door_to_taken_name_is_rejected() {
        let store = seeded_store();
        let mut door = store.get_door(1).unwrap().unwrap();
        door.name = "Porta Sala Server".to_string();

        assert!(matches!(
            store.update_door(&door),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_list_doors_orders_by_name() {
        let store = seeded_store();
        let names: Vec<_> = store
            .list_doors(None)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["Ingresso Principale", "Porta Sala Server"]);
    }

    #[test]
    fn test_door_devices_and_interconnections() {
        let store = seeded_store();

        let devices = store.list_door_devices(1).unwrap();
        let labels: Vec<_> = devices.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            ["[Lettore] HID R10 (SN: -)", "[Scatola Interfaccia] Modulo I/O (SN: -)"]
        );

        let links = store.list_door_interconnections(1).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].to_string(),
            "Impianto Antincendio <- Input Sblocco Emergenza (on Modulo I/O)"
        );

        assert!(store.list_door_interconnections(2).unwrap().is_empty());
    }

    #[test]
    fn test_device_defaults_and_dates() {
        let store = seeded_store();
        let id = store
            .create_device(&NewDevice {
                model: "Securitron M62".to_string(),
                serial: Some("SN-001".to_string()),
                install_date: NaiveDate::from_ymd_opt(2024, 3, 15),
                type_id: 3,
                parent_device_id: Some(1),
                door_id: Some(2),
                ..Default::default()
            })
            .unwrap();

        let device = store.get_device(id).unwrap().unwrap();
        assert_eq!(device.status, DEFAULT_DEVICE_STATUS);
        assert_eq!(device.install_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(device.parent_device_id, Some(1));
    }

    #[test]
    fn test_duplicate_serial_is_rejected() {
        let store = seeded_store();
        let device = NewDevice {
            model: "HID R40".to_string(),
            serial: Some("SN-42".to_string()),
            type_id: 2,
            ..Default::default()
        };
        store.create_device(&device).unwrap();

        assert!(matches!(
            store.create_device(&device),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_device_requires_existing_type_and_parent() {
        let store = seeded_store();

        let bad_type = store.create_device(&NewDevice {
            model: "Sconosciuto".to_string(),
            type_id: 99,
            ..Default::default()
        });
        assert!(matches!(bad_type, Err(Error::InvalidReference(_))));

        let bad_parent = store.create_device(&NewDevice {
            model: "Orfano".to_string(),
            type_id: 2,
            parent_device_id: Some(99),
            ..Default::default()
        });
        assert!(matches!(bad_parent, Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_set_device_parent_rejects_cycles() {
        let store = seeded_store();

        // 1 is the controller, 2 hangs off it.
        assert!(matches!(
            store.set_device_parent(1, Some(2)),
            Err(Error::DeviceCycle {
                device_id: 1,
                parent_id: 2
            })
        ));
        assert!(matches!(
            store.set_device_parent(2, Some(2)),
            Err(Error::DeviceCycle { .. })
        ));

        // Moving a reader under a sibling is fine.
        store.set_device_parent(2, Some(3)).unwrap();
        assert_eq!(store.get_device(2).unwrap().unwrap().parent_device_id, Some(3));

        // The chain is now 1 <- 3 <- 2; closing it at the top must fail.
        assert!(matches!(
            store.set_device_parent(1, Some(2)),
            Err(Error::DeviceCycle { .. })
        ));

        store.set_device_parent(2, None).unwrap();
        assert_eq!(store.get_device(2).unwrap().unwrap().parent_device_id, None);
    }

    #[test]
    fn test_set_parent_of_missing_device() {
        let store = seeded_store();
        assert!(matches!(
            store.set_device_parent(99, Some(1)),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_get_building() {
        let store = seeded_store();

        let a = store.get_building(1).unwrap().unwrap();
        assert_eq!(a.name, "Edificio A");
        assert_eq!(a.address.as_deref(), Some("Via Roma 1, Milano"));
        assert!(store.get_building(99).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_room_name_is_rejected() {
        let store = seeded_store();

        // Room names are global, even across floors.
        let result = store.create_room(&NewRoom {
            name: "Reception".to_string(),
            floor_id: Some(1),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        assert_eq!(store.counts().unwrap().rooms, 2);
    }

    #[test]
    fn test_device_types() {
        let store = seeded_store();

        let id = store
            .create_device_type("Pulsante", Some("Richiesta uscita"))
            .unwrap();
        let types = store.list_device_types().unwrap();
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["Centralina", "Lettore", "Pulsante", "Scatola Interfaccia", "Serratura"]
        );
        let created = types.iter().find(|t| t.id == id).unwrap();
        assert_eq!(created.description.as_deref(), Some("Richiesta uscita"));

        assert!(matches!(
            store.create_device_type("Lettore", None),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_external_systems() {
        let store = seeded_store();

        store
            .create_external_system("Antintrusione", Some("Sicurezza"), Some("Mario Rossi"))
            .unwrap();
        let systems = store.list_external_systems().unwrap();
        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0].name, "Antintrusione");
        assert_eq!(systems[0].technical_contact.as_deref(), Some("Mario Rossi"));
        assert_eq!(systems[1].system_type.as_deref(), Some("Sicurezza"));

        assert!(matches!(
            store.create_external_system("Impianto Antincendio", None, None),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_interconnection_shows_on_door() {
        let store = seeded_store();
        let system = store
            .create_external_system("Antintrusione", None, None)
            .unwrap();

        store
            .create_interconnection(&NewInterconnection {
                device_id: 4,
                system_id: system,
                description: "Allarme porta forzata".to_string(),
                signal_type: Some("NC".to_string()),
                notes: None,
            })
            .unwrap();

        let links = store.list_door_interconnections(2).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].to_string(),
            "Antintrusione <- Allarme porta forzata (on BioLite N2)"
        );
        assert_eq!(store.counts().unwrap().interconnections, 2);
    }

    #[test]
    fn test_interconnection_requires_existing_device_and_system() {
        let store = seeded_store();
        let link = |device_id, system_id| NewInterconnection {
            device_id,
            system_id,
            description: "Contatto".to_string(),
            signal_type: None,
            notes: None,
        };

        assert!(matches!(
            store.create_interconnection(&link(99, 1)),
            Err(Error::InvalidReference(_))
        ));
        assert!(matches!(
            store.create_interconnection(&link(1, 99)),
            Err(Error::InvalidReference(_))
        ));
        assert_eq!(store.counts().unwrap().interconnections, 1);
    }
}

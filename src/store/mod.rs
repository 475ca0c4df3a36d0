mod bootstrap;
pub mod name;
mod schema;
mod seed;
mod sqlite;

pub use bootstrap::{BootstrapReport, bootstrap};
pub use schema::TABLES;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Creates any missing tables and indexes.
    fn initialize(&self) -> Result<()>;
    /// Inserts the example dataset. Callers check [`Store::is_empty`] first.
    fn seed(&self) -> Result<()>;
    /// True when no door has been recorded yet.
    fn is_empty(&self) -> Result<bool>;
    fn counts(&self) -> Result<InventoryCounts>;

    // Building operations
    fn create_building(&self, building: &NewBuilding) -> Result<i64>;
    fn get_building(&self, id: i64) -> Result<Option<Building>>;
    fn list_buildings(&self) -> Result<Vec<Building>>;
    fn delete_building(&self, id: i64) -> Result<bool>;

    // Floor operations
    fn create_floor(&self, name: &str, building_id: i64) -> Result<i64>;
    fn get_floor(&self, id: i64) -> Result<Option<Floor>>;
    fn list_floors(&self, building_id: i64) -> Result<Vec<Floor>>;
    fn delete_floor(&self, id: i64) -> Result<bool>;

    // Room operations
    fn create_room(&self, room: &NewRoom) -> Result<i64>;
    fn get_room(&self, id: i64) -> Result<Option<Room>>;
    fn list_rooms(&self, floor_id: i64) -> Result<Vec<Room>>;
    fn list_unassigned_rooms(&self) -> Result<Vec<Room>>;
    fn list_all_rooms(&self) -> Result<Vec<Room>>;
    /// Building > Floor > Room for a room; `None` when the room has no floor
    /// or does not exist.
    fn room_location(&self, room_id: i64) -> Result<Option<LocationPath>>;

    // Door operations
    fn create_door(&self, door: &NewDoor) -> Result<i64>;
    fn get_door(&self, id: i64) -> Result<Option<Door>>;
    /// All doors, or only the doors of one room.
    fn list_doors(&self, room_id: Option<i64>) -> Result<Vec<Door>>;
    fn list_unassigned_doors(&self) -> Result<Vec<Door>>;
    /// Overwrites name, room and notes. Last writer wins.
    fn update_door(&self, door: &Door) -> Result<()>;

    // Device type operations
    fn create_device_type(&self, name: &str, description: Option<&str>) -> Result<i64>;
    fn list_device_types(&self) -> Result<Vec<DeviceType>>;

    // Device operations
    fn create_device(&self, device: &NewDevice) -> Result<i64>;
    fn get_device(&self, id: i64) -> Result<Option<Device>>;
    /// Re-parents a device, rejecting assignments that would form a cycle.
    fn set_device_parent(&self, device_id: i64, parent_id: Option<i64>) -> Result<()>;
    fn list_door_devices(&self, door_id: i64) -> Result<Vec<DoorDevice>>;

    // External system and interconnection operations
    fn create_external_system(
        &self,
        name: &str,
        system_type: Option<&str>,
        technical_contact: Option<&str>,
    ) -> Result<i64>;
    fn list_external_systems(&self) -> Result<Vec<ExternalSystem>>;
    fn create_interconnection(&self, interconnection: &NewInterconnection) -> Result<i64>;
    fn list_door_interconnections(&self, door_id: i64) -> Result<Vec<DoorInterconnection>>;
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status assigned to devices inserted without one.
pub const DEFAULT_DEVICE_STATUS: &str = "Operativo";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBuilding {
    pub name: String,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub id: i64,
    pub name: String,
    pub building_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub floor_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewRoom {
    pub name: String,
    pub description: Option<String>,
    pub floor_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: i64,
    pub name: String,
    pub room_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDoor {
    pub name: String,
    pub room_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_date: Option<NaiveDate>,
    pub status: String,
    pub type_id: i64,
    pub parent_device_id: Option<i64>,
    pub room_id: Option<i64>,
    /// Door the device is mounted on.
    pub door_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDevice {
    pub model: String,
    pub serial: Option<String>,
    pub description: Option<String>,
    pub install_date: Option<NaiveDate>,
    /// `None` falls back to [`DEFAULT_DEVICE_STATUS`].
    pub status: Option<String>,
    pub type_id: i64,
    pub parent_device_id: Option<i64>,
    pub room_id: Option<i64>,
    pub door_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSystem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_contact: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewInterconnection {
    pub device_id: i64,
    pub system_id: i64,
    pub description: String,
    pub signal_type: Option<String>,
    pub notes: Option<String>,
}

/// A device mounted on a door, joined with its type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorDevice {
    pub id: i64,
    pub model: String,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

impl fmt::Display for DoorDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (SN: {})",
            self.type_name,
            self.model,
            self.serial.as_deref().unwrap_or("-")
        )
    }
}

/// An interconnection reached through one of a door's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorInterconnection {
    pub id: i64,
    pub system_name: String,
    pub description: String,
    pub device_model: String,
}

impl fmt::Display for DoorInterconnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <- {} (on {})",
            self.system_name, self.description, self.device_model
        )
    }
}

/// Full position of a room: building, floor and room names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPath {
    pub building: String,
    pub floor: String,
    pub room: String,
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.building, self.floor, self.room)
    }
}

/// Row counts for every inventory table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCounts {
    pub buildings: i64,
    pub floors: i64,
    pub rooms: i64,
    pub doors: i64,
    pub device_types: i64,
    pub devices: i64,
    pub external_systems: i64,
    pub interconnections: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_path_display() {
        let path = LocationPath {
            building: "Edificio A".to_string(),
            floor: "Piano 1".to_string(),
            room: "Locale CED".to_string(),
        };
        assert_eq!(path.to_string(), "Edificio A > Piano 1 > Locale CED");
    }

    #[test]
    fn test_door_device_display_without_serial() {
        let device = DoorDevice {
            id: 2,
            model: "HID R10".to_string(),
            type_name: "Lettore".to_string(),
            serial: None,
        };
        assert_eq!(device.to_string(), "[Lettore] HID R10 (SN: -)");
    }
}

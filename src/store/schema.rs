pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS buildings (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    address TEXT,
    notes TEXT
);

-- Removing a building removes its floors
CREATE TABLE IF NOT EXISTS floors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,               -- "Piano 1", "PT", "Livello -1"
    building_id INTEGER NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,

    UNIQUE(name, building_id)
);

-- Removing a floor leaves its rooms in place without a floor
CREATE TABLE IF NOT EXISTS rooms (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    floor_id INTEGER REFERENCES floors(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS doors (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    room_id INTEGER REFERENCES rooms(id),
    notes TEXT
);

CREATE TABLE IF NOT EXISTS device_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY,
    model TEXT NOT NULL,
    serial TEXT UNIQUE,               -- NULL allowed for any number of devices
    description TEXT,
    install_date TEXT,                -- YYYY-MM-DD
    status TEXT DEFAULT 'Operativo',
    type_id INTEGER NOT NULL REFERENCES device_types(id),
    parent_device_id INTEGER REFERENCES devices(id),
    room_id INTEGER REFERENCES rooms(id),
    door_id INTEGER REFERENCES doors(id)
);

CREATE TABLE IF NOT EXISTS external_systems (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    system_type TEXT,
    technical_contact TEXT
);

CREATE TABLE IF NOT EXISTS interconnections (
    id INTEGER PRIMARY KEY,
    device_id INTEGER NOT NULL REFERENCES devices(id),
    system_id INTEGER NOT NULL REFERENCES external_systems(id),
    description TEXT NOT NULL,
    signal_type TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_floors_building ON floors(building_id);
CREATE INDEX IF NOT EXISTS idx_rooms_floor ON rooms(floor_id);
CREATE INDEX IF NOT EXISTS idx_doors_room ON doors(room_id);
CREATE INDEX IF NOT EXISTS idx_devices_parent ON devices(parent_device_id);
CREATE INDEX IF NOT EXISTS idx_devices_door ON devices(door_id);
CREATE INDEX IF NOT EXISTS idx_interconnections_device ON interconnections(device_id);
"#;

/// Tables in dependency order, parents first.
pub const TABLES: [&str; 8] = [
    "buildings",
    "floors",
    "rooms",
    "doors",
    "device_types",
    "devices",
    "external_systems",
    "interconnections",
];

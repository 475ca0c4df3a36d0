/// Example dataset inserted into an empty inventory: two buildings, three
/// floors, two rooms, two doors, four device types, one external system,
/// four devices and one interconnection.
pub const SEED: &str = r#"
INSERT INTO buildings (id, name, address) VALUES
    (1, 'Edificio A', 'Via Roma 1, Milano'),
    (2, 'Edificio B - Magazzino', 'Via Po 10, Milano');

INSERT INTO floors (id, name, building_id) VALUES
    (1, 'Piano 1', 1),
    (2, 'Piano Terra', 1),
    (3, 'Piano Terra', 2);

INSERT INTO rooms (id, name, description, floor_id) VALUES
    (1, 'Locale CED', 'Rack Principale Controllo Accessi', 1),
    (2, 'Reception', 'Guardia all ingresso', 2);

INSERT INTO device_types (name) VALUES
    ('Centralina'),
    ('Lettore'),
    ('Serratura'),
    ('Scatola Interfaccia');

INSERT INTO doors (id, name, room_id) VALUES
    (1, 'Ingresso Principale', 2),
    (2, 'Porta Sala Server', 1);

INSERT INTO external_systems (name, system_type) VALUES
    ('Impianto Antincendio', 'Sicurezza');

-- The controller sits in the server room; door devices hang off it
INSERT INTO devices (model, type_id, room_id) VALUES ('Axis A1001', 1, 1);
INSERT INTO devices (model, type_id, parent_device_id, door_id) VALUES ('HID R10', 2, 1, 1);
INSERT INTO devices (model, type_id, parent_device_id, door_id, description)
    VALUES ('Modulo I/O', 4, 1, 1, 'Scatola sopra porta');
INSERT INTO devices (model, type_id, parent_device_id, door_id) VALUES ('BioLite N2', 2, 1, 2);

INSERT INTO interconnections (device_id, system_id, description)
    VALUES (3, 1, 'Input Sblocco Emergenza');
"#;

pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS weapons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    weapon_type TEXT NOT NULL,
    element TEXT NOT NULL,
    slot TEXT NOT NULL,
    ammo_type TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_weapons_slot_name
    ON weapons(slot, name);

CREATE TABLE IF NOT EXISTS champions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS champion_weapon_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    champion_id INTEGER NOT NULL REFERENCES champions(id) ON DELETE CASCADE,
    weapon_type TEXT NOT NULL,
    UNIQUE(champion_id, weapon_type)
);

CREATE TABLE IF NOT EXISTS surges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    element TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS loadouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_loadouts_owner_updated
    ON loadouts(owner, updated_at DESC);

CREATE TABLE IF NOT EXISTS loadout_weapons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    loadout_id INTEGER NOT NULL REFERENCES loadouts(id) ON DELETE CASCADE,
    weapon_id INTEGER NOT NULL REFERENCES weapons(id) ON DELETE CASCADE,
    slot TEXT NOT NULL,
    UNIQUE(loadout_id, slot)
);
"#;

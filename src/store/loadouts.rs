use anyhow::Result;
use rusqlite::params;

use crate::catalog::EquipSlot;
use crate::loadout::{Loadout, LoadoutDraft, WeaponAssignment};
use crate::store::catalog::row_to_weapon;
use crate::store::{format_timestamp, now, parse_column, parse_timestamp, Store};

impl Store {
    /// Owner's loadouts with weapons resolved, most recently updated first.
    pub fn user_loadouts(&self, owner: &str) -> Result<Vec<Loadout>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT id, owner, name, description, created_at, updated_at
FROM loadouts
WHERE owner = ?1
ORDER BY updated_at DESC, id DESC
"#,
        )?;
        let mut loadouts = stmt
            .query_map(params![owner], row_to_loadout)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for loadout in &mut loadouts {
            loadout.weapons = self.assignments(loadout.id)?;
        }
        Ok(loadouts)
    }

    pub fn loadout(&self, id: i64, owner: &str) -> Result<Option<Loadout>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT id, owner, name, description, created_at, updated_at
FROM loadouts
WHERE id = ?1 AND owner = ?2
"#,
        )?;
        let mut loadout = match stmt.query_row(params![id, owner], row_to_loadout) {
            Ok(loadout) => loadout,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        loadout.weapons = self.assignments(loadout.id)?;
        Ok(Some(loadout))
    }

    pub fn create_loadout(&self, owner: &str, draft: &LoadoutDraft) -> Result<Loadout> {
        draft.validate()?;
        let at = now();
        let description = normalized_description(draft);
        self.conn.execute(
            r#"
INSERT INTO loadouts(owner, name, description, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?4)
"#,
            params![owner, draft.name.trim(), description, format_timestamp(at)],
        )?;
        Ok(Loadout {
            id: self.conn.last_insert_rowid(),
            owner: owner.to_string(),
            name: draft.name.trim().to_string(),
            description,
            created_at: at,
            updated_at: at,
            weapons: Vec::new(),
        })
    }

    /// Renames and re-describes a loadout. Returns false when it is missing or
    /// belongs to someone else.
    pub fn update_loadout(&self, id: i64, owner: &str, draft: &LoadoutDraft) -> Result<bool> {
        draft.validate()?;
        let changed = self.conn.execute(
            r#"
UPDATE loadouts
SET name = ?3, description = ?4, updated_at = ?5
WHERE id = ?1 AND owner = ?2
"#,
            params![
                id,
                owner,
                draft.name.trim(),
                normalized_description(draft),
                format_timestamp(now())
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_loadout(&self, id: i64, owner: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM loadouts WHERE id = ?1 AND owner = ?2",
            params![id, owner],
        )?;
        Ok(changed > 0)
    }

    /// Puts `weapon_id` into `slot`, replacing whatever occupied the slot.
    pub fn assign_weapon(
        &self,
        loadout_id: i64,
        weapon_id: i64,
        slot: EquipSlot,
        owner: &str,
    ) -> Result<bool> {
        if !self.owns_loadout(loadout_id, owner)? || self.weapon(weapon_id)?.is_none() {
            return Ok(false);
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM loadout_weapons WHERE loadout_id = ?1 AND slot = ?2",
            params![loadout_id, slot.as_slug()],
        )?;
        tx.execute(
            "INSERT INTO loadout_weapons(loadout_id, weapon_id, slot) VALUES (?1, ?2, ?3)",
            params![loadout_id, weapon_id, slot.as_slug()],
        )?;
        touch(&tx, loadout_id)?;
        tx.commit()?;
        Ok(true)
    }

    pub fn unassign_weapon(&self, assignment_id: i64, owner: &str) -> Result<bool> {
        let loadout_id = match self.conn.query_row(
            r#"
SELECT lw.loadout_id
FROM loadout_weapons lw
JOIN loadouts l ON l.id = lw.loadout_id
WHERE lw.id = ?1 AND l.owner = ?2
"#,
            params![assignment_id, owner],
            |row| row.get::<_, i64>(0),
        ) {
            Ok(id) => id,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM loadout_weapons WHERE id = ?1",
            params![assignment_id],
        )?;
        touch(&tx, loadout_id)?;
        tx.commit()?;
        Ok(true)
    }

    fn owns_loadout(&self, loadout_id: i64, owner: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM loadouts WHERE id = ?1 AND owner = ?2",
            params![loadout_id, owner],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn assignments(&self, loadout_id: i64) -> Result<Vec<WeaponAssignment>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT lw.id, lw.slot, lw.weapon_id,
       w.id, w.name, w.weapon_type, w.element, w.slot, w.ammo_type
FROM loadout_weapons lw
LEFT JOIN weapons w ON w.id = lw.weapon_id
WHERE lw.loadout_id = ?1
ORDER BY lw.id
"#,
        )?;
        let mut assignments = stmt
            .query_map(params![loadout_id], |row| {
                let resolved: Option<i64> = row.get(3)?;
                let weapon = match resolved {
                    Some(_) => Some(row_to_weapon(row, 3)?),
                    None => None,
                };
                Ok(WeaponAssignment {
                    id: row.get(0)?,
                    slot: parse_column(row, 1)?,
                    weapon_id: row.get(2)?,
                    weapon,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        assignments.sort_by_key(|a| a.slot);
        Ok(assignments)
    }
}

fn touch(conn: &rusqlite::Connection, loadout_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE loadouts SET updated_at = ?2 WHERE id = ?1",
        params![loadout_id, format_timestamp(now())],
    )
}

fn normalized_description(draft: &LoadoutDraft) -> Option<String> {
    draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn row_to_loadout(row: &rusqlite::Row<'_>) -> rusqlite::Result<Loadout> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(Loadout {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
        weapons: Vec::new(),
    })
}

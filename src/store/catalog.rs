use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use rusqlite::params;
use serde::Serialize;
use tracing::info;

use crate::catalog::seed::{default_weapons, DEFAULT_CHAMPIONS, DEFAULT_SURGES};
use crate::catalog::{Champion, Surge, Weapon, WeaponDraft, WeaponFilter, WeaponType};
use crate::store::{parse_column, Store};

const WEAPON_COLUMNS: &str = "id, name, weapon_type, element, slot, ammo_type";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub weapons: usize,
    pub champions: usize,
    pub surges: usize,
}

impl Store {
    pub fn list_weapons(&self, filter: &WeaponFilter) -> Result<Vec<Weapon>> {
        let sql = format!(
            r#"
SELECT {WEAPON_COLUMNS}
FROM weapons
WHERE (?1 IS NULL OR slot = ?1)
  AND (?2 IS NULL OR element = ?2)
  AND (?3 IS NULL OR weapon_type = ?3)
ORDER BY name COLLATE NOCASE, id
"#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    filter.slot.map(|s| s.as_slug()),
                    filter.element.map(|e| e.as_slug()),
                    filter.weapon_type.map(|t| t.as_slug()),
                ],
                |row| row_to_weapon(row, 0),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn weapon(&self, id: i64) -> Result<Option<Weapon>> {
        let sql = format!("SELECT {WEAPON_COLUMNS} FROM weapons WHERE id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        match stmt.query_row(params![id], |row| row_to_weapon(row, 0)) {
            Ok(weapon) => Ok(Some(weapon)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn create_weapon(&self, draft: &WeaponDraft) -> Result<Weapon> {
        draft.validate()?;
        self.conn.execute(
            r#"
INSERT INTO weapons(name, weapon_type, element, slot, ammo_type)
VALUES (?1, ?2, ?3, ?4, ?5)
"#,
            params![
                draft.name.trim(),
                draft.weapon_type.as_slug(),
                draft.element.as_slug(),
                draft.slot.as_slug(),
                draft.ammo_type.as_slug()
            ],
        )?;
        Ok(Weapon {
            id: self.conn.last_insert_rowid(),
            name: draft.name.trim().to_string(),
            weapon_type: draft.weapon_type,
            element: draft.element,
            slot: draft.slot,
            ammo_type: draft.ammo_type,
        })
    }

    pub fn update_weapon(&self, id: i64, draft: &WeaponDraft) -> Result<bool> {
        draft.validate()?;
        let changed = self.conn.execute(
            r#"
UPDATE weapons
SET name = ?2, weapon_type = ?3, element = ?4, slot = ?5, ammo_type = ?6
WHERE id = ?1
"#,
            params![
                id,
                draft.name.trim(),
                draft.weapon_type.as_slug(),
                draft.element.as_slug(),
                draft.slot.as_slug(),
                draft.ammo_type.as_slug()
            ],
        )?;
        Ok(changed > 0)
    }

    /// Removes the weapon and every loadout assignment pointing at it.
    pub fn delete_weapon(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM weapons WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn list_champions(&self) -> Result<Vec<Champion>> {
        let mut types_by_champion: BTreeMap<i64, BTreeSet<WeaponType>> = BTreeMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT champion_id, weapon_type FROM champion_weapon_types")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, parse_column::<WeaponType>(row, 1)?))
            })?;
            for row in rows {
                let (champion_id, weapon_type) = row?;
                types_by_champion
                    .entry(champion_id)
                    .or_default()
                    .insert(weapon_type);
            }
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM champions ORDER BY id")?;
        let champions = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                Ok(Champion {
                    id,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    effective_types: types_by_champion.remove(&id).unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(champions)
    }

    /// Known champions among `ids`, in id order. Unknown ids are skipped.
    pub fn champions_by_ids(&self, ids: &[i64]) -> Result<Vec<Champion>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(self
            .list_champions()?
            .into_iter()
            .filter(|c| wanted.contains(&c.id))
            .collect())
    }

    pub fn insert_champion(
        &self,
        name: &str,
        description: Option<&str>,
        effective_types: &[WeaponType],
    ) -> Result<Champion> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO champions(name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        let id = tx.last_insert_rowid();
        for weapon_type in effective_types {
            tx.execute(
                r#"
INSERT OR IGNORE INTO champion_weapon_types(champion_id, weapon_type)
VALUES (?1, ?2)
"#,
                params![id, weapon_type.as_slug()],
            )?;
        }
        tx.commit()?;
        Ok(Champion {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            effective_types: effective_types.iter().copied().collect(),
        })
    }

    pub fn list_surges(&self) -> Result<Vec<Surge>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, element FROM surges ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_surge)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn surge_by_name(&self, name: &str) -> Result<Option<Surge>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, element FROM surges WHERE name = ?1 COLLATE NOCASE LIMIT 1",
        )?;
        match stmt.query_row(params![name.trim()], row_to_surge) {
            Ok(surge) => Ok(Some(surge)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Seeds the built-in reference data. Each table is filled only while empty.
    pub fn seed_reference_data(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if self.count("weapons")? == 0 {
            for draft in default_weapons() {
                self.create_weapon(&draft)?;
                report.weapons += 1;
            }
        }

        if self.count("champions")? == 0 {
            for seed in &DEFAULT_CHAMPIONS {
                self.insert_champion(seed.name, Some(seed.description), seed.effective_types)?;
                report.champions += 1;
            }
        }

        if self.count("surges")? == 0 {
            for seed in &DEFAULT_SURGES {
                self.conn.execute(
                    "INSERT INTO surges(name, element) VALUES (?1, ?2)",
                    params![seed.name, seed.element.as_slug()],
                )?;
                report.surges += 1;
            }
        }

        info!(
            weapons = report.weapons,
            champions = report.champions,
            surges = report.surges,
            "reference data seeded"
        );
        Ok(report)
    }

    fn count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }
}

/// Reads a weapon from six consecutive columns starting at `offset`.
pub(crate) fn row_to_weapon(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Weapon> {
    Ok(Weapon {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        weapon_type: parse_column(row, offset + 2)?,
        element: parse_column(row, offset + 3)?,
        slot: parse_column(row, offset + 4)?,
        ammo_type: parse_column(row, offset + 5)?,
    })
}

fn row_to_surge(row: &rusqlite::Row<'_>) -> rusqlite::Result<Surge> {
    Ok(Surge {
        id: row.get(0)?,
        name: row.get(1)?,
        element: parse_column(row, 2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::SeedReport;
    use crate::catalog::{AmmoType, Element, EquipSlot, WeaponDraft, WeaponFilter, WeaponType};
    use crate::store::Store;

    fn seeded() -> Store {
        let store = Store::open_in_memory().expect("in-memory store");
        store.seed_reference_data().expect("seed");
        store
    }

    #[test]
    fn seeding_is_idempotent() {
        let store = Store::open_in_memory().expect("in-memory store");
        let first = store.seed_reference_data().expect("first seed");
        assert_eq!(first.weapons, 33);
        assert_eq!(first.champions, 3);
        assert_eq!(first.surges, 4);

        let second = store.seed_reference_data().expect("second seed");
        assert_eq!(second, SeedReport::default());
        assert_eq!(
            store
                .list_weapons(&WeaponFilter::default())
                .expect("weapons")
                .len(),
            33
        );
    }

    #[test]
    fn weapons_are_sorted_and_filterable() {
        let store = seeded();
        let all = store.list_weapons(&WeaponFilter::default()).expect("weapons");
        let names = all.iter().map(|w| w.name.to_lowercase()).collect::<Vec<_>>();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let heavy_void = store
            .list_weapons(&WeaponFilter {
                slot: Some(EquipSlot::Heavy),
                element: Some(Element::Void),
                weapon_type: None,
            })
            .expect("filtered weapons");
        let names = heavy_void.iter().map(|w| w.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Tractor Cannon", "Wardcliff Coil"]);

        let fusions = store
            .list_weapons(&WeaponFilter {
                weapon_type: Some(WeaponType::FusionRifle),
                ..WeaponFilter::default()
            })
            .expect("fusion rifles");
        assert_eq!(fusions.len(), 3);
    }

    #[test]
    fn weapon_crud_round_trip() {
        let store = Store::open_in_memory().expect("in-memory store");
        let draft = WeaponDraft {
            name: "Witherhoard".to_string(),
            weapon_type: WeaponType::GrenadeLauncher,
            element: Element::Kinetic,
            slot: EquipSlot::Primary,
            ammo_type: AmmoType::Special,
        };
        let created = store.create_weapon(&draft).expect("create");
        assert_eq!(store.weapon(created.id).expect("get"), Some(created.clone()));

        let renamed = WeaponDraft {
            name: "Witherhoard (Adept)".to_string(),
            ..draft
        };
        assert!(store.update_weapon(created.id, &renamed).expect("update"));
        assert_eq!(
            store.weapon(created.id).expect("get").map(|w| w.name),
            Some("Witherhoard (Adept)".to_string())
        );
        assert!(!store.update_weapon(9_999, &renamed).expect("update missing"));

        assert!(store.delete_weapon(created.id).expect("delete"));
        assert!(store.weapon(created.id).expect("get").is_none());
        assert!(!store.delete_weapon(created.id).expect("delete twice"));
    }

    #[test]
    fn invalid_weapon_draft_is_rejected() {
        let store = Store::open_in_memory().expect("in-memory store");
        let draft = WeaponDraft {
            name: " ".to_string(),
            weapon_type: WeaponType::Bow,
            element: Element::Void,
            slot: EquipSlot::Special,
            ammo_type: AmmoType::Special,
        };
        assert!(store.create_weapon(&draft).is_err());
    }

    #[test]
    fn champions_resolve_effective_types_and_skip_unknown_ids() {
        let store = seeded();
        let champions = store.list_champions().expect("champions");
        assert_eq!(champions.len(), 3);
        let overload = champions
            .iter()
            .find(|c| c.name == "Overload")
            .expect("overload seeded");
        assert!(overload.effective_types.contains(&WeaponType::SubmachineGun));
        assert_eq!(overload.effective_types.len(), 3);

        let picked = store
            .champions_by_ids(&[overload.id, 4242])
            .expect("by ids");
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Overload");
        assert!(store.champions_by_ids(&[]).expect("empty").is_empty());
    }

    #[test]
    fn surges_are_looked_up_by_name() {
        let store = seeded();
        assert_eq!(store.list_surges().expect("surges").len(), 4);
        let surge = store
            .surge_by_name("solar surge")
            .expect("lookup")
            .expect("solar surge seeded");
        assert_eq!(surge.element, Element::Solar);
        assert!(store.surge_by_name("Stasis Surge").expect("lookup").is_none());
    }
}

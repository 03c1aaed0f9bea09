use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{EquipSlot, Weapon};

pub const MAX_LOADOUT_NAME_LEN: usize = 100;
pub const MAX_LOADOUT_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loadout {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub weapons: Vec<WeaponAssignment>,
}

impl Loadout {
    pub fn weapon_in(&self, slot: EquipSlot) -> Option<&Weapon> {
        self.weapons
            .iter()
            .find(|a| a.slot == slot)
            .and_then(|a| a.weapon.as_ref())
    }

    /// Assigned weapons whose catalog record could be resolved.
    pub fn resolved_weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter().filter_map(|a| a.weapon.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeaponAssignment {
    pub id: i64,
    pub slot: EquipSlot,
    pub weapon_id: i64,
    pub weapon: Option<Weapon>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadoutDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl LoadoutDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, true, MAX_LOADOUT_NAME_LEN)?;
        if let Some(description) = &self.description {
            check_text(
                "description",
                description,
                false,
                MAX_LOADOUT_DESCRIPTION_LEN,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

pub(crate) fn check_text(
    field: &'static str,
    value: &str,
    required: bool,
    max: usize,
) -> Result<(), ValidationError> {
    if required && value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_a_name() {
        let err = LoadoutDraft::new("   ").validate().expect_err("blank name");
        assert_eq!(err, ValidationError::Required("name"));
    }

    #[test]
    fn draft_enforces_length_limits() {
        assert!(LoadoutDraft::new("a".repeat(100)).validate().is_ok());
        let err = LoadoutDraft::new("a".repeat(101))
            .validate()
            .expect_err("name too long");
        assert_eq!(err.to_string(), "name must be at most 100 characters");

        let err = LoadoutDraft::new("Raid")
            .with_description("d".repeat(501))
            .validate()
            .expect_err("description too long");
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "description",
                max: 500
            }
        );
    }
}

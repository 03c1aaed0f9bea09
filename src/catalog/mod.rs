pub mod seed;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Arc,
    Void,
    Solar,
    Kinetic,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Arc, Element::Void, Element::Solar, Element::Kinetic];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Arc => "arc",
            Self::Void => "void",
            Self::Solar => "solar",
            Self::Kinetic => "kinetic",
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Arc => "Arc",
            Self::Void => "Void",
            Self::Solar => "Solar",
            Self::Kinetic => "Kinetic",
        };
        write!(f, "{display}")
    }
}

impl FromStr for Element {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "arc" => Ok(Self::Arc),
            "void" => Ok(Self::Void),
            "solar" => Ok(Self::Solar),
            "kinetic" => Ok(Self::Kinetic),
            _ => Err(ParseEnumError::new("element", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Primary,
    Special,
    Heavy,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 3] = [EquipSlot::Primary, EquipSlot::Special, EquipSlot::Heavy];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Special => "special",
            Self::Heavy => "heavy",
        }
    }
}

impl Display for EquipSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Primary => "Primary",
            Self::Special => "Special",
            Self::Heavy => "Heavy",
        };
        write!(f, "{display}")
    }
}

impl FromStr for EquipSlot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "primary" | "kinetic_slot" => Ok(Self::Primary),
            "special" | "energy" => Ok(Self::Special),
            "heavy" | "power" => Ok(Self::Heavy),
            _ => Err(ParseEnumError::new("equip slot", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AmmoType {
    Primary,
    Special,
    Heavy,
}

impl AmmoType {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Special => "special",
            Self::Heavy => "heavy",
        }
    }
}

impl Display for AmmoType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Primary => "Primary",
            Self::Special => "Special",
            Self::Heavy => "Heavy",
        };
        write!(f, "{display}")
    }
}

impl FromStr for AmmoType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "primary" => Ok(Self::Primary),
            "special" => Ok(Self::Special),
            "heavy" => Ok(Self::Heavy),
            _ => Err(ParseEnumError::new("ammo type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    PulseRifle,
    ScoutRifle,
    SniperRifle,
    AutoRifle,
    SubmachineGun,
    MachineGun,
    FusionRifle,
    RocketLauncher,
    GrenadeLauncher,
    HandCannon,
    Shotgun,
    LinearFusionRifle,
    Bow,
    Sword,
}

impl WeaponType {
    pub const ALL: [WeaponType; 14] = [
        WeaponType::PulseRifle,
        WeaponType::ScoutRifle,
        WeaponType::SniperRifle,
        WeaponType::AutoRifle,
        WeaponType::SubmachineGun,
        WeaponType::MachineGun,
        WeaponType::FusionRifle,
        WeaponType::RocketLauncher,
        WeaponType::GrenadeLauncher,
        WeaponType::HandCannon,
        WeaponType::Shotgun,
        WeaponType::LinearFusionRifle,
        WeaponType::Bow,
        WeaponType::Sword,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::PulseRifle => "pulse_rifle",
            Self::ScoutRifle => "scout_rifle",
            Self::SniperRifle => "sniper_rifle",
            Self::AutoRifle => "auto_rifle",
            Self::SubmachineGun => "submachine_gun",
            Self::MachineGun => "machine_gun",
            Self::FusionRifle => "fusion_rifle",
            Self::RocketLauncher => "rocket_launcher",
            Self::GrenadeLauncher => "grenade_launcher",
            Self::HandCannon => "hand_cannon",
            Self::Shotgun => "shotgun",
            Self::LinearFusionRifle => "linear_fusion_rifle",
            Self::Bow => "bow",
            Self::Sword => "sword",
        }
    }
}

impl Display for WeaponType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::PulseRifle => "Pulse Rifle",
            Self::ScoutRifle => "Scout Rifle",
            Self::SniperRifle => "Sniper Rifle",
            Self::AutoRifle => "Auto Rifle",
            Self::SubmachineGun => "Submachine Gun",
            Self::MachineGun => "Machine Gun",
            Self::FusionRifle => "Fusion Rifle",
            Self::RocketLauncher => "Rocket Launcher",
            Self::GrenadeLauncher => "Grenade Launcher",
            Self::HandCannon => "Hand Cannon",
            Self::Shotgun => "Shotgun",
            Self::LinearFusionRifle => "Linear Fusion Rifle",
            Self::Bow => "Bow",
            Self::Sword => "Sword",
        };
        write!(f, "{display}")
    }
}

impl FromStr for WeaponType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        let compact = normalized.replace('_', "");
        if let Some(found) = WeaponType::ALL
            .into_iter()
            .find(|t| t.as_slug().replace('_', "") == compact)
        {
            return Ok(found);
        }
        match compact.as_str() {
            "smg" | "submachine" => Ok(Self::SubmachineGun),
            "lmg" | "mg" => Ok(Self::MachineGun),
            "lfr" | "linearfusion" => Ok(Self::LinearFusionRifle),
            "gl" | "grenade" => Ok(Self::GrenadeLauncher),
            "hc" => Ok(Self::HandCannon),
            _ => Err(ParseEnumError::new("weapon type", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weapon {
    pub id: i64,
    pub name: String,
    pub weapon_type: WeaponType,
    pub element: Element,
    pub slot: EquipSlot,
    pub ammo_type: AmmoType,
}

/// Champion archetype and the weapon types that can stun it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Champion {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub effective_types: BTreeSet<WeaponType>,
}

impl Champion {
    pub fn is_countered_by(&self, weapon: &Weapon) -> bool {
        self.effective_types.contains(&weapon.weapon_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Surge {
    pub id: i64,
    pub name: String,
    pub element: Element,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponFilter {
    pub slot: Option<EquipSlot>,
    pub element: Option<Element>,
    pub weapon_type: Option<WeaponType>,
}

impl WeaponFilter {
    pub fn matches(&self, weapon: &Weapon) -> bool {
        self.slot.map_or(true, |slot| weapon.slot == slot)
            && self.element.map_or(true, |element| weapon.element == element)
            && self
                .weapon_type
                .map_or(true, |weapon_type| weapon.weapon_type == weapon_type)
    }
}

pub const MAX_WEAPON_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDraft {
    pub name: String,
    pub weapon_type: WeaponType,
    pub element: Element,
    pub slot: EquipSlot,
    pub ammo_type: AmmoType,
}

impl WeaponDraft {
    pub fn validate(&self) -> Result<(), crate::loadout::ValidationError> {
        crate::loadout::check_text("name", &self.name, true, MAX_WEAPON_NAME_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("SOLAR".parse::<Element>(), Ok(Element::Solar));
        assert_eq!(" heavy ".parse::<EquipSlot>(), Ok(EquipSlot::Heavy));
        assert_eq!("Scout Rifle".parse::<WeaponType>(), Ok(WeaponType::ScoutRifle));
        assert_eq!("scout-rifle".parse::<WeaponType>(), Ok(WeaponType::ScoutRifle));
        assert_eq!("ScoutRifle".parse::<WeaponType>(), Ok(WeaponType::ScoutRifle));
        assert_eq!("smg".parse::<WeaponType>(), Ok(WeaponType::SubmachineGun));
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "plasma".parse::<Element>().expect_err("plasma is not an element");
        assert_eq!(err.to_string(), "unknown element: plasma");
        assert!("".parse::<WeaponType>().is_err());
    }

    #[test]
    fn slugs_round_trip_through_from_str() {
        for t in WeaponType::ALL {
            assert_eq!(t.as_slug().parse::<WeaponType>(), Ok(t));
        }
        for e in Element::ALL {
            assert_eq!(e.as_slug().parse::<Element>(), Ok(e));
        }
    }

    #[test]
    fn filter_combines_criteria() {
        let weapon = Weapon {
            id: 1,
            name: "Riskrunner".to_string(),
            weapon_type: WeaponType::SubmachineGun,
            element: Element::Arc,
            slot: EquipSlot::Primary,
            ammo_type: AmmoType::Primary,
        };
        assert!(WeaponFilter::default().matches(&weapon));
        let filter = WeaponFilter {
            slot: Some(EquipSlot::Primary),
            element: Some(Element::Arc),
            weapon_type: None,
        };
        assert!(filter.matches(&weapon));
        let filter = WeaponFilter {
            element: Some(Element::Void),
            ..WeaponFilter::default()
        };
        assert!(!filter.matches(&weapon));
    }
}

//! Built-in reference data: weapons, champion archetypes and surges.

use crate::catalog::{AmmoType, Element, EquipSlot, WeaponDraft, WeaponType};

pub struct ChampionSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub effective_types: &'static [WeaponType],
}

pub struct SurgeSeed {
    pub name: &'static str,
    pub element: Element,
}

fn weapon(
    name: &str,
    weapon_type: WeaponType,
    element: Element,
    slot: EquipSlot,
) -> WeaponDraft {
    // Seeded weapons always draw the ammo matching their slot.
    let ammo_type = match slot {
        EquipSlot::Primary => AmmoType::Primary,
        EquipSlot::Special => AmmoType::Special,
        EquipSlot::Heavy => AmmoType::Heavy,
    };
    WeaponDraft {
        name: name.to_string(),
        weapon_type,
        element,
        slot,
        ammo_type,
    }
}

pub fn default_weapons() -> Vec<WeaponDraft> {
    use Element::*;
    use EquipSlot::*;
    use WeaponType::*;

    vec![
        // long range
        weapon("Hung Jury", ScoutRifle, Solar, Primary),
        weapon("Polaris Lance", ScoutRifle, Solar, Primary),
        weapon("Nameless Midnight", ScoutRifle, Arc, Primary),
        weapon("Twilight Oath", SniperRifle, Void, Special),
        weapon("Supremacy", SniperRifle, Arc, Special),
        weapon("Frozen Orbit", SniperRifle, Void, Special),
        weapon("Sleeper Simulant", LinearFusionRifle, Solar, Heavy),
        weapon("Arbalest", LinearFusionRifle, Kinetic, Special),
        weapon("Vigilance Wing", PulseRifle, Kinetic, Primary),
        weapon("Outbreak Perfected", PulseRifle, Kinetic, Primary),
        // continuous fire
        weapon("Suros Regime", AutoRifle, Solar, Primary),
        weapon("Hard Light", AutoRifle, Kinetic, Primary),
        weapon("Monte Carlo", AutoRifle, Arc, Primary),
        weapon("Huckleberry", SubmachineGun, Kinetic, Primary),
        weapon("Riskrunner", SubmachineGun, Arc, Primary),
        weapon("The Hive", SubmachineGun, Void, Primary),
        weapon("Thunderlord", MachineGun, Arc, Heavy),
        weapon("Tyrant's Surge", MachineGun, Solar, Heavy),
        // burst
        weapon("Telesto", FusionRifle, Void, Special),
        weapon("Merciless", FusionRifle, Arc, Special),
        weapon("Jotunn", FusionRifle, Solar, Special),
        weapon("Gjallarhorn", RocketLauncher, Solar, Heavy),
        weapon("Wardcliff Coil", RocketLauncher, Void, Heavy),
        weapon("Tractor Cannon", RocketLauncher, Void, Heavy),
        weapon("The Jade Rabbit", ScoutRifle, Solar, Primary),
        weapon("Ace of Spades", HandCannon, Solar, Primary),
        weapon("Malfeasance", HandCannon, Void, Primary),
        weapon("Legend of Acrius", Shotgun, Arc, Heavy),
        weapon("Duality", Shotgun, Kinetic, Special),
        weapon("Thorn", HandCannon, Solar, Primary),
        weapon("The Last Word", HandCannon, Solar, Primary),
        weapon("Rat King", SubmachineGun, Kinetic, Primary),
        weapon("Skyburner's Oath", ScoutRifle, Solar, Primary),
    ]
}

pub const DEFAULT_CHAMPIONS: [ChampionSeed; 3] = [
    ChampionSeed {
        name: "Anti-Barrier",
        description: "A barrier-creating champion. Use long-range weapons.",
        effective_types: &[
            WeaponType::SniperRifle,
            WeaponType::ScoutRifle,
            WeaponType::PulseRifle,
            WeaponType::LinearFusionRifle,
        ],
    },
    ChampionSeed {
        name: "Overload",
        description:
            "A champion that gains extra health at certain points. Use automatic weapons.",
        effective_types: &[
            WeaponType::AutoRifle,
            WeaponType::SubmachineGun,
            WeaponType::MachineGun,
        ],
    },
    ChampionSeed {
        name: "Unstoppable",
        description: "A powerful champion. Use burst-damage weapons.",
        effective_types: &[
            WeaponType::FusionRifle,
            WeaponType::RocketLauncher,
            WeaponType::GrenadeLauncher,
        ],
    },
];

pub const DEFAULT_SURGES: [SurgeSeed; 4] = [
    SurgeSeed {
        name: "Arc Surge",
        element: Element::Arc,
    },
    SurgeSeed {
        name: "Void Surge",
        element: Element::Void,
    },
    SurgeSeed {
        name: "Solar Surge",
        element: Element::Solar,
    },
    SurgeSeed {
        name: "Kinetic Surge",
        element: Element::Kinetic,
    },
];

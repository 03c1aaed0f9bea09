use anyhow::Result;

use crate::catalog::Weapon;
use crate::recommend::Recommendation;

pub fn weapons_to_csv(weapons: &[Weapon]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "name", "weapon_type", "element", "slot", "ammo_type"])?;
    for weapon in weapons {
        writer.write_record([
            weapon.id.to_string(),
            weapon.name.clone(),
            weapon.weapon_type.as_slug().to_string(),
            weapon.element.as_slug().to_string(),
            weapon.slot.as_slug().to_string(),
            weapon.ammo_type.as_slug().to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn recommendations_to_csv(recommendations: &[Recommendation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "loadout_id",
        "loadout",
        "score",
        "surge_score",
        "champion_score",
        "reasons",
    ])?;
    for (idx, rec) in recommendations.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            rec.loadout.id.to_string(),
            rec.loadout.name.clone(),
            rec.score.to_string(),
            rec.surge_score.to_string(),
            rec.champion_score.to_string(),
            rec.reasons.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::weapons_to_csv;
    use crate::catalog::{AmmoType, Element, EquipSlot, Weapon, WeaponType};

    #[test]
    fn quotes_names_with_commas() {
        let weapons = vec![Weapon {
            id: 7,
            name: "Hush, Little One".to_string(),
            weapon_type: WeaponType::Bow,
            element: Element::Solar,
            slot: EquipSlot::Special,
            ammo_type: AmmoType::Primary,
        }];
        let rendered = weapons_to_csv(&weapons).expect("csv");
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,weapon_type,element,slot,ammo_type")
        );
        assert_eq!(
            lines.next(),
            Some("7,\"Hush, Little One\",bow,solar,special,primary")
        );
    }
}

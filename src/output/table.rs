use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::catalog::{Champion, EquipSlot, Surge, Weapon};
use crate::loadout::Loadout;
use crate::recommend::Recommendation;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_weapons_table(weapons: &[Weapon]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Type", "Element", "Slot", "Ammo"]);
    for w in weapons {
        table.add_row(vec![
            w.id.to_string(),
            w.name.clone(),
            w.weapon_type.to_string(),
            w.element.to_string(),
            w.slot.to_string(),
            w.ammo_type.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_champions_table(champions: &[Champion]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Champion", "Countered by", "Description"]);
    for c in champions {
        let types = c
            .effective_types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            c.id.to_string(),
            c.name.clone(),
            types,
            c.description.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn render_surges_table(surges: &[Surge]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Surge", "Element"]);
    for s in surges {
        table.add_row(vec![s.id.to_string(), s.name.clone(), s.element.to_string()]);
    }
    table.to_string()
}

fn slot_label(loadout: &Loadout, slot: EquipSlot) -> String {
    match loadout.weapons.iter().find(|a| a.slot == slot) {
        Some(assignment) => match &assignment.weapon {
            Some(w) => format!("{} ({})", w.name, w.element),
            None => format!("missing weapon #{}", assignment.weapon_id),
        },
        None => "-".to_string(),
    }
}

pub fn render_loadouts_table(loadouts: &[Loadout]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "ID", "Name", "Primary", "Special", "Heavy", "Updated",
    ]);
    for l in loadouts {
        table.add_row(vec![
            l.id.to_string(),
            l.name.clone(),
            slot_label(l, EquipSlot::Primary),
            slot_label(l, EquipSlot::Special),
            slot_label(l, EquipSlot::Heavy),
            l.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_loadout_detail(loadout: &Loadout) -> String {
    let mut table = new_table();
    table.set_header(vec!["Assignment", "Slot", "Weapon", "Type", "Element"]);
    for a in &loadout.weapons {
        let (name, weapon_type, element) = match &a.weapon {
            Some(w) => (
                w.name.clone(),
                w.weapon_type.to_string(),
                w.element.to_string(),
            ),
            None => (format!("#{} (missing)", a.weapon_id), "-".into(), "-".into()),
        };
        table.add_row(vec![
            a.id.to_string(),
            a.slot.to_string(),
            name,
            weapon_type,
            element,
        ]);
    }

    let mut out = format!("{} (#{})\n", loadout.name, loadout.id);
    if let Some(description) = &loadout.description {
        out.push_str(description);
        out.push('\n');
    }
    out.push_str(&table.to_string());
    out
}

pub fn render_recommendations_table(recommendations: &[Recommendation]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Rank", "Loadout", "Score", "Surge", "Champions", "Why"]);
    for (idx, rec) in recommendations.iter().enumerate() {
        let color = match rec.score {
            70.. => Color::Green,
            35..=69 => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(&rec.loadout.name),
            Cell::new(rec.score.to_string()).fg(color),
            Cell::new(format!("{}/30", rec.surge_score)),
            Cell::new(format!("{}/70", rec.champion_score)),
            Cell::new(rec.reasons.join("\n")),
        ]));
    }
    table.to_string()
}

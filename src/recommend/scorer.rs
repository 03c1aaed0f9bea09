use crate::catalog::{Champion, Element};
use crate::loadout::Loadout;
use crate::recommend::Recommendation;

pub const SURGE_WEIGHT: u32 = 30;
pub const CHAMPION_WEIGHT: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentScore {
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Scores every loadout and returns them best first.
///
/// Every input loadout yields exactly one recommendation, including loadouts
/// that score zero. Equal scores keep their input order.
pub fn score_loadouts(
    loadouts: &[Loadout],
    champions: &[Champion],
    active_element: Element,
) -> Vec<Recommendation> {
    let mut recommendations = loadouts
        .iter()
        .map(|loadout| score_loadout(loadout, champions, active_element))
        .collect::<Vec<_>>();
    // sort_by is stable
    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations
}

pub fn score_loadout(
    loadout: &Loadout,
    champions: &[Champion],
    active_element: Element,
) -> Recommendation {
    let surge = surge_coverage(loadout, active_element);
    let champion = champion_coverage(loadout, champions);

    let mut reasons = Vec::with_capacity(surge.reasons.len() + champion.reasons.len());
    reasons.extend(surge.reasons);
    reasons.extend(champion.reasons);

    Recommendation {
        loadout: loadout.clone(),
        score: surge.score + champion.score,
        surge_score: surge.score,
        champion_score: champion.score,
        reasons,
    }
}

pub fn surge_coverage(loadout: &Loadout, active_element: Element) -> ComponentScore {
    let total = loadout.weapons.len();
    let matched = loadout
        .resolved_weapons()
        .filter(|weapon| weapon.element == active_element)
        .count();

    let reason = if matched > 0 {
        format!("{matched}/{total} weapons match active surge ({active_element})")
    } else {
        format!("No weapons match active surge ({active_element})")
    };

    ComponentScore {
        score: weighted_round(matched, total, SURGE_WEIGHT),
        reasons: vec![reason],
    }
}

pub fn champion_coverage(loadout: &Loadout, champions: &[Champion]) -> ComponentScore {
    let mut reasons = Vec::with_capacity(champions.len() + 1);
    let mut covered = 0usize;

    for champion in champions {
        let suitable = loadout
            .resolved_weapons()
            .filter(|weapon| champion.is_countered_by(weapon))
            .count();
        if suitable > 0 {
            covered += 1;
            reasons.push(format!("✓ {}: {suitable} suitable weapon(s)", champion.name));
        } else {
            reasons.push(format!("✗ {}: No suitable weapons", champion.name));
        }
    }

    if !champions.is_empty() {
        reasons.push(format!(
            "Covers {covered} / {} champion types selected",
            champions.len()
        ));
    }

    ComponentScore {
        score: weighted_round(covered, champions.len(), CHAMPION_WEIGHT),
        reasons,
    }
}

/// `round(part / whole * weight)` with halves rounded away from zero.
///
/// Integer arithmetic keeps boundary ratios such as 1/4 exact. A zero `whole`
/// scores zero.
pub fn weighted_round(part: usize, whole: usize, weight: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    let weight = u64::from(weight);
    ((2 * part * weight + whole) / (2 * whole)) as u32
}

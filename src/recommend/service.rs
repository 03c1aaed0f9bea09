use tracing::debug;

use crate::recommend::scorer::score_loadouts;
use crate::recommend::{RecommendError, Recommendation, RecommendationRequest};
use crate::store::Store;

/// Resolves the request against the catalog and ranks the owner's loadouts.
///
/// An unknown surge name is rejected; unknown champion ids are dropped.
pub fn recommend(
    store: &Store,
    owner: &str,
    request: &RecommendationRequest,
) -> Result<Vec<Recommendation>, RecommendError> {
    let surge = store
        .surge_by_name(&request.surge)?
        .ok_or_else(|| RecommendError::UnknownSurge(request.surge.clone()))?;
    let champions = store.champions_by_ids(&request.champion_ids)?;
    if champions.len() < request.champion_ids.len() {
        debug!(
            requested = request.champion_ids.len(),
            resolved = champions.len(),
            "ignoring unknown champion ids"
        );
    }
    let loadouts = store.user_loadouts(owner)?;

    let recommendations = score_loadouts(&loadouts, &champions, surge.element);
    debug!(
        owner,
        surge = %surge.name,
        champions = champions.len(),
        loadouts = loadouts.len(),
        best_score = recommendations.first().map(|r| r.score),
        "scored loadouts"
    );
    Ok(recommendations)
}

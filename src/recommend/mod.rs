pub mod scorer;
pub mod service;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loadout::Loadout;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Surge name as stored in the catalog, e.g. "Solar Surge".
    pub surge: String,
    #[serde(default)]
    pub champion_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub loadout: Loadout,
    pub score: u32,
    pub surge_score: u32,
    pub champion_score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid surge selected: {0}")]
    UnknownSurge(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

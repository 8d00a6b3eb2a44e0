use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::Result;
use crate::global::Global;
use crate::listing::{self, DifficultyFilter, DifficultyStats, RatedOpportunity};

#[derive(Debug, Default, serde::Deserialize)]
pub struct ListingQuery {
    pub difficulty: Option<DifficultyFilter>,
}

pub async fn list_opportunities(
    State(global): State<Arc<Global>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<RatedOpportunity>>> {
    Ok(Json(listing::list(&global, query.difficulty).await?))
}

pub async fn difficulty_stats(
    State(global): State<Arc<Global>>,
) -> Result<Json<DifficultyStats>> {
    let rated = listing::list(&global, None).await?;

    Ok(Json(listing::stats(&rated)))
}

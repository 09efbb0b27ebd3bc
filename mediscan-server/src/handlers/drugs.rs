use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use drug_lookup_service::DrugRecord;
use serde::{Deserialize, Serialize};

/// Results are capped the way the original endpoint capped them.
const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub drugs: Vec<DrugRecord>,
}

/// `GET /drugs/search?q=`
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter required"))?;

    let drugs = state
        .store
        .search(&q, SEARCH_LIMIT)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(SearchResponse { drugs }))
}

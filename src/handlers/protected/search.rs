use axum::extract::{Query, State};
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Crush;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Case-sensitive substring of `name`
    pub q: Option<String>,
}

/// GET /crush/search?q= - records whose name contains `q`, or all when `q` is empty
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Crush>> {
    let collection = state.store.load().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load crush collection: {}", e);
        Vec::new()
    });

    let matches = match query.q.as_deref() {
        None | Some("") => collection,
        Some(term) => collection
            .into_iter()
            .filter(|crush| crush.name.contains(term))
            .collect(),
    };

    Ok(ApiResponse::success(matches))
}

use axum::extract::{Path, State};
use tracing::error;

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Crush;
use crate::state::AppState;

/// GET /crush - the whole collection, or `[]` when the store cannot be read
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Crush>> {
    let collection = state.store.load().await.unwrap_or_else(|e| {
        error!("Failed to load crush collection: {}", e);
        Vec::new()
    });

    Ok(ApiResponse::success(collection))
}

/// GET /crush/:id - a single record by numeric id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Crush> {
    let id = parse_id(&id).ok_or_else(ApiError::crush_not_found)?;

    let collection = state.store.load().await.unwrap_or_else(|e| {
        error!("Failed to load crush collection: {}", e);
        Vec::new()
    });

    collection
        .into_iter()
        .find(|crush| crush.id == id)
        .map(ApiResponse::success)
        .ok_or_else(ApiError::crush_not_found)
}

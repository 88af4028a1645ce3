use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::{object_body, parse_id};
use crate::middleware::{ApiResponse, ApiResult, MessageBody};
use crate::models::Crush;
use crate::state::AppState;
use crate::validation::{validate_crush, CrushPayload};

pub const CRUSH_DELETED: &str = "Crush deletado com sucesso";

/// POST /crush - validate, assign the next id, append and persist
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Crush> {
    let payload: CrushPayload = object_body(body)?;
    let input = validate_crush(&payload)?;

    let crush = state
        .store
        .modify(|collection, ids| {
            let crush = Crush::from_input(ids.next_id(collection), input);
            collection.push(crush.clone());
            Ok::<_, ApiError>(crush)
        })
        .await?;

    info!("Created crush {} ({})", crush.id, crush.name);
    Ok(ApiResponse::created(crush))
}

/// PUT /crush/:id - replace name, age and date of an existing record and persist
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Crush> {
    let payload: CrushPayload = object_body(body)?;
    let input = validate_crush(&payload)?;
    let id = parse_id(&id).ok_or_else(ApiError::crush_not_found)?;

    let crush = state
        .store
        .modify(|collection, _| {
            let crush = collection
                .iter_mut()
                .find(|crush| crush.id == id)
                .ok_or_else(ApiError::crush_not_found)?;
            crush.apply(input);
            Ok::<_, ApiError>(crush.clone())
        })
        .await?;

    info!("Updated crush {}", crush.id);
    Ok(ApiResponse::success(crush))
}

/// DELETE /crush/:id - drop the matching record, succeeding even when none matched
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<MessageBody> {
    let id = parse_id(&id);

    let removed = state
        .store
        .modify(|collection, _| {
            let before = collection.len();
            collection.retain(|crush| Some(crush.id) != id);
            Ok::<_, ApiError>(before - collection.len())
        })
        .await?;

    info!("Deleted {} crush record(s) for id {:?}", removed, id);
    Ok(ApiResponse::success(MessageBody::new(CRUSH_DELETED)))
}

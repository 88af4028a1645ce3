// handlers/public/login.rs - POST /login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::auth::{generate_token, redact};
use crate::handlers::object_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{validate_login, LoginPayload};

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub token: String,
}

/**
 * POST /login - exchange an email/password pair for a session token
 *
 * Input: `{ "email": "email@email.com", "password": "at least 6 chars" }`
 * Output: `{ "token": "<16 hex characters>" }`
 *
 * Credentials are only shape-checked and the token is not remembered.
 */
pub async fn post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TokenBody> {
    let payload: LoginPayload = object_body(body)?;
    let credentials = validate_login(&payload)?;

    let token = generate_token(state.token_length);
    tracing::info!("Issued token {} for {}", redact(&token), credentials.email);

    Ok(ApiResponse::success(TokenBody { token }))
}

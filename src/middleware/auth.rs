use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// Token gate for protected routes.
///
/// Checks only that an `Authorization` header carries a token of the
/// configured length. There is no session registry behind it.
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = match headers.get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| {
            tracing::warn!("Rejected {} {}: non-text Authorization header", request.method(), request.uri());
            ApiError::unauthorized(TokenError::Invalid.to_string())
        })?),
    };

    if let Err(err) = auth::check_token(raw, state.token_length) {
        tracing::warn!(
            "Rejected {} {}: {} ({})",
            request.method(),
            request.uri(),
            err,
            raw.map(auth::redact).unwrap_or_else(|| "no token".to_string())
        );
        return Err(ApiError::unauthorized(err.to_string()));
    }

    Ok(next.run(request).await)
}

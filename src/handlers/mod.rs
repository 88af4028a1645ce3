// handlers/mod.rs - Handler tiers
//
// Public (no token) → Protected (token gate applied at the route layer)
use axum::{extract::rejection::JsonRejection, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub mod public;
pub mod protected;

pub use protected::{crush_create, crush_delete, crush_search, crush_update};
pub use public::{crush_get, crush_list, login_post, root};

/// Path ids that are not positive integers match no record
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Accept only a JSON object body, then read it into `T`.
///
/// Derived struct deserializers also take positional arrays; those are refused here.
pub(crate) fn object_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body?;
    if !value.is_object() {
        tracing::warn!("Rejected request body: expected a JSON object");
        return Err(ApiError::invalid_json("Invalid JSON body: expected a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| ApiError::invalid_json(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::validation::CrushPayload;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("3"), Some(3));
        assert_eq!(parse_id("search"), None);
        assert_eq!(parse_id("-1"), None);
    }

    #[test]
    fn test_object_body_refuses_non_objects() {
        for body in [json!(["Zendaya", 24, { "datedAt": "25/09/2020", "rate": 5 }]), json!("x"), json!(5)] {
            let err = object_body::<CrushPayload>(Ok(Json(body))).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_JSON");
        }

        let payload: CrushPayload = object_body(Ok(Json(json!({ "name": "Zendaya" })))).unwrap();
        assert_eq!(payload.name, Some(json!("Zendaya")));
        assert!(payload.age.is_none());
    }
}

// handlers/public/mod.rs - Endpoints that need no token

use axum::http::StatusCode;

pub mod crush;
pub mod login;

pub use crush::get as crush_get;
pub use crush::list as crush_list;
pub use login::post as login_post;

/// GET / - liveness probe, empty body
pub async fn root() -> StatusCode {
    StatusCode::OK
}

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;

pub use state::AppState;

/// Build the service router.
///
/// `/crush/search` is a static segment and always wins over `/crush/:id`.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/login", post(handlers::login_post))
        // Crush collection, mixed public and token-gated methods
        .merge(crush_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn crush_routes(state: AppState) -> Router<AppState> {
    let token_gate = || from_fn_with_state(state.clone(), middleware::token_auth_middleware);

    Router::new()
        .route(
            "/crush/search",
            get(handlers::crush_search).route_layer(token_gate()),
        )
        .route(
            "/crush",
            get(handlers::crush_list).merge(post(handlers::crush_create).route_layer(token_gate())),
        )
        .route(
            "/crush/:id",
            get(handlers::crush_get).merge(
                put(handlers::crush_update)
                    .delete(handlers::crush_delete)
                    .route_layer(token_gate()),
            ),
        )
}

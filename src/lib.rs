// Library exports so integration tests can use the modules directly.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod safety;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router. CORS is wide open, as the original
/// dashboard service ran; there is no auth surface to protect.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello World!" }))
        .merge(routes::posts::router())
        .merge(routes::comments::router())
        .merge(routes::data::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

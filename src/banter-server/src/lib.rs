//! Banter HTTP surface: thin request/response plumbing over the
//! scoring engine and the debate opponent in `banter-core`.

pub mod error;
pub mod routes;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, routing::get, routing::post};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Uploads carry a full recording of the user's final turn.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/score", post(routes::score::score))
        .route("/debate", post(routes::debate::reply))
        .route("/debate/voice", post(routes::debate::voice_reply))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "Banter debate backend is running."
}

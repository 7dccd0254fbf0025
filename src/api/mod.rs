mod error;
mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use error::ApiError;
pub use handlers::{ask_json, ask_query, not_found};
pub use models::{AskQuery, AskResponse, ErrorResponse};

/// Behind API Gateway the path carries the stage (`/prod/ask`) or any proxied
/// resource, so with `answer_any_path` every path is treated like `/ask`.
pub fn router(state: Arc<AppState>) -> Router {
    let fallback = if state.answer_any_path {
        get(ask_query).post(ask_json).fallback(not_found)
    } else {
        any(not_found)
    };

    Router::new()
        .route("/", get(ask_query))
        .route("/ask", get(ask_query).post(ask_json))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::application::handlers;
use crate::state::AppState;

/// Headroom above the résumé limit for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.uploads.max_file_bytes() + FORM_OVERHEAD_BYTES)
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/send-email",
            post(handlers::handle_submit_application).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

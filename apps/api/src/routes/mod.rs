pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::results::handlers as results;
use crate::session::handlers as session;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/sessions",
            post(session::handle_create_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/cv", get(session::handle_get_cv))
        .route("/api/v1/cv/upload", post(session::handle_upload_cv))
        .route("/api/v1/cv/profile", put(session::handle_put_cv_profile))
        .route(
            "/api/v1/preferences",
            get(session::handle_get_preferences).post(session::handle_submit_preferences),
        )
        .route("/api/v1/results", get(results::handle_get_results))
        .route(
            "/api/v1/saved-jobs/toggle",
            post(session::handle_toggle_saved_job),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis;
use crate::cvs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV documents
        .route("/api/v1/cvs", get(cvs::handlers::handle_list_cvs))
        .route("/api/v1/cvs", post(cvs::handlers::handle_create_cv))
        .route("/api/v1/cvs/:id", get(cvs::handlers::handle_get_cv))
        .route("/api/v1/cvs/:id", put(cvs::handlers::handle_update_cv))
        .route("/api/v1/cvs/:id", delete(cvs::handlers::handle_delete_cv))
        .route(
            "/api/v1/cvs/:id/downloads",
            post(cvs::handlers::handle_increment_downloads),
        )
        .route(
            "/api/v1/cvs/:id/analyses",
            get(cvs::handlers::handle_list_analyses),
        )
        // Compatibility analysis
        .route("/api/v1/analyze", post(analysis::handlers::handle_analyze))
        .with_state(state)
}

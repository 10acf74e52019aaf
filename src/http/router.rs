//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Timetable CRUD
        .route("/timetables", get(handlers::list_timetables))
        .route("/timetables", post(handlers::create_timetable))
        // Planner assistance & validation (registered before {id} routes for clarity)
        .route("/timetables/plan-next-period", post(handlers::plan_next_period))
        .route("/timetables/validate", post(handlers::validate_timetable))
        .route("/timetables/{id}", get(handlers::get_timetable))
        .route("/timetables/{id}", put(handlers::update_timetable))
        .route("/timetables/{id}", delete(handlers::delete_timetable))
        .route("/timetables/{id}/status", post(handlers::update_status))
        // Teacher availability (advisory)
        .route(
            "/branches/{branch_id}/available-teachers",
            get(handlers::available_teachers),
        )
        .route(
            "/branches/{branch_id}/teachers/{teacher_id}/availability",
            get(handlers::teacher_availability),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

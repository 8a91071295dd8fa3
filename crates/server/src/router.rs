use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ask", post(handlers::ask_handler))
        .route("/examples", get(handlers::examples_handler))
        .route("/admin/add_data", post(handlers::add_data_handler))
        .route("/admin/rebuild", post(handlers::rebuild_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/catalog", get(handlers::get_catalog))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/sessions/:id/next", post(handlers::next_items))
        .route("/sessions/:id/engagements", post(handlers::record_engagement))
        .route(
            "/sessions/:id/focus",
            post(handlers::focus_item).delete(handlers::blur_item),
        )
        // Hand-off and summary
        .route("/sessions/:id/snapshot", get(handlers::get_snapshot))
        .route("/sessions/:id/wrapped", get(handlers::get_wrapped))
        .route("/wrapped", post(handlers::summarize))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

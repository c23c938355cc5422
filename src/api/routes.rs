use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the front server router with all pages
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::home))
        .route("/index.html", get(handlers::home))
        .route("/collection.html", get(handlers::collection))
        .route("/movie.html", get(handlers::movie))
        .route("/user.html", get(handlers::user))
        // Model administration
        .route("/models", get(handlers::models))
        .route("/models/switch", post(handlers::switch_model))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

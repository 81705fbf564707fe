use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::CatalogStore,
    middleware::{make_span_with_request_id, request_context_middleware},
    services::{FeedAssembler, PagingConfig, RankingConfig},
};

pub mod collections;
pub mod feed;
pub mod titles;

/// Shared application state
///
/// The catalog handle is passed in explicitly; nothing here is mutated after
/// startup.
pub struct AppState {
    pub feed: FeedAssembler,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, paging: PagingConfig, ranking: RankingConfig) -> Self {
        Self {
            feed: FeedAssembler::new(catalog, paging, ranking),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_context_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feed", get(feed::feed))
        .route("/titles/:title_id", get(titles::title))
        .route("/collections", get(collections::collections))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

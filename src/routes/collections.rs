use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::RequestContext, models::CollectionView, routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<CollectionView>,
}

/// Handler for curated collections
pub async fn collections(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> AppResult<Json<CollectionsResponse>> {
    let collections = state.feed.collections(&ctx).await?;

    tracing::info!(
        request_id = %ctx.id,
        count = collections.len(),
        "Collections loaded"
    );

    Ok(Json(CollectionsResponse { collections }))
}

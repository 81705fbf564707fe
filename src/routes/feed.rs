use axum::{
    extract::{Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestContext,
    models::FeedPage,
    routes::AppState,
    services::FeedParams,
};

/// Handler for the main feed endpoint
pub async fn feed(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<FeedPage>> {
    let params = FeedParams::from_pairs(pairs);
    tracing::debug!(
        request_id = %ctx.id,
        params = ?params,
        "Processing feed request"
    );

    let page = state.feed.feed_page(&params, &ctx).await?;
    Ok(Json(page))
}

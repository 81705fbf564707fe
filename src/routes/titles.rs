use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{error::AppResult, middleware::RequestContext, models::FeedItem, routes::AppState};

#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub item: FeedItem,
}

/// Handler for single-title lookup
pub async fn title(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(title_id): Path<String>,
) -> AppResult<Json<TitleResponse>> {
    let item = state.feed.title(&title_id, &ctx).await?;
    Ok(Json(TitleResponse { item }))
}

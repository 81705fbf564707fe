use std::sync::Arc;
use std::time::Instant;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult, CatalogOperation},
    middleware::RequestContext,
    models::{CollectionView, FeedItem, FeedPage, Title, TitleId, TrailerView},
};

use super::{
    diversity::{DiversityReranker, RankingConfig},
    filters::{self, FeedParams},
    pagination::fetch_page,
    trailer::select_trailer,
};

const OVERVIEW_LIMIT: usize = 160;
const OVERVIEW_KEEP: usize = 157;
const ELLIPSIS: &str = "...";

/// Page sizes for the feed and embedded previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub feed_page_size: usize,
    pub collection_preview_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            feed_page_size: 20,
            collection_preview_size: 10,
        }
    }
}

/// Builds feed, title and collection responses on top of a catalog store
///
/// Holds no per-request state; every call reads the catalog once and then
/// runs the pure ranking and shaping stages.
pub struct FeedAssembler {
    store: Arc<dyn CatalogStore>,
    paging: PagingConfig,
    reranker: DiversityReranker,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn CatalogStore>, paging: PagingConfig, ranking: RankingConfig) -> Self {
        Self {
            store,
            paging,
            reranker: DiversityReranker::new(ranking),
        }
    }

    /// One page of the main feed, genre-diversified within the page
    pub async fn feed_page(&self, params: &FeedParams, ctx: &RequestContext) -> AppResult<FeedPage> {
        let start = Instant::now();
        let (predicate, cursor) = filters::translate(params);

        let page = fetch_page(
            self.store.as_ref(),
            &predicate,
            cursor,
            self.paging.feed_page_size,
        )
        .await
        .map_err(|e| storage_failure(ctx, CatalogOperation::Feed, e))?;

        let titles = self.reranker.rerank(page.titles, |title| title.genres.as_slice());
        let items: Vec<FeedItem> = titles.iter().map(to_feed_item).collect();

        tracing::info!(
            request_id = %ctx.id,
            items = items.len(),
            has_more = page.next_cursor.is_some(),
            elapsed_ms = start.elapsed().as_millis(),
            "Feed page assembled"
        );

        Ok(FeedPage {
            items,
            next_cursor: page.next_cursor,
        })
    }

    /// A single title card; unknown and malformed ids are both "not found"
    pub async fn title(&self, raw_id: &str, ctx: &RequestContext) -> AppResult<FeedItem> {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return Err(AppError::InvalidInput("Missing title_id".to_string()));
        }

        let not_found = || AppError::NotFound("Title not found".to_string());
        let id: TitleId = raw_id.parse().map_err(|_| not_found())?;

        let title = self
            .store
            .find_title(id)
            .await
            .map_err(|e| storage_failure(ctx, CatalogOperation::Title, e))?
            .ok_or_else(not_found)?;

        Ok(to_feed_item(&title))
    }

    /// All collections with their curated previews; no reranking
    pub async fn collections(&self, ctx: &RequestContext) -> AppResult<Vec<CollectionView>> {
        let preview = self.paging.collection_preview_size;
        let entries = self
            .store
            .list_collections(preview)
            .await
            .map_err(|e| storage_failure(ctx, CatalogOperation::Collections, e))?;

        Ok(entries
            .into_iter()
            .map(|entry| CollectionView {
                id: entry.collection.id,
                slug: entry.collection.slug,
                title: entry.collection.title,
                description: entry.collection.description,
                items: entry.titles.iter().take(preview).map(to_feed_item).collect(),
            })
            .collect())
    }
}

/// Logs the real cause and hands back the opaque client-facing error
fn storage_failure(ctx: &RequestContext, operation: CatalogOperation, error: AppError) -> AppError {
    tracing::error!(
        request_id = %ctx.id,
        url = %ctx.uri,
        operation = operation.as_str(),
        error = %error,
        "Catalog query failed"
    );
    AppError::Unavailable(operation)
}

/// Shapes a catalog title into its client-facing card
pub fn to_feed_item(title: &Title) -> FeedItem {
    FeedItem {
        id: title.id,
        title: title.title.clone(),
        year: title.year,
        countries: title.countries.clone(),
        genres: title.genres.clone(),
        overview_short: overview_short(title.overview.as_deref()),
        poster_url: title.poster_url.clone(),
        backdrop_url: title.backdrop_url.clone(),
        trailer: select_trailer(&title.trailers).map(TrailerView::from),
    }
}

/// Truncates long overviews to 157 chars plus "..."; missing becomes ""
pub fn overview_short(overview: Option<&str>) -> String {
    let Some(overview) = overview else {
        return String::new();
    };

    if overview.chars().count() <= OVERVIEW_LIMIT {
        return overview.to_string();
    }

    let mut short: String = overview.chars().take(OVERVIEW_KEEP).collect();
    short.push_str(ELLIPSIS);
    short
}

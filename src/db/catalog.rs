use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{CollectionEntry, FeedCursor, Title, TitleId},
    services::TitlePredicate,
};

/// Read-only access to the title catalog
///
/// Implementations own retries, connection handling and any caching; the feed
/// assembler only ever sees a single call per operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Titles matching `predicate`, ordered by `(created_at, id)` descending
    ///
    /// When `after` is set, only rows strictly after that title in sort order
    /// are returned. A cursor that names no title yields no rows. Trailers are
    /// loaded for every returned title.
    async fn query_titles(
        &self,
        predicate: &TitlePredicate,
        after: Option<FeedCursor>,
        limit: usize,
    ) -> AppResult<Vec<Title>>;

    /// Point lookup by id, trailers included
    async fn find_title(&self, id: TitleId) -> AppResult<Option<Title>>;

    /// All collections ordered by title, each with up to `preview_limit`
    /// titles in curated order
    async fn list_collections(&self, preview_limit: usize) -> AppResult<Vec<CollectionEntry>>;
}

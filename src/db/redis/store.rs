use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cached,
    db::CatalogStore,
    error::AppResult,
    models::{CollectionEntry, FeedCursor, Title, TitleId},
    services::TitlePredicate,
};

use super::{Cache, CacheKey};

/// Catalog decorator that caches point lookups and collection previews
///
/// Feed pages go straight to the inner store: a cached page would pin cursors
/// to a stale snapshot of the catalog.
pub struct CachedCatalogStore {
    inner: Arc<dyn CatalogStore>,
    cache: Cache,
    ttl: u64,
}

impl CachedCatalogStore {
    pub fn new(inner: Arc<dyn CatalogStore>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl CatalogStore for CachedCatalogStore {
    async fn query_titles(
        &self,
        predicate: &TitlePredicate,
        after: Option<FeedCursor>,
        limit: usize,
    ) -> AppResult<Vec<Title>> {
        self.inner.query_titles(predicate, after, limit).await
    }

    async fn find_title(&self, id: TitleId) -> AppResult<Option<Title>> {
        let key = CacheKey::Title(id);
        match self.cache.get_from_cache::<Title>(&key).await {
            Ok(Some(title)) => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(Some(title));
            }
            Ok(None) => tracing::debug!(key = %key, "Cache miss"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache read failed"),
        }

        // Misses are not cached so freshly ingested titles show up immediately.
        let title = self.inner.find_title(id).await?;
        if let Some(title) = &title {
            self.cache.set_in_background(&key, title, self.ttl);
        }

        Ok(title)
    }

    async fn list_collections(&self, preview_limit: usize) -> AppResult<Vec<CollectionEntry>> {
        cached!(
            self.cache,
            CacheKey::Collections {
                preview: preview_limit
            },
            self.ttl,
            self.inner.list_collections(preview_limit)
        )
    }
}

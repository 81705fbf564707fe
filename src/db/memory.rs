use std::cmp::Reverse;

use async_trait::async_trait;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Collection, CollectionEntry, FeedCursor, Title, TitleId},
    services::TitlePredicate,
};

/// Vector-backed catalog with the same ordering and cursor rules as Postgres
///
/// Meant for tests and local experiments; it is built up front and then
/// shared read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    titles: Vec<Title>,
    collections: Vec<(Collection, Vec<(i32, TitleId)>)>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_titles(titles: Vec<Title>) -> Self {
        Self {
            titles,
            collections: Vec::new(),
        }
    }

    pub fn insert_title(&mut self, title: Title) {
        self.titles.retain(|existing| existing.id != title.id);
        self.titles.push(title);
    }

    /// Adds a collection; `items` pairs a curated `order_index` with a title id
    pub fn insert_collection(&mut self, collection: Collection, items: Vec<(i32, TitleId)>) {
        self.collections.push((collection, items));
    }

    fn get(&self, id: TitleId) -> Option<&Title> {
        self.titles.iter().find(|title| title.id == id)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn query_titles(
        &self,
        predicate: &TitlePredicate,
        after: Option<FeedCursor>,
        limit: usize,
    ) -> AppResult<Vec<Title>> {
        let boundary = match after {
            Some(cursor) => match cursor.title_id().and_then(|id| self.get(id)) {
                Some(title) => Some(title.sort_key()),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let mut matching: Vec<&Title> = self
            .titles
            .iter()
            .filter(|title| predicate.matches(title))
            .filter(|title| boundary.map_or(true, |key| title.sort_key() < key))
            .collect();
        matching.sort_by_key(|title| Reverse(title.sort_key()));

        Ok(matching.into_iter().take(limit).cloned().collect())
    }

    async fn find_title(&self, id: TitleId) -> AppResult<Option<Title>> {
        Ok(self.get(id).cloned())
    }

    async fn list_collections(&self, preview_limit: usize) -> AppResult<Vec<CollectionEntry>> {
        let mut collections: Vec<&(Collection, Vec<(i32, TitleId)>)> =
            self.collections.iter().collect();
        collections.sort_by(|a, b| a.0.title.cmp(&b.0.title));

        Ok(collections
            .into_iter()
            .map(|(collection, items)| {
                let mut items = items.clone();
                items.sort_by_key(|(order_index, _)| *order_index);

                let titles = items
                    .into_iter()
                    .take(preview_limit)
                    .filter_map(|(_, id)| self.get(id).cloned())
                    .collect();

                CollectionEntry {
                    collection: collection.clone(),
                    titles,
                }
            })
            .collect())
    }
}

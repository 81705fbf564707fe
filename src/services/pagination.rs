use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{FeedCursor, Title},
};

use super::TitlePredicate;

/// One page of titles in catalog order, before any reranking
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub titles: Vec<Title>,
    pub next_cursor: Option<FeedCursor>,
}

/// Fetches a single keyset page from the catalog
///
/// Asks the store for one row more than `page_size` to learn whether the feed
/// continues. The look-ahead row is dropped and the cursor becomes the id of
/// the last row kept, so the next call resumes right after it.
pub async fn fetch_page(
    store: &dyn CatalogStore,
    predicate: &TitlePredicate,
    cursor: Option<FeedCursor>,
    page_size: usize,
) -> AppResult<FetchedPage> {
    let page_size = page_size.max(1);
    let mut titles = store.query_titles(predicate, cursor, page_size + 1).await?;

    let has_more = titles.len() > page_size;
    titles.truncate(page_size);

    let next_cursor = if has_more {
        titles.last().map(|title| FeedCursor::from(title.id))
    } else {
        None
    };

    tracing::debug!(count = titles.len(), has_more, "Fetched feed page");

    Ok(FetchedPage {
        titles,
        next_cursor,
    })
}

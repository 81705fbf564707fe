use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Collection, CollectionEntry, ContentType, FeedCursor, Title, TitleId, Trailer},
    services::TitlePredicate,
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const TITLE_COLUMNS: &str = "t.id, t.provider, t.provider_id, t.type AS content_type, t.title, \
     t.original_title, t.year, t.runtime_minutes, t.overview, t.poster_url, t.backdrop_url, \
     t.genres, t.countries, t.languages, t.created_at";

#[derive(Debug, sqlx::FromRow)]
struct TitleRow {
    id: Uuid,
    provider: String,
    provider_id: String,
    content_type: String,
    title: String,
    original_title: Option<String>,
    year: Option<i32>,
    runtime_minutes: Option<i32>,
    overview: Option<String>,
    poster_url: Option<String>,
    backdrop_url: Option<String>,
    genres: Vec<String>,
    countries: Vec<String>,
    languages: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TitleRow {
    fn into_title(self, trailers: Vec<Trailer>) -> AppResult<Title> {
        let content_type = ContentType::parse(&self.content_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Title {} has unknown type '{}'",
                self.id, self.content_type
            ))
        })?;

        Ok(Title {
            id: TitleId(self.id),
            provider: self.provider,
            provider_id: self.provider_id,
            title: self.title,
            original_title: self.original_title,
            content_type,
            year: self.year,
            runtime_minutes: self.runtime_minutes,
            overview: self.overview,
            poster_url: self.poster_url,
            backdrop_url: self.backdrop_url,
            genres: self.genres,
            countries: self.countries,
            languages: self.languages,
            created_at: self.created_at,
            trailers,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrailerRow {
    title_id: Uuid,
    source: String,
    source_video_id: String,
    kind: String,
    is_official: bool,
    language: Option<String>,
    duration_seconds: Option<i32>,
}

impl From<TrailerRow> for Trailer {
    fn from(row: TrailerRow) -> Self {
        Trailer {
            source: row.source,
            video_id: row.source_video_id,
            kind: row.kind.into(),
            is_official: row.is_official,
            language: row.language,
            duration_seconds: row.duration_seconds,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: Uuid,
    slug: String,
    title: String,
    description: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionTitleRow {
    collection_id: Uuid,
    #[sqlx(flatten)]
    title: TitleRow,
}

/// Catalog store backed by the Postgres schema in `migrations/`
#[derive(Clone, Debug)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads trailers for all rows in one query and converts them to titles
    ///
    /// Trailers keep insertion order, which is the tie-break order used when
    /// picking the trailer to show.
    async fn attach_trailers(&self, rows: Vec<TitleRow>) -> AppResult<Vec<Title>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let trailer_rows = sqlx::query_as::<_, TrailerRow>(
            r#"
            SELECT title_id, source, source_video_id, kind, is_official, language, duration_seconds
            FROM trailers
            WHERE title_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut by_title: HashMap<Uuid, Vec<Trailer>> = HashMap::new();
        for row in trailer_rows {
            by_title.entry(row.title_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let trailers = by_title.get(&row.id).cloned().unwrap_or_default();
                row.into_title(trailers)
            })
            .collect()
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn query_titles(
        &self,
        predicate: &TitlePredicate,
        after: Option<FeedCursor>,
        limit: usize,
    ) -> AppResult<Vec<Title>> {
        let mut sql_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {TITLE_COLUMNS} FROM titles t WHERE 1=1"));

        if let Some(content_type) = predicate.content_type {
            sql_builder.push(" AND t.type = ");
            sql_builder.push_bind(content_type.as_str());
        }
        if !predicate.genres.is_empty() {
            sql_builder.push(" AND t.genres && ");
            sql_builder.push_bind(predicate.genres.as_slice());
        }
        if !predicate.countries.is_empty() {
            sql_builder.push(" AND t.countries && ");
            sql_builder.push_bind(predicate.countries.as_slice());
        }
        if !predicate.languages.is_empty() {
            sql_builder.push(" AND t.languages && ");
            sql_builder.push_bind(predicate.languages.as_slice());
        }
        if let Some(range) = predicate.year {
            sql_builder.push(" AND t.year IS NOT NULL");
            if let Some(min) = range.min {
                sql_builder.push(" AND t.year >= ");
                sql_builder.push_bind(min);
            }
            if let Some(max) = range.max {
                sql_builder.push(" AND t.year <= ");
                sql_builder.push_bind(max);
            }
        }

        if let Some(cursor) = after {
            let Some(cursor_id) = cursor.title_id() else {
                tracing::debug!(cursor = %cursor, "Cursor is not a title id, ending feed");
                return Ok(Vec::new());
            };
            // A cursor row that no longer exists makes the comparison NULL,
            // which ends the feed instead of restarting it.
            sql_builder.push(
                " AND (t.created_at, t.id) < (SELECT c.created_at, c.id FROM titles c WHERE c.id = ",
            );
            sql_builder.push_bind(cursor_id.0);
            sql_builder.push(")");
        }

        sql_builder.push(" ORDER BY t.created_at DESC, t.id DESC LIMIT ");
        sql_builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let rows = sql_builder
            .build_query_as::<TitleRow>()
            .fetch_all(&self.pool)
            .await?;

        self.attach_trailers(rows).await
    }

    async fn find_title(&self, id: TitleId) -> AppResult<Option<Title>> {
        let sql = format!("SELECT {TITLE_COLUMNS} FROM titles t WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_trailers(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_collections(&self, preview_limit: usize) -> AppResult<Vec<CollectionEntry>> {
        let collections = sqlx::query_as::<_, CollectionRow>(
            "SELECT id, slug, title, description FROM collections ORDER BY title ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        if collections.is_empty() {
            return Ok(Vec::new());
        }

        let collection_ids: Vec<Uuid> = collections.iter().map(|c| c.id).collect();
        let sql = format!(
            r#"
            SELECT ranked.collection_id, {TITLE_COLUMNS}
            FROM (
                SELECT ci.collection_id, ci.title_id, ci.order_index,
                       ROW_NUMBER() OVER (
                           PARTITION BY ci.collection_id ORDER BY ci.order_index ASC
                       ) AS position
                FROM collection_items ci
                WHERE ci.collection_id = ANY($1)
            ) ranked
            JOIN titles t ON t.id = ranked.title_id
            WHERE ranked.position <= $2
            ORDER BY ranked.collection_id, ranked.order_index ASC
            "#
        );

        let rows = sqlx::query_as::<_, CollectionTitleRow>(&sql)
            .bind(&collection_ids[..])
            .bind(i64::try_from(preview_limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let (owners, title_rows): (Vec<Uuid>, Vec<TitleRow>) = rows
            .into_iter()
            .map(|row| (row.collection_id, row.title))
            .unzip();
        let titles = self.attach_trailers(title_rows).await?;

        let mut by_collection: HashMap<Uuid, Vec<Title>> = HashMap::new();
        for (owner, title) in owners.into_iter().zip(titles) {
            by_collection.entry(owner).or_default().push(title);
        }

        tracing::debug!(
            collections = collections.len(),
            preview_limit,
            "Loaded collection previews"
        );

        Ok(collections
            .into_iter()
            .map(|row| CollectionEntry {
                titles: by_collection.remove(&row.id).unwrap_or_default(),
                collection: Collection {
                    id: row.id,
                    slug: row.slug,
                    title: row.title,
                    description: row.description,
                },
            })
            .collect())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::Trailer;

/// Identifier of a catalog title
///
/// Ordering follows the raw UUID bytes, which matches how Postgres compares
/// `uuid` columns. The feed relies on this for its `id DESC` tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(pub Uuid);

impl TitleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TitleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TitleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(TitleId)
    }
}

/// Kind of content a title represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    /// Parses the exact wire values `movie` and `tv`; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(ContentType::Movie),
            "tv" => Some(ContentType::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }
}

/// A movie or show in the catalog, with its trailers eagerly loaded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: TitleId,
    /// Upstream catalog the title was ingested from (e.g. "tmdb")
    pub provider: String,
    pub provider_id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub content_type: ContentType,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub trailers: Vec<Trailer>,
}

impl Title {
    /// Creates a bare title with empty metadata sets and no trailers
    pub fn new(title: impl Into<String>, content_type: ContentType, created_at: DateTime<Utc>) -> Self {
        let id = TitleId::new();
        Self {
            id,
            provider: "local".to_string(),
            provider_id: id.to_string(),
            title: title.into(),
            original_title: None,
            content_type,
            year: None,
            runtime_minutes: None,
            overview: None,
            poster_url: None,
            backdrop_url: None,
            genres: Vec::new(),
            countries: Vec::new(),
            languages: Vec::new(),
            created_at,
            trailers: Vec::new(),
        }
    }

    /// Key of the feed's total order; feeds are sorted by this key descending
    pub fn sort_key(&self) -> (DateTime<Utc>, TitleId) {
        (self.created_at, self.id)
    }
}

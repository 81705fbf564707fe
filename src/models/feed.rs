use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use super::{TitleId, Trailer, TrailerKind};

/// Opaque resume token: the id of the last item of the previous page
///
/// Kept as the raw string the client sent. Only the catalog store
/// interprets it, and a token that names no title simply ends the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedCursor(String);

impl FeedCursor {
    /// Wraps a client-supplied token; blank tokens mean "no cursor"
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The title the cursor points at, if the token is a well-formed id
    pub fn title_id(&self) -> Option<TitleId> {
        self.0.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<TitleId> for FeedCursor {
    fn from(id: TitleId) -> Self {
        Self(id.to_string())
    }
}

impl Display for FeedCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trailer as exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailerView {
    pub source: String,
    pub video_id: String,
    pub kind: TrailerKind,
    pub is_official: bool,
}

impl From<&Trailer> for TrailerView {
    fn from(trailer: &Trailer) -> Self {
        Self {
            source: trailer.source.clone(),
            video_id: trailer.video_id.clone(),
            kind: trailer.kind.clone(),
            is_official: trailer.is_official,
        }
    }
}

/// One card in a feed, collection preview or title detail response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedItem {
    pub id: TitleId,
    pub title: String,
    pub year: Option<i32>,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
    /// Never null; empty when the title has no overview
    pub overview_short: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer: Option<TrailerView>,
}

/// One page of the main feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    /// `None` once the end of the feed is reached
    pub next_cursor: Option<FeedCursor>,
}

/// A curated collection with its preview items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionView {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<FeedItem>,
}

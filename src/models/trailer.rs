use serde::{Deserialize, Serialize};

/// Kind of promotional video attached to a title
///
/// Unrecognised kinds are kept verbatim so they survive a round trip through
/// the API, but they rank below every known kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrailerKind {
    Trailer,
    Teaser,
    Clip,
    Other(String),
}

impl TrailerKind {
    /// Selection priority, higher is better
    pub fn priority(&self) -> u8 {
        match self {
            TrailerKind::Trailer => 3,
            TrailerKind::Teaser => 2,
            TrailerKind::Clip => 1,
            TrailerKind::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TrailerKind::Trailer => "trailer",
            TrailerKind::Teaser => "teaser",
            TrailerKind::Clip => "clip",
            TrailerKind::Other(kind) => kind,
        }
    }
}

impl From<String> for TrailerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "trailer" => TrailerKind::Trailer,
            "teaser" => TrailerKind::Teaser,
            "clip" => TrailerKind::Clip,
            _ => TrailerKind::Other(value),
        }
    }
}

impl From<&str> for TrailerKind {
    fn from(value: &str) -> Self {
        TrailerKind::from(value.to_string())
    }
}

impl From<TrailerKind> for String {
    fn from(kind: TrailerKind) -> Self {
        match kind {
            TrailerKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// A video asset owned by exactly one title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    /// Hosting platform, e.g. "youtube"
    pub source: String,
    /// Platform-specific video identifier
    pub video_id: String,
    pub kind: TrailerKind,
    pub is_official: bool,
    pub language: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl Trailer {
    pub fn new(
        source: impl Into<String>,
        video_id: impl Into<String>,
        kind: impl Into<TrailerKind>,
        is_official: bool,
    ) -> Self {
        Self {
            source: source.into(),
            video_id: video_id.into(),
            kind: kind.into(),
            is_official,
            language: None,
            duration_seconds: None,
        }
    }
}

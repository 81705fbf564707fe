use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Title;

/// An editorially curated list of titles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
}

/// A collection together with its preview titles, in curated order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionEntry {
    pub collection: Collection,
    pub titles: Vec<Title>,
}

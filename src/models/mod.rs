mod collection;
mod feed;
mod title;
mod trailer;

pub use collection::{Collection, CollectionEntry};
pub use feed::{CollectionView, FeedCursor, FeedItem, FeedPage, TrailerView};
pub use title::{ContentType, Title, TitleId};
pub use trailer::{Trailer, TrailerKind};

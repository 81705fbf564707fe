pub mod diversity;
pub mod feed;
pub mod filters;
pub mod pagination;
pub mod trailer;

pub use diversity::{DiversityReranker, RankingConfig};
pub use feed::{overview_short, to_feed_item, FeedAssembler, PagingConfig};
pub use filters::{translate, FeedParams, TitlePredicate, YearRange};
pub use pagination::{fetch_page, FetchedPage};
pub use trailer::select_trailer;

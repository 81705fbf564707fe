pub mod catalog;
pub mod memory;
pub mod postgres;
pub mod redis;

pub use catalog::CatalogStore;
#[cfg(test)]
pub use catalog::MockCatalogStore;
pub use memory::InMemoryCatalog;
pub use postgres::{create_pool, PgCatalogStore};
pub use self::redis::create_redis_client;
pub use self::redis::{Cache, CacheKey, CacheWriterHandle, CachedCatalogStore};

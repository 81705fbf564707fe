/// Read-through caching against a [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss, or when the cache cannot be
/// read, awaits `$block`, queues the result for writing with `$ttl` seconds,
/// and returns it. Cache read errors are logged, never propagated.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Collections { preview }, self.ttl, async move {
///     self.inner.list_collections(preview).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                match lookup {
                    Err(e) => tracing::warn!(key = %key, error = %e, "Cache read failed"),
                    _ => tracing::debug!(key = %key, "Cache miss"),
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::TitleId;

const KEY_PREFIX: &str = "reelfeed";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Single title lookup, trailers included
    Title(TitleId),
    /// Every collection with its preview, keyed by preview size
    Collections { preview: usize },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Title(id) => write!(f, "{}:title:{}", KEY_PREFIX, id),
            CacheKey::Collections { preview } => {
                write!(f, "{}:collections:{}", KEY_PREFIX, preview)
            }
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
///
/// Every read and write shares one reconnecting connection, and each command
/// is bounded by `timeout` so an unreachable Redis degrades to a cache miss.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    timeout: Duration,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until queued writes are flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Connects to Redis and starts the async write background task
    ///
    /// Writes are queued on a channel and applied by the background task, so
    /// filling the cache never delays a response. Fails when Redis cannot be
    /// reached within `timeout`.
    pub async fn new(redis_client: Client, timeout: Duration) -> AppResult<(Self, CacheWriterHandle)> {
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout)
            .set_number_of_retries(1);
        let connection = with_timeout(
            timeout,
            ConnectionManager::new_with_config(redis_client, config),
        )
        .await?;

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_connection = connection.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(writer_connection, write_rx, shutdown_rx, timeout).await;
        });

        let cache = Self {
            connection,
            write_tx,
            timeout,
        };

        Ok((cache, CacheWriterHandle { shutdown_tx, task }))
    }

    /// Background task that applies queued writes until shutdown
    ///
    /// On shutdown the channel is closed first, so the flush loop ends even
    /// while `Cache` clones are still alive.
    async fn cache_writer_task(
        connection: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
        timeout: Duration,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(connection.clone(), msg, timeout).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;

                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(connection.clone(), msg, timeout).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(
        mut conn: ConnectionManager,
        msg: CacheWriteMessage,
        timeout: Duration,
    ) -> AppResult<()> {
        let _: () = with_timeout(timeout, conn.set_ex(msg.key, msg.value, msg.ttl)).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let cached: Option<String> =
            with_timeout(self.timeout, conn.get(key.to_string())).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(msg).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped, dropping write");
        }
    }
}

/// Bounds a Redis call; elapsed calls surface as an internal error
async fn with_timeout<T, F>(timeout: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::Internal(format!(
            "Redis call timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

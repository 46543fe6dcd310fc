//! Redis list transport
//!
//! Each topic is a Redis list; the executor pops from the other end.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::{QueueError, QueueTransport};

/// Pushes messages onto Redis lists over one multiplexed connection
#[derive(Clone)]
pub struct RedisTransport {
    conn: MultiplexedConnection,
}

impl RedisTransport {
    /// Connect to Redis
    pub async fn connect(redis_url: &str) -> Result<Self, QueueError> {
        info!("Connecting to queue...");
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Queue connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl QueueTransport for RedisTransport {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<String, QueueError> {
        // The connection handle is cheap to clone and multiplexes requests
        let mut conn = self.conn.clone();
        let len: i64 = conn.rpush(topic, payload).await?;
        if len <= 0 {
            return Err(QueueError::Rejected(format!(
                "RPUSH {} returned {}",
                topic, len
            )));
        }
        Ok(format!("{}:{}", topic, len))
    }
}

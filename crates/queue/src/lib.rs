//! Plan job queue

pub mod publisher;
pub mod redis_list;

pub use publisher::{PublishReceipt, Publisher};
pub use redis_list::RedisTransport;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Transport rejected message: {0}")]
    Rejected(String),
}

impl From<QueueError> for common::Error {
    fn from(err: QueueError) -> Self {
        common::Error::Queue(err.to_string())
    }
}

/// Delivers serialized messages to a named topic.
///
/// Implementations must be safe for concurrent use and must only return
/// `Ok` once the broker has accepted the message. They never retry.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Returns a broker-specific acknowledgement
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<String, QueueError>;
}

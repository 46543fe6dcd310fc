//! Queue publisher for plan jobs

use std::sync::Arc;

use common::models::PlanJob;
use tracing::debug;

use crate::QueueTransport;

/// Broker acknowledgement for one published job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub topic: String,
    pub ack: String,
}

/// Serializes plan jobs and hands them to the transport
#[derive(Clone)]
pub struct Publisher {
    transport: Arc<dyn QueueTransport>,
    topic: String,
}

impl Publisher {
    pub fn new(transport: Arc<dyn QueueTransport>, topic: impl Into<String>) -> Self {
        Self {
            transport,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish one job. Exactly one transport call is made; failures are
    /// returned to the caller untouched.
    pub async fn publish(&self, job: &PlanJob) -> common::Result<PublishReceipt> {
        let payload =
            serde_json::to_vec(job).map_err(|e| common::Error::Serialization(e.to_string()))?;
        debug!(topic = %self.topic, plan_id = %job.plan_id, bytes = payload.len(), "Publishing plan job");

        let ack = self.transport.send(&self.topic, payload).await?;
        Ok(PublishReceipt {
            topic: self.topic.clone(),
            ack,
        })
    }
}

//! Webhook payload parsing

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::events::*;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed webhook payload
#[derive(Debug, Clone)]
pub enum WebhookPayload {
    PullRequest(PullRequestEvent),
    Ping(PingEvent),
    Installation(InstallationEvent),
    InstallationRepositories(InstallationRepositoriesEvent),
    Unknown,
}

/// One authenticated inbound webhook call
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    /// Unique per delivery attempt, not per logical event
    pub delivery_id: Option<String>,
    pub event_name: String,
    pub action: Option<String>,
    pub received_at: DateTime<Utc>,
    pub payload: WebhookPayload,
}

impl WebhookPayload {
    /// Parse a webhook payload from the event type and body
    pub fn parse(event_type: &str, body: &[u8]) -> Result<Self, ParseError> {
        debug!("Parsing webhook: {}", event_type);

        match event_type {
            "ping" => Ok(WebhookPayload::Ping(serde_json::from_slice(body)?)),
            "pull_request" => Ok(WebhookPayload::PullRequest(serde_json::from_slice(body)?)),
            "installation" => Ok(WebhookPayload::Installation(serde_json::from_slice(body)?)),
            "installation_repositories" => Ok(WebhookPayload::InstallationRepositories(
                serde_json::from_slice(body)?,
            )),
            _ => Ok(WebhookPayload::Unknown),
        }
    }

    fn action(&self) -> Option<&str> {
        match self {
            WebhookPayload::PullRequest(e) => Some(e.action.as_str()),
            WebhookPayload::Installation(e) => Some(e.action.as_str()),
            WebhookPayload::InstallationRepositories(e) => Some(e.action.as_str()),
            WebhookPayload::Ping(_) | WebhookPayload::Unknown => None,
        }
    }
}

impl WebhookDelivery {
    /// Decode an already-authenticated delivery.
    ///
    /// Unknown event types still produce a delivery; the action is read from
    /// the body on a best-effort basis so they can be logged.
    pub fn parse(
        event_name: &str,
        delivery_id: Option<String>,
        body: &[u8],
    ) -> Result<Self, ParseError> {
        let payload = WebhookPayload::parse(event_name, body)?;
        let action = match payload.action() {
            Some(action) => Some(action.to_string()),
            None => serde_json::from_slice::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("action").and_then(|a| a.as_str()).map(str::to_string)),
        };

        Ok(Self {
            delivery_id: delivery_id.filter(|d| !d.is_empty()),
            event_name: event_name.to_string(),
            action,
            received_at: Utc::now(),
            payload,
        })
    }

    /// `event.action`, or just `event` when there is no action
    pub fn qualified_name(&self) -> String {
        match &self.action {
            Some(action) => format!("{}.{}", self.event_name, action),
            None => self.event_name.clone(),
        }
    }
}

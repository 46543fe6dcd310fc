//! Webhook event routing
//!
//! `EventHandler::handle` never fails. Errors from the enqueue chain are
//! logged here and turned into a `Dispatch` value; nothing reaches the HTTP
//! layer.

use std::sync::Arc;

use common::models::{PullRequestRef, RepositoryRef};
use common::Config;
use github::{
    InstallationEvent, InstallationRepositoriesEvent, PingEvent, PullRequestEvent, TokenMinter,
    WebhookDelivery, WebhookPayload,
};
use queue::{PublishReceipt, Publisher};
use tracing::{debug, error, info};

use crate::jobs::{build_plan_job, DeliveryMeta, JobSettings};

/// What happened to one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A plan job was accepted by the queue
    Planned { plan_id: String, ack: String },
    /// The enqueue chain failed; the error has been logged
    PlanFailed { error: String },
    /// Ping acknowledged
    Acknowledged,
    /// Installation lifecycle event logged
    Observed,
    /// Event or action the relay does not handle
    Ignored,
}

/// Handles incoming webhook events
pub struct EventHandler {
    minter: Arc<dyn TokenMinter>,
    publisher: Publisher,
    settings: JobSettings,
}

impl EventHandler {
    pub fn new(minter: Arc<dyn TokenMinter>, publisher: Publisher, config: &Config) -> Self {
        Self {
            minter,
            publisher,
            settings: JobSettings::from(config),
        }
    }

    /// Route one delivery by `(event, action)`
    pub async fn handle(&self, delivery: &WebhookDelivery) -> Dispatch {
        let delivery_id = delivery.delivery_id.as_deref().unwrap_or_default();
        let action = delivery.action.as_deref().unwrap_or_default();

        match (&delivery.payload, action) {
            (
                WebhookPayload::PullRequest(event),
                "opened" | "synchronize" | "reopened",
            ) => self.handle_pull_request(delivery, event).await,
            (WebhookPayload::Ping(event), _) => {
                handle_ping(delivery_id, event);
                Dispatch::Acknowledged
            }
            (WebhookPayload::Installation(event), "created" | "deleted") => {
                handle_installation(delivery_id, event);
                Dispatch::Observed
            }
            (WebhookPayload::InstallationRepositories(event), "added" | "removed") => {
                handle_installation_repositories(delivery_id, event);
                Dispatch::Observed
            }
            _ => {
                debug!(
                    event = %delivery.qualified_name(),
                    delivery = %delivery_id,
                    "Ignoring unhandled event"
                );
                Dispatch::Ignored
            }
        }
    }

    async fn handle_pull_request(
        &self,
        delivery: &WebhookDelivery,
        event: &PullRequestEvent,
    ) -> Dispatch {
        let repo = RepositoryRef::from(&event.repository);
        let pr = PullRequestRef::from(&event.pull_request);
        let name = delivery.qualified_name();
        let delivery_id = delivery.delivery_id.as_deref().unwrap_or_default();
        let head_sha = pr.head_sha.as_deref().unwrap_or_default();

        info!(
            event = %name,
            delivery = %delivery_id,
            repo = %repo.full_name,
            pr_number = pr.number,
            head_sha = %head_sha,
            "Pull request event"
        );

        match self.enqueue_plan(delivery, event, &repo, &pr).await {
            Ok((plan_id, receipt)) => {
                debug!(
                    event = %name,
                    delivery = %delivery_id,
                    plan_id = %plan_id,
                    topic = %receipt.topic,
                    ack = %receipt.ack,
                    "Plan job enqueued"
                );
                Dispatch::Planned {
                    plan_id,
                    ack: receipt.ack,
                }
            }
            Err(e) => {
                error!(
                    event = %name,
                    delivery = %delivery_id,
                    repo = %repo.full_name,
                    pr_number = pr.number,
                    head_sha = %head_sha,
                    kind = e.kind(),
                    error = %e,
                    "Failed to enqueue plan job"
                );
                Dispatch::PlanFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// mint credential -> build job -> publish, strictly in that order
    async fn enqueue_plan(
        &self,
        delivery: &WebhookDelivery,
        event: &PullRequestEvent,
        repo: &RepositoryRef,
        pr: &PullRequestRef,
    ) -> common::Result<(String, PublishReceipt)> {
        if pr.number == 0 {
            return Err(common::Error::InvalidPullRequestNumber);
        }
        let installation_id = event
            .installation_id()
            .ok_or(common::Error::MissingInstallationId)?;

        let credential = self.minter.mint(installation_id).await?;

        let meta = DeliveryMeta {
            delivery_id: delivery.delivery_id.as_deref(),
            received_at: delivery.received_at,
        };
        let job = build_plan_job(repo, pr, credential, meta, &self.settings);

        let receipt = self.publisher.publish(&job).await?;
        Ok((job.plan_id, receipt))
    }
}

fn handle_ping(delivery_id: &str, event: &PingEvent) {
    info!(
        event = "ping",
        delivery = %delivery_id,
        hook_id = event.hook_id.unwrap_or_default(),
        zen = %event.zen.as_deref().unwrap_or_default(),
        "Received ping"
    );
}

fn handle_installation(delivery_id: &str, event: &InstallationEvent) {
    let account = event
        .installation
        .account
        .as_ref()
        .map(|a| a.login.as_str())
        .unwrap_or_default();
    info!(
        event = %format!("installation.{}", event.action),
        delivery = %delivery_id,
        installation_id = event.installation.id.unwrap_or_default(),
        account = %account,
        repositories = event.repositories.len(),
        "Installation event"
    );
}

fn handle_installation_repositories(delivery_id: &str, event: &InstallationRepositoriesEvent) {
    let repos = match event.action.as_str() {
        "added" => &event.repositories_added,
        _ => &event.repositories_removed,
    };
    let names: Vec<&str> = repos.iter().map(|r| r.full_name.as_str()).collect();
    info!(
        event = %format!("installation_repositories.{}", event.action),
        delivery = %delivery_id,
        installation_id = event.installation.id.unwrap_or_default(),
        repo = %names.join(","),
        "Installation repositories event"
    );
}

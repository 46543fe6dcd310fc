//! GitHub webhook intake and app authentication

pub mod app_auth;
pub mod events;
pub mod verify;
pub mod webhooks;

pub use app_auth::{AppAuthError, GitHubAppMinter, TokenMinter};
pub use events::{
    GitHubAccount, GitHubBranch, GitHubPullRequest, GitHubRepo, InstallationEvent,
    InstallationRef, InstallationRepo, InstallationRepositoriesEvent, PingEvent,
    PullRequestEvent,
};
pub use verify::{sign, verify_signature, SIGNATURE_HEADER};
pub use webhooks::{ParseError, WebhookDelivery, WebhookPayload};

//! Error types

use thiserror::Error;

/// Main error type for plan-relay
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("credentials not configured")]
    CredentialsNotConfigured,

    #[error("missing installation id")]
    MissingInstallationId,

    #[error("pull request number must be positive")]
    InvalidPullRequestNumber,

    #[error("Credential exchange failed: {0}")]
    CredentialExchange(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Queue error: {0}")]
    Queue(String),
}

impl Error {
    /// Short machine-readable label used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::CredentialsNotConfigured
            | Error::MissingInstallationId
            | Error::InvalidPullRequestNumber => "precondition",
            Error::CredentialExchange(_) => "credential_exchange",
            Error::Serialization(_) => "serialization",
            Error::Queue(_) => "queue",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

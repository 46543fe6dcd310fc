//! GitHub App installation token minting
//!
//! The app signs a short-lived JWT with its private key and exchanges it for
//! an installation access token. Tokens are minted per request and never
//! cached.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::models::InstallationCredential;
use common::Config;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AppAuthError {
    #[error("credentials not configured")]
    NotConfigured,
    #[error("Invalid app private key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),
    #[error("Failed to sign app JWT: {0}")]
    Jwt(jsonwebtoken::errors::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl From<AppAuthError> for common::Error {
    fn from(err: AppAuthError) -> Self {
        match err {
            AppAuthError::NotConfigured => common::Error::CredentialsNotConfigured,
            AppAuthError::InvalidKey(e) => {
                common::Error::Config(format!("Invalid app private key: {}", e))
            }
            other => common::Error::CredentialExchange(other.to_string()),
        }
    }
}

/// Exchanges an installation id for a scoped access token
#[async_trait]
pub trait TokenMinter: Send + Sync {
    async fn mint(&self, installation_id: u64) -> Result<InstallationCredential, AppAuthError>;
}

/// JWT claims GitHub expects from an app
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

struct AppSigner {
    app_id: u64,
    key: EncodingKey,
}

/// Mints installation tokens through the GitHub REST API
pub struct GitHubAppMinter {
    client: reqwest::Client,
    api_base_url: String,
    signer: Option<AppSigner>,
}

impl GitHubAppMinter {
    /// Build a minter from configuration.
    ///
    /// Missing app credentials are not an error here; every `mint` call will
    /// report them instead. A key that is present but unparsable is.
    pub fn from_config(config: &Config) -> Result<Self, AppAuthError> {
        let signer = match &config.app {
            Some(app) => Some(AppSigner {
                app_id: app.app_id,
                key: EncodingKey::from_rsa_pem(app.private_key.as_bytes())
                    .map_err(AppAuthError::InvalidKey)?,
            }),
            None => None,
        };
        Ok(Self {
            client: reqwest::Client::new(),
            api_base_url: config.github_api_base_url.clone(),
            signer,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    fn app_jwt(&self, now: DateTime<Utc>) -> Result<String, AppAuthError> {
        let signer = self.signer.as_ref().ok_or(AppAuthError::NotConfigured)?;
        // Backdated to tolerate clock drift; GitHub caps the lifetime at 10 minutes
        let claims = Claims {
            iat: (now - Duration::seconds(60)).timestamp(),
            exp: (now + Duration::minutes(9)).timestamp(),
            iss: signer.app_id.to_string(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signer.key)
            .map_err(AppAuthError::Jwt)
    }

    fn headers(jwt: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("plan-relay/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", jwt)) {
            headers.insert(AUTHORIZATION, val);
        }
        headers
    }
}

#[async_trait]
impl TokenMinter for GitHubAppMinter {
    async fn mint(&self, installation_id: u64) -> Result<InstallationCredential, AppAuthError> {
        let jwt = self.app_jwt(Utc::now())?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base_url, installation_id
        );
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .headers(Self::headers(&jwt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AppAuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: AccessTokenResponse = resp.json().await?;
        Ok(InstallationCredential {
            installation_id,
            token: body.token,
            expires_at: body.expires_at,
        })
    }
}

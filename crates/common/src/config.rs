//! Application configuration

use std::env;
use std::fmt;

use crate::error::{Error, Result};

pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_QUEUE_TOPIC: &str = "plan";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub webhook_secret: String,
    pub redis_url: String,
    pub queue_topic: String,
    /// GitHub App identity, only needed for minting installation tokens
    pub app: Option<AppCredentialsConfig>,
    pub github_api_base_url: String,
    pub tool_version: String,
}

/// GitHub App identity and signing key
#[derive(Clone)]
pub struct AppCredentialsConfig {
    pub app_id: u64,
    pub private_key: String,
}

impl fmt::Debug for AppCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentialsConfig")
            .field("app_id", &self.app_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_secret = get("GITHUB_WEBHOOK_SECRET")
            .ok_or_else(|| Error::Config("GITHUB_WEBHOOK_SECRET is required".to_string()))?;

        let port: u16 = match get("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", p)))?,
            None => 8080,
        };

        let app_id = match get("GITHUB_APP_ID") {
            Some(id) => Some(
                id.trim()
                    .parse::<u64>()
                    .map_err(|_| Error::Config(format!("invalid GITHUB_APP_ID: {}", id)))?,
            ),
            None => None,
        };
        let private_key = get("GITHUB_APP_PRIVATE_KEY").map(|k| k.replace("\\n", "\n"));
        let app = match (app_id, private_key) {
            (Some(app_id), Some(private_key)) => Some(AppCredentialsConfig {
                app_id,
                private_key,
            }),
            _ => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            webhook_secret,
            redis_url: get("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            queue_topic: get("QUEUE_TOPIC").unwrap_or_else(|| DEFAULT_QUEUE_TOPIC.to_string()),
            app,
            github_api_base_url: get("GITHUB_API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_string()),
            tool_version: lookup("TOOL_VERSION").unwrap_or_default(),
        })
    }
}

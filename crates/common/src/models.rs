//! Domain models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository a delivery refers to, with fallbacks already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub github_id: Option<i64>,
    pub owner_login: String,
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    pub default_branch: String,
}

/// Pull request a delivery refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    /// Absent on some lifecycle edges
    pub head_sha: Option<String>,
    pub head_ref: Option<String>,
    pub base_ref: Option<String>,
}

/// Short-lived installation access token
#[derive(Clone)]
pub struct InstallationCredential {
    pub installation_id: u64,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for InstallationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationCredential")
            .field("installation_id", &self.installation_id)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Work-order placed on the queue for the plan executor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanJob {
    pub request_id: String,
    pub plan_id: String,
    pub repo: PlanRepo,
    pub pull_request: PlanPullRequest,
    pub installation: PlanInstallation,
    pub work: PlanWork,
    pub github_api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanRepo {
    pub full_name: String,
    pub clone_url: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanPullRequest {
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_ref: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanInstallation {
    pub id: u64,
    pub token: String,
}

impl fmt::Debug for PlanInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanInstallation")
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanWork {
    pub dir: String,
    pub tool_version: String,
    pub plan_id: String,
}

//! GitHub event types
//!
//! Only the fields the relay reads are modelled. Anything that GitHub omits
//! on some lifecycle edges is an `Option`.

use common::models::{PullRequestRef, RepositoryRef};
use serde::Deserialize;

/// GitHub account (as appears in webhook payloads)
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAccount {
    pub login: String,
}

/// GitHub repository (as appears in webhook payloads)
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub id: Option<i64>,
    pub name: String,
    pub owner: GitHubAccount,
    pub clone_url: Option<String>,
    pub default_branch: Option<String>,
}

/// Branch tip of a pull request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubBranch {
    pub sha: Option<String>,
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
}

/// GitHub pull request (as appears in webhook payloads)
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    pub head: Option<GitHubBranch>,
    pub base: Option<GitHubBranch>,
}

/// Installation reference carried by app-delivered events
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRef {
    pub id: Option<u64>,
    pub account: Option<GitHubAccount>,
}

/// Repository entry in installation events
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRepo {
    pub full_name: String,
}

/// Pull request event payload
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: GitHubPullRequest,
    pub repository: GitHubRepo,
    pub installation: Option<InstallationRef>,
}

impl PullRequestEvent {
    pub fn installation_id(&self) -> Option<u64> {
        self.installation.as_ref().and_then(|i| i.id)
    }
}

/// Ping event payload, sent when a hook is created
#[derive(Debug, Clone, Deserialize)]
pub struct PingEvent {
    pub zen: Option<String>,
    pub hook_id: Option<i64>,
}

/// Installation event payload (`created`, `deleted`, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationEvent {
    pub action: String,
    pub installation: InstallationRef,
    #[serde(default)]
    pub repositories: Vec<InstallationRepo>,
}

/// Installation repositories event payload (`added`, `removed`)
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRepositoriesEvent {
    pub action: String,
    pub installation: InstallationRef,
    #[serde(default)]
    pub repositories_added: Vec<InstallationRepo>,
    #[serde(default)]
    pub repositories_removed: Vec<InstallationRepo>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl From<&GitHubRepo> for RepositoryRef {
    fn from(repo: &GitHubRepo) -> Self {
        let full_name = format!("{}/{}", repo.owner.login, repo.name);
        let clone_url = non_empty(&repo.clone_url)
            .unwrap_or_else(|| format!("https://github.com/{}.git", full_name));
        let default_branch = non_empty(&repo.default_branch).unwrap_or_else(|| "main".to_string());
        RepositoryRef {
            github_id: repo.id,
            owner_login: repo.owner.login.clone(),
            name: repo.name.clone(),
            full_name,
            clone_url,
            default_branch,
        }
    }
}

impl From<&GitHubPullRequest> for PullRequestRef {
    fn from(pr: &GitHubPullRequest) -> Self {
        let head = pr.head.clone().unwrap_or_default();
        let base = pr.base.clone().unwrap_or_default();
        PullRequestRef {
            number: pr.number,
            head_sha: non_empty(&head.sha),
            head_ref: non_empty(&head.ref_name),
            base_ref: non_empty(&base.ref_name),
        }
    }
}

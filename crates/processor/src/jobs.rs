//! Plan job construction
//!
//! Everything here is pure: the same inputs always produce the same job,
//! apart from the token carried by the credential.

use chrono::{DateTime, Utc};
use common::models::{
    InstallationCredential, PlanInstallation, PlanJob, PlanPullRequest, PlanRepo, PlanWork,
    PullRequestRef, RepositoryRef,
};
use common::Config;

/// Number of commit hex characters kept in a plan id
const SHA_PREFIX_LEN: usize = 7;

/// Job settings copied from configuration
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub tool_version: String,
    pub github_api_base_url: String,
}

impl From<&Config> for JobSettings {
    fn from(config: &Config) -> Self {
        Self {
            tool_version: config.tool_version.clone(),
            github_api_base_url: config.github_api_base_url.clone(),
        }
    }
}

/// Delivery metadata that ends up in the job
#[derive(Debug, Clone, Copy)]
pub struct DeliveryMeta<'a> {
    pub delivery_id: Option<&'a str>,
    pub received_at: DateTime<Utc>,
}

/// Idempotency key for a plan run: `pr-<number>-<sha prefix>`.
///
/// A missing sha yields `pr-<number>-`.
pub fn plan_id(pr_number: u64, head_sha: Option<&str>) -> String {
    let prefix: String = head_sha
        .unwrap_or_default()
        .chars()
        .take(SHA_PREFIX_LEN)
        .collect();
    format!("pr-{}-{}", pr_number, prefix)
}

/// Correlation key: the delivery id, or `<repo id>-<epoch millis>` without one
pub fn request_id(
    delivery_id: Option<&str>,
    repo_github_id: Option<i64>,
    received_at: DateTime<Utc>,
) -> String {
    match delivery_id.filter(|d| !d.is_empty()) {
        Some(id) => id.to_string(),
        None => format!(
            "{}-{}",
            repo_github_id.unwrap_or_default(),
            received_at.timestamp_millis()
        ),
    }
}

/// Assemble the work-order. The credential is consumed.
pub fn build_plan_job(
    repo: &RepositoryRef,
    pr: &PullRequestRef,
    credential: InstallationCredential,
    delivery: DeliveryMeta<'_>,
    settings: &JobSettings,
) -> PlanJob {
    let plan_id = plan_id(pr.number, pr.head_sha.as_deref());

    PlanJob {
        request_id: request_id(delivery.delivery_id, repo.github_id, delivery.received_at),
        plan_id: plan_id.clone(),
        repo: PlanRepo {
            full_name: repo.full_name.clone(),
            clone_url: repo.clone_url.clone(),
            default_branch: repo.default_branch.clone(),
        },
        pull_request: PlanPullRequest {
            number: pr.number,
            head_sha: pr.head_sha.clone(),
            head_ref: pr.head_ref.clone(),
            base_ref: pr.base_ref.clone(),
        },
        installation: PlanInstallation {
            id: credential.installation_id,
            token: credential.token,
        },
        work: PlanWork {
            dir: ".".to_string(),
            tool_version: settings.tool_version.clone(),
            plan_id,
        },
        github_api_base_url: settings.github_api_base_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn repo() -> RepositoryRef {
        RepositoryRef {
            github_id: Some(1296269),
            owner_login: "acme".to_string(),
            name: "widgets".to_string(),
            full_name: "acme/widgets".to_string(),
            clone_url: "https://github.com/acme/widgets.git".to_string(),
            default_branch: "main".to_string(),
        }
    }

    fn pr(head_sha: Option<&str>) -> PullRequestRef {
        PullRequestRef {
            number: 42,
            head_sha: head_sha.map(str::to_string),
            head_ref: Some("feature".to_string()),
            base_ref: Some("main".to_string()),
        }
    }

    fn credential(token: &str) -> InstallationCredential {
        InstallationCredential {
            installation_id: 99,
            token: token.to_string(),
            expires_at: None,
        }
    }

    fn settings() -> JobSettings {
        JobSettings {
            tool_version: "1.8.2".to_string(),
            github_api_base_url: "https://api.github.com".to_string(),
        }
    }

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_id_uses_sha_prefix() {
        assert_eq!(plan_id(42, Some("abcdef1234567")), "pr-42-abcdef1");
        assert_eq!(plan_id(42, Some("abcdef1234567")), plan_id(42, Some("abcdef1234567")));
    }

    #[test]
    fn test_plan_id_without_sha() {
        assert_eq!(plan_id(42, None), "pr-42-");
        assert_eq!(plan_id(42, Some("")), "pr-42-");
    }

    #[test]
    fn test_plan_id_short_sha() {
        assert_eq!(plan_id(5, Some("abc")), "pr-5-abc");
    }

    #[test]
    fn test_plan_id_differs_per_commit() {
        assert_ne!(plan_id(42, Some("abcdef1")), plan_id(42, Some("1234567")));
        assert_ne!(plan_id(42, Some("abcdef1")), plan_id(43, Some("abcdef1")));
    }

    #[test]
    fn test_request_id_prefers_delivery() {
        assert_eq!(request_id(Some("d-1"), Some(7), received_at()), "d-1");
    }

    #[test]
    fn test_request_id_fallback() {
        let at = received_at();
        assert_eq!(
            request_id(None, Some(7), at),
            format!("7-{}", at.timestamp_millis())
        );
        assert_eq!(
            request_id(Some(""), None, at),
            format!("0-{}", at.timestamp_millis())
        );
    }

    #[test]
    fn test_build_plan_job() {
        let meta = DeliveryMeta {
            delivery_id: Some("72d3162e-cc78-11e3-81ab-4c9367dc0958"),
            received_at: received_at(),
        };
        let job = build_plan_job(
            &repo(),
            &pr(Some("abcdef1234567")),
            credential("ghs_a"),
            meta,
            &settings(),
        );

        assert_eq!(job.request_id, "72d3162e-cc78-11e3-81ab-4c9367dc0958");
        assert_eq!(job.plan_id, "pr-42-abcdef1");
        assert_eq!(job.work.plan_id, job.plan_id);
        assert_eq!(job.work.dir, ".");
        assert_eq!(job.work.tool_version, "1.8.2");
        assert_eq!(job.repo.full_name, "acme/widgets");
        assert_eq!(job.pull_request.head_ref.as_deref(), Some("feature"));
        assert_eq!(job.installation.id, 99);
        assert_eq!(job.installation.token, "ghs_a");
        assert_eq!(job.github_api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_build_is_deterministic_except_token() {
        let meta = DeliveryMeta {
            delivery_id: Some("d-1"),
            received_at: received_at(),
        };
        let mut first =
            build_plan_job(&repo(), &pr(Some("abc")), credential("ghs_a"), meta, &settings());
        let second =
            build_plan_job(&repo(), &pr(Some("abc")), credential("ghs_b"), meta, &settings());

        assert_ne!(first.installation.token, second.installation.token);
        first.installation.token = second.installation.token.clone();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}

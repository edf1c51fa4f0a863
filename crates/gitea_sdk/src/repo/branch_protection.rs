use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::version::VERSION_1_12_0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchProtection {
    /// Superseded by `rule_name` on newer servers.
    pub branch_name: String,
    pub rule_name: String,
    pub enable_push: bool,
    pub enable_push_whitelist: bool,
    pub push_whitelist_usernames: Vec<String>,
    pub push_whitelist_teams: Vec<String>,
    pub push_whitelist_deploy_keys: bool,
    pub enable_merge_whitelist: bool,
    pub merge_whitelist_usernames: Vec<String>,
    pub merge_whitelist_teams: Vec<String>,
    pub enable_status_check: bool,
    pub status_check_contexts: Vec<String>,
    pub required_approvals: i64,
    pub enable_approvals_whitelist: bool,
    pub approvals_whitelist_username: Vec<String>,
    pub approvals_whitelist_teams: Vec<String>,
    pub block_on_rejected_reviews: bool,
    pub block_on_official_review_requests: bool,
    pub block_on_outdated_branch: bool,
    pub dismiss_stale_approvals: bool,
    pub require_signed_commits: bool,
    pub protected_file_patterns: String,
    pub unprotected_file_patterns: String,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBranchProtectionOption {
    pub branch_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_name: String,
    pub enable_push: bool,
    pub enable_push_whitelist: bool,
    pub push_whitelist_usernames: Vec<String>,
    pub push_whitelist_teams: Vec<String>,
    pub push_whitelist_deploy_keys: bool,
    pub enable_merge_whitelist: bool,
    pub merge_whitelist_usernames: Vec<String>,
    pub merge_whitelist_teams: Vec<String>,
    pub enable_status_check: bool,
    pub status_check_contexts: Vec<String>,
    pub required_approvals: i64,
    pub enable_approvals_whitelist: bool,
    pub approvals_whitelist_username: Vec<String>,
    pub approvals_whitelist_teams: Vec<String>,
    pub block_on_rejected_reviews: bool,
    pub block_on_official_review_requests: bool,
    pub block_on_outdated_branch: bool,
    pub dismiss_stale_approvals: bool,
    pub require_signed_commits: bool,
    pub protected_file_patterns: String,
    pub unprotected_file_patterns: String,
}

/// Fields left at `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBranchProtectionOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_push: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_push_whitelist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_whitelist_usernames: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_whitelist_teams: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_whitelist_deploy_keys: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_merge_whitelist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_whitelist_usernames: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_whitelist_teams: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_status_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_check_contexts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approvals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_approvals_whitelist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals_whitelist_username: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approvals_whitelist_teams: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_on_rejected_reviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_on_official_review_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_on_outdated_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_approvals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_signed_commits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected_file_patterns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unprotected_file_patterns: Option<String>,
}

impl Client {
    /// List the branch protections of a repository. Requires Gitea 1.12.
    pub async fn list_branch_protections(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<BranchProtection>> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_page(&api_path!("/repos/{}/{}/branch_protections", owner, repo), opt)
            .await
    }

    /// Get a branch protection by its rule name. Requires Gitea 1.12.
    pub async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<BranchProtection> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/branch_protections/{}", owner, repo, name))
            .await
    }

    /// Create a branch protection. Requires Gitea 1.12.
    pub async fn create_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateBranchProtectionOption,
    ) -> Result<BranchProtection> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.post_json(&api_path!("/repos/{}/{}/branch_protections", owner, repo), opt)
            .await
    }

    /// Edit a branch protection. Requires Gitea 1.12.
    pub async fn edit_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        opt: &EditBranchProtectionOption,
    ) -> Result<BranchProtection> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.patch_json(
            &api_path!("/repos/{}/{}/branch_protections/{}", owner, repo, name),
            opt,
        )
        .await
    }

    /// Delete a branch protection. Requires Gitea 1.12.
    pub async fn delete_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/branch_protections/{}", owner, repo, name),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GiteaError;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    #[tokio::test]
    async fn branch_protection_lifecycle() {
        let transport = MockTransport::new();
        let protection = serde_json::json!({
            "branch_name": "main",
            "rule_name": "main",
            "enable_push": true,
            "enable_push_whitelist": true,
            "push_whitelist_usernames": ["test01"],
            "required_approvals": 1,
            "created_at": "2024-01-01T00:00:00Z"
        });
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/branch_protections",
            201,
            protection.clone(),
        );
        let mut edited = protection.clone();
        edited["required_approvals"] = serde_json::json!(2);
        push_json(
            &transport,
            HttpMethod::Patch,
            "/repos/test01/repo/branch_protections/main",
            200,
            edited,
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/branch_protections?page=1&limit=10",
            200,
            serde_json::json!([protection]),
        );
        push_status(
            &transport,
            HttpMethod::Delete,
            "/repos/test01/repo/branch_protections/main",
            204,
        );
        let client = client_with_version(&transport, "1.12.0");

        let created = client
            .create_branch_protection(
                "test01",
                "repo",
                &CreateBranchProtectionOption {
                    branch_name: "main".to_string(),
                    enable_push: true,
                    enable_push_whitelist: true,
                    push_whitelist_usernames: vec!["test01".to_string()],
                    required_approvals: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.push_whitelist_usernames, vec!["test01"]);
        assert!(request_json(&transport, 0).get("rule_name").is_none());

        let edited = client
            .edit_branch_protection(
                "test01",
                "repo",
                "main",
                &EditBranchProtectionOption {
                    required_approvals: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.required_approvals, 2);
        assert_eq!(request_json(&transport, 1), serde_json::json!({"required_approvals": 2}));

        let list = client
            .list_branch_protections("test01", "repo", &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(list.len(), 1);
        client.delete_branch_protection("test01", "repo", "main").await.unwrap();
    }

    #[tokio::test]
    async fn branch_protection_needs_1_12() {
        let client = client_with_version(&MockTransport::new(), "1.11.8");
        assert!(matches!(
            client.get_branch_protection("o", "r", "main").await,
            Err(GiteaError::ServerTooOld { .. })
        ));
    }
}

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::version::VERSION_1_13_0;

use super::PayloadCommit;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub name: String,
    pub commit: Option<PayloadCommit>,
    pub protected: bool,
    pub required_approvals: i64,
    pub enable_status_check: bool,
    pub status_check_contexts: Vec<String>,
    pub user_can_push: bool,
    pub user_can_merge: bool,
    pub effective_branch_protection_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBranchOption {
    #[serde(rename = "new_branch_name")]
    pub branch_name: String,
    /// Branch to start from; the default branch when empty.
    #[serde(rename = "old_branch_name", skip_serializing_if = "String::is_empty", default)]
    pub old_branch_name: String,
}

impl CreateBranchOption {
    fn validate(&self) -> Result<()> {
        if self.branch_name.is_empty() {
            return Err(GiteaError::Validation("BranchName is empty".to_string()));
        }
        if self.branch_name.len() > 100 {
            return Err(GiteaError::Validation("BranchName to long".to_string()));
        }
        if self.old_branch_name.len() > 100 {
            return Err(GiteaError::Validation("OldBranchName to long".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// List the branches of a repository.
    pub async fn list_repo_branches(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Branch>> {
        self.get_page(&api_path!("/repos/{}/{}/branches", owner, repo), opt)
            .await
    }

    /// Get a branch.
    pub async fn get_repo_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<Branch> {
        self.get_json(&api_path!("/repos/{}/{}/branches/{}", owner, repo, branch))
            .await
    }

    /// Delete a branch. Returns whether the server removed it.
    pub async fn delete_repo_branch(&self, owner: &str, repo: &str, branch: &str) -> Result<bool> {
        let status = self
            .get_status_code(
                HttpMethod::Delete,
                &api_path!("/repos/{}/{}/branches/{}", owner, repo, branch),
            )
            .await?;
        Ok(status == 204)
    }

    /// Create a branch. Requires Gitea 1.13.
    pub async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateBranchOption,
    ) -> Result<Branch> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/branches", owner, repo), opt)
            .await
    }
}

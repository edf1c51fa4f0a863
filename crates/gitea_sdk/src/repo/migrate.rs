//! Importing repositories from other forges.

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result};
use crate::error::GiteaError;
use crate::version::VERSION_1_13_0;

use super::Repository;

/// Forge the migration reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitServiceType {
    /// Plain git remote; only the code is migrated.
    #[default]
    Git,
    Github,
    Gitea,
    Gitlab,
    Gogs,
    Onedev,
    Gitbucket,
    Codebase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateRepoOption {
    pub repo_name: String,
    /// Owner name; resolved to `uid` on servers older than 1.13.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repo_owner: String,
    /// Owner id; only used by servers older than 1.13.
    #[serde(rename = "uid", skip_serializing_if = "is_zero")]
    pub repo_owner_id: i64,
    pub clone_addr: String,
    pub service: GitServiceType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_token: String,
    pub mirror: bool,
    pub private: bool,
    pub description: String,
    pub wiki: bool,
    pub milestones: bool,
    pub labels: bool,
    pub issues: bool,
    pub pull_requests: bool,
    pub releases: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mirror_interval: String,
    pub lfs: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lfs_endpoint: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl MigrateRepoOption {
    pub fn validate(&self) -> Result<()> {
        if self.clone_addr.is_empty() {
            return Err(GiteaError::Validation("CloneAddr required".to_string()));
        }
        if self.repo_name.is_empty() {
            return Err(GiteaError::Validation("RepoName required".to_string()));
        }
        if self.repo_name.len() > 100 {
            return Err(GiteaError::Validation("RepoName to long".to_string()));
        }
        if self.description.len() > 255 {
            return Err(GiteaError::Validation("Description to long".to_string()));
        }
        if self.service == GitServiceType::Github && self.auth_token.is_empty() {
            return Err(GiteaError::Validation(
                "github requires token authentication".to_string(),
            ));
        }
        Ok(())
    }
}

impl Client {
    /// Migrate a remote repository.
    ///
    /// Servers older than 1.13 know neither `auth_token` nor `repo_owner`: the
    /// token is sent as `auth_username` and the owner is resolved to its id.
    pub async fn migrate_repo(&self, opt: &MigrateRepoOption) -> Result<Repository> {
        opt.validate()?;
        let mut opt = opt.clone();

        if !self.server_version_at_least(&VERSION_1_13_0).await? {
            tracing::warn!(
                url = %self.url(),
                "server older than 1.13, rewriting migrate options for the legacy API"
            );
            if !opt.auth_token.is_empty() {
                opt.auth_username = std::mem::take(&mut opt.auth_token);
                opt.auth_password.clear();
            }
            if !opt.repo_owner.is_empty() {
                opt.repo_owner_id = self.get_user_info(&opt.repo_owner).await?.id;
            } else if opt.repo_owner_id == 0 {
                opt.repo_owner_id = self.get_my_user_info().await?.id;
            }
        }

        self.post_json("/repos/migrate", &opt).await
    }
}

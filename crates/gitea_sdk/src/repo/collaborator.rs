use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::types::AccessMode;
use crate::user::User;
use crate::version::{VERSION_1_15_0, VERSION_1_16_0};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCollaboratorOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<AccessMode>,
}

impl AddCollaboratorOption {
    fn validate(&self) -> Result<()> {
        match self.permission {
            None | Some(AccessMode::Read | AccessMode::Write | AccessMode::Admin) => Ok(()),
            Some(other) => Err(GiteaError::Validation(format!(
                "permission mode invalid: {}",
                other.as_str()
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorPermission {
    pub permission: AccessMode,
    pub role_name: String,
    pub user: Option<User>,
}

impl Client {
    /// List the collaborators of a repository.
    pub async fn list_collaborators(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<User>> {
        self.get_page(&api_path!("/repos/{}/{}/collaborators", owner, repo), opt)
            .await
    }

    /// Whether `user` is a collaborator of the repository.
    pub async fn is_collaborator(&self, owner: &str, repo: &str, user: &str) -> Result<bool> {
        self.check_presence(
            &api_path!("/repos/{}/{}/collaborators/{}", owner, repo, user),
            204,
        )
        .await
    }

    /// Permission `user` has on the repository.
    pub async fn collaborator_permission(
        &self,
        owner: &str,
        repo: &str,
        user: &str,
    ) -> Result<CollaboratorPermission> {
        self.check_server_version_ge(&VERSION_1_16_0).await?;
        self.get_json(&api_path!(
            "/repos/{}/{}/collaborators/{}/permission",
            owner,
            repo,
            user
        ))
        .await
    }

    /// Add `user` as a collaborator.
    pub async fn add_collaborator(
        &self,
        owner: &str,
        repo: &str,
        user: &str,
        opt: &AddCollaboratorOption,
    ) -> Result<()> {
        opt.validate()?;
        self.request(
            HttpMethod::Put,
            api_path!("/repos/{}/{}/collaborators/{}", owner, repo, user),
        )
        .json(opt)?
        .send_empty()
        .await?;
        Ok(())
    }

    /// Remove `user` from the collaborators.
    pub async fn delete_collaborator(&self, owner: &str, repo: &str, user: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/collaborators/{}", owner, repo, user),
        )
        .await
    }

    /// Users that can be requested to review pull requests.
    pub async fn get_reviewers(&self, owner: &str, repo: &str) -> Result<Vec<User>> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/reviewers", owner, repo))
            .await
    }

    /// Users that can be assigned to issues.
    pub async fn get_assignees(&self, owner: &str, repo: &str) -> Result<Vec<User>> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/assignees", owner, repo))
            .await
    }
}

//! Site administration endpoints. All of them require an admin token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::org::{CreateOrgOption, Organization};
use crate::pagination::{ListOptions, Page};
use crate::repo::{CreateRepoOption, Repository};
use crate::user::{CreateKeyOption, PublicKey, User};
use crate::version::{VERSION_1_13_0, VERSION_1_14_0};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserOption {
    #[serde(default)]
    pub source_id: i64,
    #[serde(default)]
    pub login_name: String,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
    #[serde(default)]
    pub send_notify: bool,
}

impl CreateUserOption {
    fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(crate::GiteaError::Validation("username is empty".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(crate::GiteaError::Validation("email is empty".to_string()));
        }
        Ok(())
    }
}

/// Fields left at `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditUserOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    /// Required by the server even if unchanged.
    pub login_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_git_hook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_import_local: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_create_organization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prohibit_login: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_repo_creation: Option<i64>,
}

/// A scheduled server task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronTask {
    pub name: String,
    pub schedule: String,
    pub next: Option<DateTime<Utc>>,
    pub prev: Option<DateTime<Utc>>,
    pub exec_times: i64,
}

impl Client {
    /// List all users of the instance.
    pub async fn admin_list_users(&self, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page("/admin/users", opt).await
    }

    /// Create a user account.
    pub async fn admin_create_user(&self, opt: &CreateUserOption) -> Result<User> {
        opt.validate()?;
        self.post_json("/admin/users", opt).await
    }

    /// Edit the account of `user`.
    pub async fn admin_edit_user(&self, user: &str, opt: &EditUserOption) -> Result<()> {
        let path = api_path!("/admin/users/{}", user);
        self.request(HttpMethod::Patch, path)
            .json(opt)?
            .send_empty()
            .await?;
        Ok(())
    }

    /// Delete the account of `user`.
    pub async fn admin_delete_user(&self, user: &str) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/admin/users/{}", user))
            .await
    }

    /// Add a public key to the account of `user`.
    pub async fn admin_create_user_public_key(
        &self,
        user: &str,
        opt: &CreateKeyOption,
    ) -> Result<PublicKey> {
        self.post_json(&api_path!("/admin/users/{}/keys", user), opt)
            .await
    }

    /// List all organizations of the instance.
    pub async fn admin_list_orgs(&self, opt: &ListOptions) -> Result<Page<Organization>> {
        self.get_page("/admin/orgs", opt).await
    }

    /// Create an organization owned by `user`.
    pub async fn admin_create_org(
        &self,
        user: &str,
        opt: &CreateOrgOption,
    ) -> Result<Organization> {
        self.post_json(&api_path!("/admin/users/{}/orgs", user), opt)
            .await
    }

    /// Create a repository owned by `user`.
    pub async fn admin_create_repo(
        &self,
        user: &str,
        opt: &CreateRepoOption,
    ) -> Result<Repository> {
        self.post_json(&api_path!("/admin/users/{}/repos", user), opt)
            .await
    }

    /// Repositories present on disk but unknown to the database, as `owner/name`.
    pub async fn admin_list_unadopted_repositories(
        &self,
        opt: &ListOptions,
    ) -> Result<Page<String>> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.get_page("/admin/unadopted", opt).await
    }

    /// Adopt an unadopted repository into the database. Requires Gitea 1.14.
    pub async fn admin_adopt_repository(&self, owner: &str, repo: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.send_empty(
            HttpMethod::Post,
            &api_path!("/admin/unadopted/{}/{}", owner, repo),
        )
        .await
    }

    /// Delete the files of an unadopted repository. Requires Gitea 1.14.
    pub async fn admin_delete_unadopted_repository(&self, owner: &str, repo: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/admin/unadopted/{}/{}", owner, repo),
        )
        .await
    }

    /// List the cron tasks of the instance. Requires Gitea 1.13.
    pub async fn list_cron_tasks(&self, opt: &ListOptions) -> Result<Page<CronTask>> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.get_page("/admin/cron", opt).await
    }

    /// Run a cron task immediately. Requires Gitea 1.13.
    pub async fn run_cron_task(&self, task: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.send_empty(HttpMethod::Post, &api_path!("/admin/cron/{}", task))
            .await
    }
}

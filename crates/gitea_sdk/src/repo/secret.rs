use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::org::{CreateSecretOption, Secret};
use crate::pagination::{ListOptions, Page};

impl Client {
    /// List the action secrets of a repository; values are never returned.
    pub async fn list_repo_action_secrets(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Secret>> {
        self.get_page(&api_path!("/repos/{}/{}/actions/secrets", owner, repo), opt)
            .await
    }

    /// Create or replace a secret. Returns `true` when it was created.
    pub async fn create_repo_action_secret(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateSecretOption,
    ) -> Result<bool> {
        opt.validate()?;
        let path = api_path!("/repos/{}/{}/actions/secrets/{}", owner, repo, &opt.name);
        self.put_secret(path, opt).await
    }

    /// Delete an action secret of a repository.
    pub async fn delete_repo_action_secret(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/actions/secrets/{}", owner, repo, name),
        )
        .await
    }
}

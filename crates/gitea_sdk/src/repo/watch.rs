use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

use super::Repository;

impl Client {
    /// Repositories `user` watches.
    pub async fn get_watched_repos(
        &self,
        user: &str,
        opt: &ListOptions,
    ) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/users/{}/subscriptions", user), opt)
            .await
    }

    /// List the repositories the authenticated user watches.
    pub async fn get_my_watched_repos(&self, opt: &ListOptions) -> Result<Page<Repository>> {
        self.get_page("/user/subscriptions", opt).await
    }

    /// Whether the authenticated user watches the repository.
    pub async fn check_repo_watch(&self, owner: &str, repo: &str) -> Result<bool> {
        self.check_presence(&api_path!("/repos/{}/{}/subscription", owner, repo), 200)
            .await
    }

    /// Watch a repository.
    pub async fn watch_repo(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Put,
            &api_path!("/repos/{}/{}/subscription", owner, repo),
        )
        .await
    }

    /// Stop watching a repository.
    pub async fn unwatch_repo(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/subscription", owner, repo),
        )
        .await
    }
}

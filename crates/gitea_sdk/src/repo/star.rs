use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::user::User;

use super::Repository;

impl Client {
    /// Repositories starred by the authenticated user.
    pub async fn list_my_starred_repos(&self, opt: &ListOptions) -> Result<Page<Repository>> {
        self.get_page("/user/starred", opt).await
    }

    /// List the repositories `user` has starred.
    pub async fn list_user_starred_repos(
        &self,
        user: &str,
        opt: &ListOptions,
    ) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/users/{}/starred", user), opt).await
    }

    /// List the users who starred a repository.
    pub async fn list_repo_stargazers(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<User>> {
        self.get_page(&api_path!("/repos/{}/{}/stargazers", owner, repo), opt)
            .await
    }

    /// Whether the authenticated user has starred the repository.
    pub async fn is_repo_starring(&self, owner: &str, repo: &str) -> Result<bool> {
        self.check_presence(&api_path!("/user/starred/{}/{}", owner, repo), 204)
            .await
    }

    /// Star a repository.
    pub async fn star_repo(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(HttpMethod::Put, &api_path!("/user/starred/{}/{}", owner, repo))
            .await
    }

    /// Unstar a repository.
    pub async fn unstar_repo(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/user/starred/{}/{}", owner, repo),
        )
        .await
    }
}

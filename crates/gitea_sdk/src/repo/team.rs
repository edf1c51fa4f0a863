use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::org::Team;
use crate::version::VERSION_1_15_0;

impl Client {
    /// Teams with access to the repository.
    pub async fn get_repo_teams(&self, owner: &str, repo: &str) -> Result<Vec<Team>> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/teams", owner, repo))
            .await
    }

    /// Give a team access to the repository. Requires Gitea 1.15.
    pub async fn add_repo_team(&self, owner: &str, repo: &str, team: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.send_empty(
            HttpMethod::Put,
            &api_path!("/repos/{}/{}/teams/{}", owner, repo, team),
        )
        .await
    }

    /// Revoke the access of a team to the repository. Requires Gitea 1.15.
    pub async fn remove_repo_team(&self, owner: &str, repo: &str, team: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/teams/{}", owner, repo, team),
        )
        .await
    }

    /// The team when it is assigned to the repository, `None` otherwise.
    pub async fn check_repo_team(
        &self,
        owner: &str,
        repo: &str,
        team: &str,
    ) -> Result<Option<Team>> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        match self
            .get_json(&api_path!("/repos/{}/{}/teams/{}", owner, repo, team))
            .await
        {
            Ok(team) => Ok(Some(team)),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

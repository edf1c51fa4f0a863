use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::pagination::{ListOptions, Page};
use crate::version::VERSION_1_17_0;

use super::Repository;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateForkOption {
    /// Fork into this organization instead of the user's namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Name of the fork; needs 1.17 or newer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Client {
    /// List the forks of a repository.
    pub async fn list_forks(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/repos/{}/{}/forks", owner, repo), opt)
            .await
    }

    /// Fork a repository. Requires Gitea 1.17.
    pub async fn create_fork(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateForkOption,
    ) -> Result<Repository> {
        if opt.name.is_some() {
            self.check_server_version_ge(&VERSION_1_17_0).await?;
        }
        self.post_json(&api_path!("/repos/{}/{}/forks", owner, repo), opt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GiteaError;
    use crate::http::{HttpMethod, MockTransport};
    use crate::repo::tests::repo_json;
    use crate::test_support::{client_with_version, push_json, request_json};

    #[tokio::test]
    async fn create_fork_into_org() {
        let transport = MockTransport::new();
        let mut fork = repo_json(9, "org1", "repo");
        fork["fork"] = serde_json::json!(true);
        fork["parent"] = repo_json(5, "test01", "repo");
        push_json(&transport, HttpMethod::Post, "/repos/test01/repo/forks", 202, fork);
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/forks?page=1&limit=10",
            200,
            serde_json::json!([repo_json(9, "org1", "repo")]),
        );
        let client = client_with_version(&transport, "1.16.0");

        let created = client
            .create_fork(
                "test01",
                "repo",
                &CreateForkOption {
                    organization: Some("org1".to_string()),
                    name: None,
                },
            )
            .await
            .unwrap();
        assert!(created.fork);
        assert_eq!(created.parent.map(|p| p.full_name), Some("test01/repo".to_string()));
        assert_eq!(request_json(&transport, 0), serde_json::json!({"organization": "org1"}));

        let forks = client
            .list_forks("test01", "repo", &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(forks.len(), 1);
    }

    #[tokio::test]
    async fn fork_name_needs_1_17() {
        let client = client_with_version(&MockTransport::new(), "1.16.9");
        let opt = CreateForkOption {
            organization: None,
            name: Some("renamed".to_string()),
        };
        assert!(matches!(
            client.create_fork("o", "r", &opt).await,
            Err(GiteaError::ServerTooOld { .. })
        ));
    }
}

//! Ownership transfer and creating repositories from templates.

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::version::{VERSION_1_12_0, VERSION_1_13_0};

use super::Repository;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRepoOption {
    pub new_owner: String,
    /// Teams of the new owning organization that get access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateRepoFromTemplateOption {
    /// User or organization owning the new repository.
    pub owner: String,
    pub name: String,
    pub description: String,
    pub private: bool,
    /// Copy the default branch contents.
    pub git_content: bool,
    pub topics: bool,
    pub git_hooks: bool,
    pub webhooks: bool,
    pub avatar: bool,
    pub labels: bool,
    pub protected_branch: bool,
}

impl CreateRepoFromTemplateOption {
    fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(GiteaError::Validation("field Owner is required".to_string()));
        }
        if self.name.is_empty() {
            return Err(GiteaError::Validation("field Name is required".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// Transfer a repository to another owner. Requires Gitea 1.12.
    pub async fn transfer_repo(
        &self,
        owner: &str,
        repo: &str,
        opt: &TransferRepoOption,
    ) -> Result<Repository> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.post_json(&api_path!("/repos/{}/{}/transfer", owner, repo), opt)
            .await
    }

    /// Create a repository from the template `template_owner/template_repo`.
    pub async fn create_repo_from_template(
        &self,
        template_owner: &str,
        template_repo: &str,
        opt: &CreateRepoFromTemplateOption,
    ) -> Result<Repository> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        opt.validate()?;
        self.post_json(
            &api_path!("/repos/{}/{}/generate", template_owner, template_repo),
            opt,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, MockTransport};
    use crate::repo::tests::repo_json;
    use crate::test_support::{client_with_version, push_json, request_json};

    #[tokio::test]
    async fn transfer_to_org_with_teams() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/transfer",
            202,
            repo_json(5, "org1", "repo"),
        );
        let client = client_with_version(&transport, "1.12.0");

        let moved = client
            .transfer_repo(
                "test01",
                "repo",
                &TransferRepoOption {
                    new_owner: "org1".to_string(),
                    team_ids: Some(vec![4]),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.full_name, "org1/repo");
        assert_eq!(
            request_json(&transport, 0),
            serde_json::json!({"new_owner": "org1", "team_ids": [4]}),
        );
    }

    #[tokio::test]
    async fn create_from_template() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/template/generate",
            201,
            repo_json(6, "test01", "from-template"),
        );
        let client = client_with_version(&transport, "1.13.0");

        let opt = CreateRepoFromTemplateOption {
            owner: "test01".to_string(),
            name: "from-template".to_string(),
            git_content: true,
            topics: true,
            ..Default::default()
        };
        let repo = client
            .create_repo_from_template("test01", "template", &opt)
            .await
            .unwrap();
        assert_eq!(repo.name, "from-template");
        assert_eq!(request_json(&transport, 0)["git_content"], true);

        let missing = CreateRepoFromTemplateOption {
            owner: "test01".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            client.create_repo_from_template("test01", "template", &missing).await,
            Err(GiteaError::Validation(_))
        ));
    }
}

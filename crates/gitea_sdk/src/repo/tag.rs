use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::version::{VERSION_1_14_0, VERSION_1_15_0};

use super::{CommitMeta, CommitUser, PayloadCommitVerification};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub message: String,
    pub id: String,
    pub commit: Option<CommitMeta>,
    pub zipball_url: String,
    pub tarball_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatedTagObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub sha: String,
}

/// A tag object as stored in git.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatedTag {
    pub tag: String,
    pub sha: String,
    pub url: String,
    pub message: String,
    pub tagger: Option<CommitUser>,
    pub object: Option<AnnotatedTagObject>,
    pub verification: Option<PayloadCommitVerification>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTagOption {
    pub tag_name: String,
    /// Creates an annotated tag when not empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Commit, branch or tag to point at; the default branch when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
}

impl CreateTagOption {
    fn validate(&self) -> Result<()> {
        if self.tag_name.trim().is_empty() {
            return Err(GiteaError::Validation("TagName is required".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// List the tags of a repository.
    pub async fn list_repo_tags(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Tag>> {
        self.get_page(&api_path!("/repos/{}/{}/tags", owner, repo), opt)
            .await
    }

    /// Get a tag by name. Requires Gitea 1.15.
    pub async fn get_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Tag> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/tags/{}", owner, repo, tag))
            .await
    }

    /// Tag object by SHA (not by name).
    pub async fn get_annotated_tag(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<AnnotatedTag> {
        self.get_json(&api_path!("/repos/{}/{}/git/tags/{}", owner, repo, sha))
            .await
    }

    /// Create a tag. Requires Gitea 1.15.
    pub async fn create_tag(&self, owner: &str, repo: &str, opt: &CreateTagOption) -> Result<Tag> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/tags", owner, repo), opt)
            .await
    }

    /// Delete a tag. Requires Gitea 1.14.
    pub async fn delete_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/tags/{}", owner, repo, tag),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    #[tokio::test]
    async fn create_get_list_delete_tag() {
        let transport = MockTransport::new();
        let tag = serde_json::json!({
            "name": "v1.0",
            "message": "release v1.0",
            "id": "abcd",
            "commit": {"sha": "1234", "url": ""},
            "zipball_url": "https://gitea.test/test01/repo/archive/v1.0.zip"
        });
        push_json(&transport, HttpMethod::Post, "/repos/test01/repo/tags", 201, tag.clone());
        push_json(&transport, HttpMethod::Get, "/repos/test01/repo/tags/v1.0", 200, tag.clone());
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/tags?page=1&limit=10",
            200,
            serde_json::json!([tag]),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/git/tags/abcd",
            200,
            serde_json::json!({
                "tag": "v1.0",
                "sha": "abcd",
                "message": "release v1.0\n",
                "tagger": {
                    "name": "test01",
                    "email": "test01@gitea.io",
                    "date": "2024-01-01T00:00:00Z"
                },
                "object": {"type": "commit", "sha": "1234", "url": ""}
            }),
        );
        push_status(&transport, HttpMethod::Delete, "/repos/test01/repo/tags/v1.0", 204);
        let client = client_with_version(&transport, "1.15.0");

        let created = client
            .create_tag(
                "test01",
                "repo",
                &CreateTagOption {
                    tag_name: "v1.0".to_string(),
                    message: "release v1.0".to_string(),
                    target: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            request_json(&transport, 0),
            serde_json::json!({"tag_name": "v1.0", "message": "release v1.0"}),
        );
        assert_eq!(created, client.get_tag("test01", "repo", "v1.0").await.unwrap());
        assert_eq!(
            client.list_repo_tags("test01", "repo", &ListOptions::default()).await.unwrap().len(),
            1,
        );

        let annotated = client.get_annotated_tag("test01", "repo", &created.id).await.unwrap();
        assert_eq!(annotated.object.map(|o| o.kind), Some("commit".to_string()));
        client.delete_tag("test01", "repo", "v1.0").await.unwrap();
    }

    #[tokio::test]
    async fn tag_endpoints_are_version_gated() {
        let client = client_with_version(&MockTransport::new(), "1.13.0");
        assert!(matches!(
            client.delete_tag("o", "r", "v1").await,
            Err(GiteaError::ServerTooOld { .. })
        ));
        assert!(matches!(
            client.get_tag("o", "r", "v1").await,
            Err(GiteaError::ServerTooOld { .. })
        ));
    }
}

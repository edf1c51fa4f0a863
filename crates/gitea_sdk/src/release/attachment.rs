use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

/// A file attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: i64,
    pub name: String,
    pub size: i64,
    pub download_count: i64,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    pub uuid: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditAttachmentOptions {
    pub name: String,
}

impl Client {
    /// List the assets of a release.
    pub async fn list_release_attachments(
        &self,
        owner: &str,
        repo: &str,
        release: i64,
        opt: &ListOptions,
    ) -> Result<Page<Attachment>> {
        self.get_page(&api_path!("/repos/{}/{}/releases/{}/assets", owner, repo, release), opt)
            .await
    }

    /// Get a release asset.
    pub async fn get_release_attachment(
        &self,
        owner: &str,
        repo: &str,
        release: i64,
        id: i64,
    ) -> Result<Attachment> {
        self.get_json(&api_path!(
            "/repos/{}/{}/releases/{}/assets/{}",
            owner,
            repo,
            release,
            id
        ))
        .await
    }

    /// Rename an attachment.
    pub async fn edit_release_attachment(
        &self,
        owner: &str,
        repo: &str,
        release: i64,
        id: i64,
        opt: &EditAttachmentOptions,
    ) -> Result<Attachment> {
        if opt.name.trim().is_empty() {
            return Err(GiteaError::Validation("name is empty".to_string()));
        }
        self.patch_json(
            &api_path!("/repos/{}/{}/releases/{}/assets/{}", owner, repo, release, id),
            opt,
        )
        .await
    }

    /// Delete a release asset.
    pub async fn delete_release_attachment(
        &self,
        owner: &str,
        repo: &str,
        release: i64,
        id: i64,
    ) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/releases/{}/assets/{}", owner, repo, release, id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    fn attachment_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "size": 1024,
            "download_count": 3,
            "uuid": "9a3c",
            "browser_download_url": format!("https://gitea.test/attachments/9a3c/{name}")
        })
    }

    #[tokio::test]
    async fn attachment_operations() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/releases/2/assets?page=1&limit=10",
            200,
            serde_json::json!([attachment_json(5, "app.tar.gz")]),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/releases/2/assets/5",
            200,
            attachment_json(5, "app.tar.gz"),
        );
        push_json(
            &transport,
            HttpMethod::Patch,
            "/repos/test01/repo/releases/2/assets/5",
            201,
            attachment_json(5, "app-linux.tar.gz"),
        );
        push_status(&transport, HttpMethod::Delete, "/repos/test01/repo/releases/2/assets/5", 204);
        let client = client_with_version(&transport, "1.20.0");

        let listed = client
            .list_release_attachments("test01", "repo", 2, &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(listed.items[0].download_count, 3);
        let one = client.get_release_attachment("test01", "repo", 2, 5).await.unwrap();
        assert!(one.download_url.ends_with("/app.tar.gz"));

        let renamed = client
            .edit_release_attachment(
                "test01",
                "repo",
                2,
                5,
                &EditAttachmentOptions {
                    name: "app-linux.tar.gz".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "app-linux.tar.gz");
        assert_eq!(request_json(&transport, 2), serde_json::json!({"name": "app-linux.tar.gz"}));
        client.delete_release_attachment("test01", "repo", 2, 5).await.unwrap();
    }

    #[tokio::test]
    async fn rename_to_blank_is_rejected() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.20.0");
        let opt = EditAttachmentOptions::default();
        assert!(client.edit_release_attachment("o", "r", 1, 1, &opt).await.is_err());
    }
}

//! Releases and their attachments.

mod attachment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use attachment::{Attachment, EditAttachmentOptions};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::user::User;
use crate::version::{VERSION_1_13_0, VERSION_1_14_0};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    pub id: i64,
    pub tag_name: String,
    #[serde(rename = "target_commitish")]
    pub target: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "body")]
    pub note: String,
    pub url: String,
    pub html_url: String,
    #[serde(rename = "tarball_url")]
    pub tar_url: String,
    #[serde(rename = "zipball_url")]
    pub zip_url: String,
    #[serde(rename = "draft")]
    pub is_draft: bool,
    #[serde(rename = "prerelease")]
    pub is_prerelease: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "author")]
    pub publisher: Option<User>,
    #[serde(rename = "assets")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default)]
pub struct ListReleasesOptions {
    pub list: ListOptions,
    pub is_draft: Option<bool>,
    pub is_prerelease: Option<bool>,
}

impl PaginatedOptions for ListReleasesOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_opt("draft", self.is_draft)
            .push_opt("pre-release", self.is_prerelease);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReleaseOption {
    pub tag_name: String,
    /// Branch or commit the tag is created from when it does not exist yet.
    #[serde(rename = "target_commitish", default)]
    pub target: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "body", default)]
    pub note: String,
    #[serde(rename = "draft", default)]
    pub is_draft: bool,
    #[serde(rename = "prerelease", default)]
    pub is_prerelease: bool,
}

impl CreateReleaseOption {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReleaseOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(rename = "target_commitish", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "body", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "draft", skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(rename = "prerelease", skip_serializing_if = "Option::is_none")]
    pub is_prerelease: Option<bool>,
}

impl Client {
    /// List the releases of a repository.
    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListReleasesOptions,
    ) -> Result<Page<Release>> {
        self.get_page(&api_path!("/repos/{}/{}/releases", owner, repo), opt)
            .await
    }

    /// Get a release by id.
    pub async fn get_release(&self, owner: &str, repo: &str, id: i64) -> Result<Release> {
        self.get_json(&api_path!("/repos/{}/{}/releases/{}", owner, repo, id))
            .await
    }

    /// Get the release of a tag. Servers older than 1.13 have no lookup by
    /// tag, so the release list is scanned instead.
    pub async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release> {
        if self.server_version_at_least(&VERSION_1_13_0).await? {
            return self
                .get_json(&api_path!("/repos/{}/{}/releases/tags/{}", owner, repo, tag))
                .await;
        }

        tracing::warn!(
            owner,
            repo,
            tag,
            "server predates release lookup by tag, scanning releases",
        );
        let mut opt = ListReleasesOptions::default();
        opt.list.page = 1;
        loop {
            let page = self.list_releases(owner, repo, &opt).await?;
            let next = page.next_page();
            if page.is_empty() {
                break;
            }
            if let Some(found) = page.into_iter().find(|r| r.tag_name == tag) {
                return Ok(found);
            }
            match next {
                Some(next) if next > opt.list.page => opt.list.page = next,
                _ => break,
            }
        }
        Err(GiteaError::NotFound(format!(
            "release with tag '{tag}' not found"
        )))
    }

    /// Create a release.
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateReleaseOption,
    ) -> Result<Release> {
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/releases", owner, repo), opt)
            .await
    }

    /// Edit a release.
    pub async fn edit_release(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        opt: &EditReleaseOption,
    ) -> Result<Release> {
        self.patch_json(&api_path!("/repos/{}/{}/releases/{}", owner, repo, id), opt)
            .await
    }

    /// Delete a release; its tag is kept.
    pub async fn delete_release(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/releases/{}", owner, repo, id),
        )
        .await
    }

    /// Delete the release of a tag; the git tag itself stays.
    pub async fn delete_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/releases/tags/{}", owner, repo, tag),
        )
        .await
    }
}

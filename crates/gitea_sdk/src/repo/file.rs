//! Repository contents: raw files and the `/contents` API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path, escape_file_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::Query;
use crate::version::VERSION_1_14_0;

use super::{CommitMeta, CommitUser, PayloadCommitVerification};

/// Name and email used for author or committer of a file change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Settings shared by create, update and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOptions {
    /// Commit message; the server generates one when empty.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
    /// Base branch; the default branch when empty.
    #[serde(rename = "branch", skip_serializing_if = "String::is_empty", default)]
    pub branch_name: String,
    /// Commit to a new branch created from `branch_name`.
    #[serde(rename = "new_branch", skip_serializing_if = "String::is_empty", default)]
    pub new_branch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<CommitDates>,
    #[serde(default)]
    pub signoff: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDates {
    pub author: Option<DateTime<Utc>>,
    pub committer: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFileOptions {
    #[serde(flatten)]
    pub file: FileOptions,
    /// Base64 encoded content; see [`CreateFileOptions::with_content`].
    pub content: String,
}

impl CreateFileOptions {
    /// Options carrying `content`, base64 encoded.
    #[must_use]
    pub fn with_content(content: impl AsRef<[u8]>) -> Self {
        Self {
            file: FileOptions::default(),
            content: BASE64.encode(content),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileOptions {
    #[serde(flatten)]
    pub file: FileOptions,
    /// SHA of the blob being deleted.
    pub sha: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFileOptions {
    #[serde(flatten)]
    pub file: FileOptions,
    /// SHA of the blob being replaced.
    pub sha: String,
    /// Base64 encoded content.
    pub content: String,
    /// Move the file from this path.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub from_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLinks {
    #[serde(rename = "self")]
    pub this: String,
    pub git: String,
    pub html: String,
}

/// A file, directory, symlink or submodule entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentsResponse {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub last_commit_sha: String,
    /// `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type")]
    pub kind: String,
    pub size: i64,
    pub encoding: Option<String>,
    pub content: Option<String>,
    pub target: Option<String>,
    pub url: String,
    pub html_url: String,
    pub git_url: String,
    pub download_url: String,
    pub submodule_git_url: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<FileLinks>,
}

impl ContentsResponse {
    /// Decode `content` when the server sent it base64 encoded.
    pub fn decoded_content(&self) -> Result<Option<Vec<u8>>> {
        match (self.encoding.as_deref(), self.content.as_deref()) {
            (Some("base64"), Some(content)) => {
                let compact: String = content.split_whitespace().collect();
                BASE64
                    .decode(compact)
                    .map(Some)
                    .map_err(|e| GiteaError::Validation(format!("invalid base64 content: {e}")))
            }
            (_, Some(content)) => Ok(Some(content.as_bytes().to_vec())),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCommitResponse {
    pub url: String,
    pub sha: String,
    pub created: Option<DateTime<Utc>>,
    pub html_url: String,
    pub author: Option<CommitUser>,
    pub committer: Option<CommitUser>,
    pub parents: Vec<CommitMeta>,
    pub message: String,
    pub tree: Option<CommitMeta>,
}

/// Result of a create, update or delete. `content` is empty after a delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponse {
    pub content: Option<ContentsResponse>,
    pub commit: Option<FileCommitResponse>,
    pub verification: Option<PayloadCommitVerification>,
}

fn ref_query(git_ref: &str) -> Query {
    let mut query = Query::new();
    query.push_non_empty("ref", git_ref);
    query
}

fn contents_path(owner: &str, repo: &str, path: &str) -> Result<String> {
    Ok(format!(
        "{}/{}",
        api_path!("/repos/{}/{}/contents", owner, repo),
        escape_file_path(path)
    ))
}

impl Client {
    /// Raw bytes of `path` at `git_ref` (default branch when empty).
    pub async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<u8>> {
        let base = api_path!("/repos/{}/{}/raw", owner, repo);
        let file = escape_file_path(path);
        if !git_ref.is_empty() && !self.server_version_at_least(&VERSION_1_14_0).await? {
            let path = format!("{}/{}/{}", base, urlencoding::encode(git_ref), file);
            return self.get_bytes(&path, Query::new()).await;
        }
        self.get_bytes(&format!("{base}/{file}"), ref_query(git_ref))
            .await
    }

    /// Metadata and content of a single file.
    pub async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<ContentsResponse> {
        let (contents, _) = self
            .request(HttpMethod::Get, contents_path(owner, repo, path)?)
            .query(ref_query(git_ref))
            .send()
            .await?;
        Ok(contents)
    }

    /// Entries of a directory (without content).
    pub async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<ContentsResponse>> {
        let path = if path.trim_matches('/').is_empty() {
            api_path!("/repos/{}/{}/contents", owner, repo)
        } else {
            contents_path(owner, repo, path)?
        };
        let (entries, _) = self
            .request(HttpMethod::Get, path)
            .query(ref_query(git_ref))
            .send()
            .await?;
        Ok(entries)
    }

    /// Create a file with a new commit.
    pub async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        opt: &CreateFileOptions,
    ) -> Result<FileResponse> {
        self.post_json(&contents_path(owner, repo, path)?, opt).await
    }

    /// Update a file with a new commit.
    pub async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        opt: &UpdateFileOptions,
    ) -> Result<FileResponse> {
        if opt.sha.is_empty() {
            return Err(GiteaError::Validation("sha of the replaced file is required".to_string()));
        }
        self.put_json(&contents_path(owner, repo, path)?, opt).await
    }

    /// Delete a file with a new commit.
    pub async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        opt: &DeleteFileOptions,
    ) -> Result<()> {
        if opt.sha.is_empty() {
            return Err(GiteaError::Validation("sha of the deleted file is required".to_string()));
        }
        self.request(HttpMethod::Delete, contents_path(owner, repo, path)?)
            .json(opt)?
            .send_empty()
            .await?;
        Ok(())
    }
}

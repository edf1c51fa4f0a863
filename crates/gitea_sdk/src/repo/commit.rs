use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::user::User;
use crate::version::VERSION_1_16_0;

/// Minimal reference to a commit or tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitMeta {
    pub url: String,
    pub sha: String,
    pub created: Option<DateTime<Utc>>,
}

/// Author or committer as recorded in git.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitUser {
    pub name: String,
    pub email: String,
    /// RFC 3339 timestamp as stored in the commit.
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadUser {
    pub name: String,
    pub email: String,
    #[serde(rename = "username")]
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadCommitVerification {
    pub verified: bool,
    pub reason: String,
    pub signature: String,
    pub signer: Option<PayloadUser>,
    pub payload: String,
}

/// Commit as embedded in branches and webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadCommit {
    pub id: String,
    pub message: String,
    pub url: String,
    pub author: Option<PayloadUser>,
    pub committer: Option<PayloadUser>,
    pub verification: Option<PayloadCommitVerification>,
    pub timestamp: Option<DateTime<Utc>>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoCommit {
    pub url: String,
    pub author: Option<CommitUser>,
    pub committer: Option<CommitUser>,
    pub message: String,
    pub tree: Option<CommitMeta>,
    pub verification: Option<PayloadCommitVerification>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAffectedFile {
    pub filename: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStats {
    pub total: i64,
    pub additions: i64,
    pub deletions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub url: String,
    pub sha: String,
    pub created: Option<DateTime<Utc>>,
    pub html_url: String,
    pub commit: Option<RepoCommit>,
    pub author: Option<User>,
    pub committer: Option<User>,
    pub parents: Vec<CommitMeta>,
    pub files: Vec<CommitAffectedFile>,
    pub stats: Option<CommitStats>,
}

#[derive(Debug, Clone, Default)]
pub struct ListCommitOptions {
    pub list: ListOptions,
    /// Branch, tag or SHA to start listing from.
    pub sha: String,
    /// Only commits touching this path.
    pub path: String,
}

impl PaginatedOptions for ListCommitOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("sha", &self.sha)
            .push_non_empty("path", &self.path);
    }
}

impl Client {
    /// List the commits of a repository.
    pub async fn list_repo_commits(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListCommitOptions,
    ) -> Result<Page<Commit>> {
        self.get_page(&api_path!("/repos/{}/{}/commits", owner, repo), opt)
            .await
    }

    /// Get a commit by SHA or ref.
    pub async fn get_single_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<Commit> {
        self.get_json(&api_path!("/repos/{}/{}/git/commits/{}", owner, repo, sha))
            .await
    }

    /// Unified diff of a single commit.
    pub async fn get_commit_diff(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<u8>> {
        self.get_commit_raw(owner, repo, sha, "diff").await
    }

    /// `git format-patch` output of a single commit.
    pub async fn get_commit_patch(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<u8>> {
        self.get_commit_raw(owner, repo, sha, "patch").await
    }

    async fn get_commit_raw(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        kind: &str,
    ) -> Result<Vec<u8>> {
        self.check_server_version_ge(&VERSION_1_16_0).await?;
        let path = format!(
            "{}.{}",
            api_path!("/repos/{}/{}/git/commits/{}", owner, repo, sha),
            kind
        );
        self.get_bytes(&path, Query::new()).await
    }
}

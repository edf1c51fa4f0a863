//! Pull requests and their reviews.

mod review;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use review::{
    CreatePullReviewComment, CreatePullReviewOptions, PullReview, PullReviewComment,
    PullReviewRequestOptions, ReviewStateType, SubmitPullReviewOptions,
};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::issue::{Label, Milestone};
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::repo::{Commit, Repository};
use crate::types::StateType;
use crate::user::User;
use crate::version::{VERSION_1_11_5, VERSION_1_12_0, VERSION_1_13_0};

/// One side (base or head) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PRBranchInfo {
    #[serde(rename = "label")]
    pub name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
    pub repo_id: i64,
    #[serde(rename = "repo")]
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub id: i64,
    pub url: String,
    #[serde(rename = "number")]
    pub index: i64,
    #[serde(rename = "user")]
    pub poster: Option<User>,
    pub title: String,
    pub body: String,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub assignee: Option<User>,
    pub assignees: Vec<User>,
    pub state: StateType,
    pub is_locked: bool,
    pub comments: i64,
    pub html_url: String,
    pub diff_url: String,
    pub patch_url: String,
    pub mergeable: bool,
    #[serde(rename = "merged")]
    pub has_merged: bool,
    #[serde(rename = "merged_at")]
    pub merged: Option<DateTime<Utc>>,
    #[serde(rename = "merge_commit_sha")]
    pub merged_commit_id: Option<String>,
    pub merged_by: Option<User>,
    pub allow_maintainer_edit: bool,
    pub base: Option<PRBranchInfo>,
    pub head: Option<PRBranchInfo>,
    pub merge_base: String,
    #[serde(rename = "due_date")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "closed_at")]
    pub closed: Option<DateTime<Utc>>,
}

/// Sort orders accepted by [`Client::list_repo_pull_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestSort {
    Oldest,
    RecentUpdate,
    LeastUpdate,
    MostComment,
    LeastComment,
    Priority,
}

impl PullRequestSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PullRequestSort::Oldest => "oldest",
            PullRequestSort::RecentUpdate => "recentupdate",
            PullRequestSort::LeastUpdate => "leastupdate",
            PullRequestSort::MostComment => "mostcomment",
            PullRequestSort::LeastComment => "leastcomment",
            PullRequestSort::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListPullRequestsOptions {
    pub list: ListOptions,
    pub state: Option<StateType>,
    pub sort: Option<PullRequestSort>,
    /// Milestone id; `0` for any.
    pub milestone: i64,
}

impl PaginatedOptions for ListPullRequestsOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_opt("state", self.state.map(StateType::as_str))
            .push_opt("sort", self.sort.map(PullRequestSort::as_str));
        if self.milestone > 0 {
            query.push("milestone", self.milestone);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullRequestOption {
    /// Source branch, `owner:branch` for cross-repository requests.
    pub head: String,
    pub base: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub milestone: i64,
    #[serde(default)]
    pub labels: Vec<i64>,
    #[serde(rename = "due_date", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl CreatePullRequestOption {
    fn validate(&self) -> Result<()> {
        if self.head.is_empty() || self.base.is_empty() {
            return Err(GiteaError::Validation("head and base branch are required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

/// Fields left at `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPullRequestOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Retarget the pull request; needs 1.12.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateType>,
    #[serde(rename = "due_date", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub remove_deadline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_maintainer_edit: Option<bool>,
}

/// How a pull request gets merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStyle {
    #[default]
    Merge,
    Rebase,
    RebaseMerge,
    Squash,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePullRequestOption {
    #[serde(rename = "Do")]
    pub style: MergeStyle,
    #[serde(rename = "MergeCommitID", skip_serializing_if = "String::is_empty", default)]
    pub merge_commit_id: String,
    #[serde(rename = "MergeTitleField", skip_serializing_if = "String::is_empty", default)]
    pub title: String,
    #[serde(rename = "MergeMessageField", skip_serializing_if = "String::is_empty", default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_branch_after_merge: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub force_merge: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub head_commit_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub merge_when_checks_succeed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestDiffOptions {
    /// Include binary file changes.
    pub binary: bool,
}

impl Client {
    /// List the pull requests of a repository.
    pub async fn list_repo_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListPullRequestsOptions,
    ) -> Result<Page<PullRequest>> {
        self.get_page(&api_path!("/repos/{}/{}/pulls", owner, repo), opt)
            .await
    }

    /// Get a pull request by its index.
    pub async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<PullRequest> {
        self.get_json(&api_path!("/repos/{}/{}/pulls/{}", owner, repo, index))
            .await
    }

    /// Open a pull request.
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreatePullRequestOption,
    ) -> Result<PullRequest> {
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/pulls", owner, repo), opt)
            .await
    }

    /// Edit a pull request.
    pub async fn edit_pull_request(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &EditPullRequestOption,
    ) -> Result<PullRequest> {
        if let Some(title) = &opt.title
            && title.trim().is_empty()
        {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        if opt.base.is_some() {
            self.check_server_version_ge(&VERSION_1_12_0).await?;
        }
        self.patch_json(&api_path!("/repos/{}/{}/pulls/{}", owner, repo, index), opt)
            .await
    }

    /// Merge a pull request. Returns whether the server merged it; a request
    /// the server refuses (conflicts, failing checks) yields `Ok(false)`.
    pub async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &MergePullRequestOption,
    ) -> Result<bool> {
        if opt.style == MergeStyle::Squash {
            self.check_server_version_ge(&VERSION_1_11_5).await?;
        }
        let response = self
            .request(
                HttpMethod::Post,
                api_path!("/repos/{}/{}/pulls/{}/merge", owner, repo, index),
            )
            .json(opt)?
            .send_status()
            .await?;
        Ok(response.status == 200)
    }

    /// Whether a pull request has been merged.
    pub async fn is_pull_request_merged(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<bool> {
        self.check_presence(&api_path!("/repos/{}/{}/pulls/{}/merge", owner, repo, index), 204)
            .await
    }

    /// Unified diff of a pull request.
    pub async fn get_pull_request_diff(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: PullRequestDiffOptions,
    ) -> Result<Vec<u8>> {
        let mut query = Query::new();
        query.push("binary", opt.binary);
        self.get_pull_request_raw(owner, repo, index, "diff", query)
            .await
    }

    /// `git format-patch` output of a pull request.
    pub async fn get_pull_request_patch(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<u8>> {
        self.get_pull_request_raw(owner, repo, index, "patch", Query::new())
            .await
    }

    async fn get_pull_request_raw(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        kind: &str,
        query: Query,
    ) -> Result<Vec<u8>> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        let path = format!(
            "{}.{}",
            api_path!("/repos/{}/{}/pulls/{}", owner, repo, index),
            kind
        );
        self.get_bytes(&path, query).await
    }

    /// List the commits of a pull request.
    pub async fn list_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &ListOptions,
    ) -> Result<Page<Commit>> {
        self.get_page(&api_path!("/repos/{}/{}/pulls/{}/commits", owner, repo, index), opt)
            .await
    }
}

//! Commit statuses reported by CI systems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::repo::Repository;
use crate::user::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    #[default]
    Pending,
    Success,
    Error,
    Failure,
    Warning,
}

impl StatusState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Error => "error",
            StatusState::Failure => "failure",
            StatusState::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub id: i64,
    #[serde(rename = "status")]
    pub state: StatusState,
    pub target_url: String,
    pub description: String,
    pub url: String,
    pub context: String,
    pub creator: Option<User>,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
}

/// The overall state of a ref, derived from the latest status per context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedStatus {
    pub state: StatusState,
    pub sha: String,
    pub total_count: i64,
    pub statuses: Vec<Status>,
    pub repository: Option<Repository>,
    pub commit_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStatusOption {
    pub state: StatusState,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub description: String,
    /// Label that distinguishes this status from other systems' (e.g. `ci/build`).
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListStatusesOption {
    pub list: ListOptions,
    /// `oldest`, `recentupdate`, `leastupdate`, `leastindex` or `highestindex`.
    pub sort: String,
    pub state: Option<StatusState>,
}

impl PaginatedOptions for ListStatusesOption {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("sort", &self.sort)
            .push_opt("state", self.state.map(StatusState::as_str));
    }
}

impl Client {
    /// Report a status for a commit SHA.
    pub async fn create_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        opt: &CreateStatusOption,
    ) -> Result<Status> {
        self.post_json(&api_path!("/repos/{}/{}/statuses/{}", owner, repo, sha), opt)
            .await
    }

    /// Statuses of a ref (branch, tag or SHA), newest first.
    pub async fn list_statuses(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        opt: &ListStatusesOption,
    ) -> Result<Page<Status>> {
        self.get_page(
            &api_path!("/repos/{}/{}/commits/{}/statuses", owner, repo, git_ref),
            opt,
        )
        .await
    }

    /// Get the combined status of a ref.
    pub async fn get_combined_status(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<CombinedStatus> {
        self.get_json(&api_path!("/repos/{}/{}/commits/{}/status", owner, repo, git_ref))
            .await
    }
}

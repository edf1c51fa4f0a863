use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};

use super::Issue;

/// Time spent on an issue, in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedTime {
    pub id: i64,
    pub created: Option<DateTime<Utc>>,
    pub time: i64,
    pub user_id: i64,
    pub user_name: String,
    pub issue_id: i64,
    pub issue: Option<Issue>,
}

#[derive(Debug, Clone, Default)]
pub struct ListTrackedTimesOptions {
    pub list: ListOptions,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    /// Only times logged by this user (repository listings).
    pub user: String,
}

impl PaginatedOptions for ListTrackedTimesOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_time("since", self.since)
            .push_time("before", self.before)
            .push_non_empty("user", &self.user);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTimeOption {
    /// Seconds spent.
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Log the time for another user (admins only).
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub user_name: String,
}

impl AddTimeOption {
    fn validate(&self) -> Result<()> {
        if self.time <= 0 {
            return Err(GiteaError::Validation("no time to add".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// List the time tracked on a repository.
    pub async fn list_repo_tracked_times(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListTrackedTimesOptions,
    ) -> Result<Page<TrackedTime>> {
        self.get_page(&api_path!("/repos/{}/{}/times", owner, repo), opt)
            .await
    }

    /// Times logged by the authenticated user.
    pub async fn list_my_tracked_times(
        &self,
        opt: &ListTrackedTimesOptions,
    ) -> Result<Page<TrackedTime>> {
        self.get_page("/user/times", opt).await
    }

    /// List the time tracked on an issue.
    pub async fn list_issue_tracked_times(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &ListTrackedTimesOptions,
    ) -> Result<Page<TrackedTime>> {
        self.get_page(&api_path!("/repos/{}/{}/issues/{}/times", owner, repo, index), opt)
            .await
    }

    /// Track time on an issue.
    pub async fn add_time(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &AddTimeOption,
    ) -> Result<TrackedTime> {
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/issues/{}/times", owner, repo, index), opt)
            .await
    }

    /// Remove all time the authenticated user logged on an issue.
    pub async fn reset_issue_time(&self, owner: &str, repo: &str, index: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/{}/times", owner, repo, index),
        )
        .await
    }

    /// Delete one tracked time entry of an issue.
    pub async fn delete_time(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        time_id: i64,
    ) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/{}/times/{}", owner, repo, index, time_id),
        )
        .await
    }
}

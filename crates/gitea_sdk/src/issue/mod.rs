//! Issues plus their labels, milestones, comments and tracked time.

mod comment;
mod label;
mod milestone;
mod tracked_time;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use comment::{
    Comment, CreateIssueCommentOption, EditIssueCommentOption, ListIssueCommentOptions,
};
pub use label::{CreateLabelOption, EditLabelOption, IssueLabelsOption, Label};
pub use milestone::{
    CreateMilestoneOption, EditMilestoneOption, ListMilestoneOption, Milestone, MilestoneRef,
};
pub use tracked_time::{AddTimeOption, ListTrackedTimesOptions, TrackedTime};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::types::StateType;
use crate::user::User;

/// Pull request fields embedded in an issue that is a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestMeta {
    #[serde(rename = "merged")]
    pub has_merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Short repository reference carried by cross-repository issue listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryMeta {
    pub id: i64,
    pub name: String,
    pub owner: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: i64,
    pub url: String,
    pub html_url: String,
    /// Per-repository issue number.
    #[serde(rename = "number")]
    pub index: i64,
    #[serde(rename = "user")]
    pub poster: Option<User>,
    pub original_author: String,
    pub original_author_id: i64,
    pub title: String,
    pub body: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub assignees: Vec<User>,
    pub state: StateType,
    pub is_locked: bool,
    pub comments: i64,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "closed_at")]
    pub closed: Option<DateTime<Utc>>,
    #[serde(rename = "due_date")]
    pub deadline: Option<DateTime<Utc>>,
    pub pull_request: Option<PullRequestMeta>,
    pub repository: Option<RepositoryMeta>,
}

impl Issue {
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Restrict listings to issues or to pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Issue,
    Pull,
}

impl IssueType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::Issue => "issues",
            IssueType::Pull => "pulls",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListIssueOption {
    pub list: ListOptions,
    pub state: Option<StateType>,
    pub issue_type: Option<IssueType>,
    /// Label names; issues must carry all of them.
    pub labels: Vec<String>,
    /// Milestone names or ids.
    pub milestones: Vec<String>,
    pub keyword: String,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub created_by: String,
    pub assigned_by: String,
    pub mentioned_by: String,
    /// Only for [`Client::list_issues`]: restrict to this owner.
    pub owner: String,
    /// Only for [`Client::list_issues`]: restrict to repositories of this team.
    pub team: String,
}

impl PaginatedOptions for ListIssueOption {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_opt("state", self.state.map(StateType::as_str))
            .push_opt("type", self.issue_type.map(IssueType::as_str))
            .push_non_empty("labels", &self.labels.join(","))
            .push_non_empty("milestones", &self.milestones.join(","))
            .push_non_empty("q", &self.keyword)
            .push_time("since", self.since)
            .push_time("before", self.before)
            .push_non_empty("created_by", &self.created_by)
            .push_non_empty("assigned_by", &self.assigned_by)
            .push_non_empty("mentioned_by", &self.mentioned_by)
            .push_non_empty("owner", &self.owner)
            .push_non_empty("team", &self.team);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIssueOption {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "ref", default, skip_serializing_if = "String::is_empty")]
    pub git_ref: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(rename = "due_date", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Milestone id; `0` for none.
    #[serde(default)]
    pub milestone: i64,
    /// Label ids.
    #[serde(default)]
    pub labels: Vec<i64>,
    #[serde(default)]
    pub closed: bool,
}

impl CreateIssueOption {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

/// Fields left at `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditIssueOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateType>,
    #[serde(rename = "due_date", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub unset_due_date: bool,
}

impl EditIssueOption {
    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// Issues across every repository the user can see.
    pub async fn list_issues(&self, opt: &ListIssueOption) -> Result<Page<Issue>> {
        self.get_page("/repos/issues/search", opt).await
    }

    /// List the issues of a repository.
    pub async fn list_repo_issues(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListIssueOption,
    ) -> Result<Page<Issue>> {
        self.get_page(&api_path!("/repos/{}/{}/issues", owner, repo), opt)
            .await
    }

    /// Get an issue by its index.
    pub async fn get_issue(&self, owner: &str, repo: &str, index: i64) -> Result<Issue> {
        self.get_json(&api_path!("/repos/{}/{}/issues/{}", owner, repo, index))
            .await
    }

    /// Open an issue.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateIssueOption,
    ) -> Result<Issue> {
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/issues", owner, repo), opt)
            .await
    }

    /// Edit an issue.
    pub async fn edit_issue(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &EditIssueOption,
    ) -> Result<Issue> {
        opt.validate()?;
        self.patch_json(&api_path!("/repos/{}/{}/issues/{}", owner, repo, index), opt)
            .await
    }

    /// Delete an issue.
    pub async fn delete_issue(&self, owner: &str, repo: &str, index: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/{}", owner, repo, index),
        )
        .await
    }
}

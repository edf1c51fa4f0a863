use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::user::User;
use crate::version::VERSION_1_12_0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: i64,
    pub html_url: String,
    #[serde(rename = "pull_request_url")]
    pub pr_url: String,
    pub issue_url: String,
    #[serde(rename = "user")]
    pub poster: Option<User>,
    pub original_author: String,
    pub original_author_id: i64,
    pub body: String,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ListIssueCommentOptions {
    pub list: ListOptions,
    /// Only comments updated after this time.
    pub since: Option<DateTime<Utc>>,
    /// Only comments updated before this time.
    pub before: Option<DateTime<Utc>>,
}

impl PaginatedOptions for ListIssueCommentOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_time("since", self.since)
            .push_time("before", self.before);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIssueCommentOption {
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditIssueCommentOption {
    pub body: String,
}

fn validate_body(body: &str) -> Result<()> {
    if body.is_empty() {
        return Err(GiteaError::Validation("body is empty".to_string()));
    }
    Ok(())
}

impl Client {
    /// List the comments of an issue.
    pub async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &ListIssueCommentOptions,
    ) -> Result<Page<Comment>> {
        self.get_page(&api_path!("/repos/{}/{}/issues/{}/comments", owner, repo, index), opt)
            .await
    }

    /// Comments on every issue and pull request of a repository.
    pub async fn list_repo_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListIssueCommentOptions,
    ) -> Result<Page<Comment>> {
        self.get_page(&api_path!("/repos/{}/{}/issues/comments", owner, repo), opt)
            .await
    }

    /// Get a comment by id. Requires Gitea 1.12.
    pub async fn get_issue_comment(&self, owner: &str, repo: &str, id: i64) -> Result<Comment> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/issues/comments/{}", owner, repo, id))
            .await
    }

    /// Comment on an issue.
    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &CreateIssueCommentOption,
    ) -> Result<Comment> {
        validate_body(&opt.body)?;
        self.post_json(&api_path!("/repos/{}/{}/issues/{}/comments", owner, repo, index), opt)
            .await
    }

    /// Replace the body of a comment.
    pub async fn edit_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        opt: &EditIssueCommentOption,
    ) -> Result<Comment> {
        validate_body(&opt.body)?;
        self.patch_json(&api_path!("/repos/{}/{}/issues/comments/{}", owner, repo, id), opt)
            .await
    }

    /// Delete a comment.
    pub async fn delete_issue_comment(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/comments/{}", owner, repo, id),
        )
        .await
    }
}

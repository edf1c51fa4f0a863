//! Pull request reviews, available from 1.12.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::user::User;
use crate::version::{VERSION_1_12_0, VERSION_1_14_0};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStateType {
    Approved,
    Pending,
    Comment,
    RequestChanges,
    RequestReview,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullReview {
    pub id: i64,
    #[serde(rename = "user")]
    pub reviewer: Option<User>,
    pub state: ReviewStateType,
    pub body: String,
    pub commit_id: String,
    /// The review targets an outdated commit.
    pub stale: bool,
    /// Given by a user allowed to approve.
    pub official: bool,
    pub dismissed: bool,
    #[serde(rename = "comments_count")]
    pub code_comments_count: i64,
    #[serde(rename = "submitted_at")]
    pub submitted: Option<DateTime<Utc>>,
    pub html_url: String,
    #[serde(rename = "pull_request_url")]
    pub html_pull_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullReviewComment {
    pub id: i64,
    pub body: String,
    #[serde(rename = "user")]
    pub reviewer: Option<User>,
    #[serde(rename = "pull_request_review_id")]
    pub review_id: i64,
    pub resolver: Option<User>,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    pub path: String,
    pub commit_id: String,
    #[serde(rename = "original_commit_id")]
    pub orig_commit_id: String,
    pub diff_hunk: String,
    #[serde(rename = "position")]
    pub line_num: u64,
    #[serde(rename = "original_position")]
    pub old_line_num: u64,
    pub html_url: String,
    #[serde(rename = "pull_request_url")]
    pub html_pull_url: String,
}

/// A code comment attached to a new review.
///
/// Exactly one of `new_line_num` (a line of the new file) or `old_line_num`
/// (a line of the old file) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullReviewComment {
    pub path: String,
    pub body: String,
    #[serde(rename = "old_position")]
    pub old_line_num: i64,
    #[serde(rename = "new_position")]
    pub new_line_num: i64,
}

impl CreatePullReviewComment {
    fn validate(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            return Err(GiteaError::Validation("body is empty".to_string()));
        }
        match (self.new_line_num, self.old_line_num) {
            (0, 0) => Err(GiteaError::Validation("no line num is set".to_string())),
            (n, o) if n != 0 && o != 0 => Err(GiteaError::Validation(
                "old and new line num are set, cant identify the code comment position".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullReviewOptions {
    #[serde(rename = "event")]
    pub state: ReviewStateType,
    #[serde(default)]
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub commit_id: String,
    #[serde(default)]
    pub comments: Vec<CreatePullReviewComment>,
}

impl CreatePullReviewOptions {
    fn validate(&self) -> Result<()> {
        if self.state != ReviewStateType::Approved
            && self.body.trim().is_empty()
            && self.comments.is_empty()
        {
            return Err(GiteaError::Validation("body is empty".to_string()));
        }
        self.comments
            .iter()
            .try_for_each(CreatePullReviewComment::validate)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPullReviewOptions {
    #[serde(rename = "event")]
    pub state: ReviewStateType,
    #[serde(default)]
    pub body: String,
}

impl SubmitPullReviewOptions {
    fn validate(&self) -> Result<()> {
        if self.state != ReviewStateType::Approved && self.body.trim().is_empty() {
            return Err(GiteaError::Validation("body is empty".to_string()));
        }
        Ok(())
    }
}

/// Users and teams asked to review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullReviewRequestOptions {
    #[serde(default)]
    pub reviewers: Vec<String>,
    #[serde(default)]
    pub team_reviewers: Vec<String>,
}

impl Client {
    /// List the reviews of a pull request. Requires Gitea 1.12.
    pub async fn list_pull_reviews(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &ListOptions,
    ) -> Result<Page<PullReview>> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_page(&api_path!("/repos/{}/{}/pulls/{}/reviews", owner, repo, index), opt)
            .await
    }

    /// Get a review of a pull request. Requires Gitea 1.12.
    pub async fn get_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        id: i64,
    ) -> Result<PullReview> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_json(&api_path!("/repos/{}/{}/pulls/{}/reviews/{}", owner, repo, index, id))
            .await
    }

    /// List the code comments of a review. Requires Gitea 1.12.
    pub async fn list_pull_review_comments(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        id: i64,
    ) -> Result<Vec<PullReviewComment>> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_json(&api_path!(
            "/repos/{}/{}/pulls/{}/reviews/{}/comments",
            owner,
            repo,
            index,
            id
        ))
        .await
    }

    /// Delete a pending review, or any review as a repository admin.
    pub async fn delete_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        id: i64,
    ) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/pulls/{}/reviews/{}", owner, repo, index, id),
        )
        .await
    }

    /// Create a review, pending unless an event is set. Requires Gitea 1.12.
    pub async fn create_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &CreatePullReviewOptions,
    ) -> Result<PullReview> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/pulls/{}/reviews", owner, repo, index), opt)
            .await
    }

    /// Submit a pending review.
    pub async fn submit_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        id: i64,
        opt: &SubmitPullReviewOptions,
    ) -> Result<PullReview> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        opt.validate()?;
        self.post_json(
            &api_path!("/repos/{}/{}/pulls/{}/reviews/{}", owner, repo, index, id),
            opt,
        )
        .await
    }

    /// Request reviews from users or teams. Requires Gitea 1.14.
    pub async fn create_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &PullReviewRequestOptions,
    ) -> Result<Vec<PullReview>> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.post_json(
            &api_path!("/repos/{}/{}/pulls/{}/requested_reviewers", owner, repo, index),
            opt,
        )
        .await
    }

    /// Cancel review requests. Requires Gitea 1.14.
    pub async fn delete_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &PullReviewRequestOptions,
    ) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_14_0).await?;
        self.request(
            HttpMethod::Delete,
            api_path!("/repos/{}/{}/pulls/{}/requested_reviewers", owner, repo, index),
        )
        .json(opt)?
        .send_empty()
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    fn review_json(id: i64, state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "user": {"id": 2, "login": "reviewer"},
            "state": state,
            "body": "looks fine",
            "commit_id": "bbb",
            "comments_count": 1,
            "submitted_at": "2024-05-02T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn review_lifecycle() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/pulls/1/reviews",
            200,
            review_json(6, "PENDING"),
        );
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/pulls/1/reviews/6",
            200,
            review_json(6, "APPROVED"),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/pulls/1/reviews/6/comments",
            200,
            serde_json::json!([{
                "id": 1,
                "body": "typo",
                "path": "README.md",
                "position": 3,
                "pull_request_review_id": 6
            }]),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/pulls/1/reviews?page=1&limit=10",
            200,
            serde_json::json!([review_json(6, "APPROVED")]),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/pulls/1/reviews/6",
            200,
            review_json(6, "APPROVED"),
        );
        push_status(&transport, HttpMethod::Delete, "/repos/test01/repo/pulls/1/reviews/6", 204);
        let client = client_with_version(&transport, "1.20.0");

        let opt = CreatePullReviewOptions {
            state: ReviewStateType::Pending,
            comments: vec![CreatePullReviewComment {
                path: "README.md".to_string(),
                body: "typo".to_string(),
                new_line_num: 3,
                old_line_num: 0,
            }],
            ..Default::default()
        };
        let pending = client.create_pull_review("test01", "repo", 1, &opt).await.unwrap();
        assert_eq!(pending.state, ReviewStateType::Pending);
        assert_eq!(request_json(&transport, 0)["event"], "PENDING");
        assert_eq!(request_json(&transport, 0)["comments"][0]["new_position"], 3);

        let submitted = client
            .submit_pull_review(
                "test01",
                "repo",
                1,
                6,
                &SubmitPullReviewOptions {
                    state: ReviewStateType::Approved,
                    body: String::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(submitted.state, ReviewStateType::Approved);

        let comments = client.list_pull_review_comments("test01", "repo", 1, 6).await.unwrap();
        assert_eq!(comments[0].line_num, 3);
        let reviews = client
            .list_pull_reviews("test01", "repo", 1, &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(reviews.items[0].code_comments_count, 1);
        client.get_pull_review("test01", "repo", 1, 6).await.unwrap();
        client.delete_pull_review("test01", "repo", 1, 6).await.unwrap();
    }

    #[test]
    fn review_validation() {
        let empty = CreatePullReviewOptions {
            state: ReviewStateType::Comment,
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let approve = CreatePullReviewOptions {
            state: ReviewStateType::Approved,
            ..Default::default()
        };
        assert!(approve.validate().is_ok());

        let both_lines = CreatePullReviewOptions {
            state: ReviewStateType::Comment,
            comments: vec![CreatePullReviewComment {
                path: "a".to_string(),
                body: "b".to_string(),
                new_line_num: 1,
                old_line_num: 1,
            }],
            ..Default::default()
        };
        assert!(both_lines.validate().is_err());

        let request_changes = SubmitPullReviewOptions {
            state: ReviewStateType::RequestChanges,
            body: " ".to_string(),
        };
        assert!(request_changes.validate().is_err());
    }

    #[test]
    fn review_states_on_the_wire() {
        assert_eq!(
            serde_json::to_value(ReviewStateType::RequestChanges).unwrap(),
            "REQUEST_CHANGES",
        );
        let state: ReviewStateType = serde_json::from_value(serde_json::json!("")).unwrap();
        assert_eq!(state, ReviewStateType::Unknown);
    }

    #[tokio::test]
    async fn reviews_need_1_12() {
        let client = client_with_version(&MockTransport::new(), "1.11.8");
        assert!(matches!(
            client.list_pull_reviews("test01", "repo", 1, &ListOptions::default()).await,
            Err(GiteaError::ServerTooOld { .. })
        ));
    }

    #[tokio::test]
    async fn review_requests() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/pulls/1/requested_reviewers",
            201,
            serde_json::json!([review_json(7, "REQUEST_REVIEW")]),
        );
        push_status(
            &transport,
            HttpMethod::Delete,
            "/repos/test01/repo/pulls/1/requested_reviewers",
            204,
        );
        let client = client_with_version(&transport, "1.20.0");

        let opt = PullReviewRequestOptions {
            reviewers: vec!["reviewer".to_string()],
            ..Default::default()
        };
        let requested = client.create_review_requests("test01", "repo", 1, &opt).await.unwrap();
        assert_eq!(requested[0].state, ReviewStateType::RequestReview);
        client.delete_review_requests("test01", "repo", 1, &opt).await.unwrap();
        assert_eq!(request_json(&transport, 1)["reviewers"], serde_json::json!(["reviewer"]));
    }
}

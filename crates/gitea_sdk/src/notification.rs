//! Notification threads of the authenticated user.
//!
//! The whole API needs a 1.12.0 server; filtering or marking by status needs
//! 1.12.3.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::repo::Repository;

const NOTIFICATIONS_MIN: &str = ">=1.12.0";
const STATUS_FILTER_MIN: &str = ">=1.12.3";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationThread {
    pub id: i64,
    pub repository: Option<Repository>,
    pub subject: Option<NotificationSubject>,
    pub unread: bool,
    pub pinned: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSubject {
    pub title: String,
    pub url: String,
    pub html_url: String,
    pub latest_comment_url: String,
    #[serde(rename = "type")]
    pub kind: SubjectType,
    pub state: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectType {
    #[default]
    Issue,
    Pull,
    Commit,
    Repository,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyStatus {
    Unread,
    Read,
    Pinned,
}

impl NotifyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyStatus::Unread => "unread",
            NotifyStatus::Read => "read",
            NotifyStatus::Pinned => "pinned",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListNotificationOptions {
    pub list: ListOptions,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub status: Vec<NotifyStatus>,
    pub subject_types: Vec<SubjectType>,
}

impl PaginatedOptions for ListNotificationOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_time("since", self.since)
            .push_time("before", self.before)
            .push_all("status-types", &status_params(&self.status));
        let kinds: Vec<_> = self.subject_types.iter().copied().map(subject_type_param).collect();
        query.push_all("subject-type", &kinds);
    }
}

fn status_params(status: &[NotifyStatus]) -> Vec<&'static str> {
    status.iter().copied().map(NotifyStatus::as_str).collect()
}

fn subject_type_param(kind: SubjectType) -> &'static str {
    match kind {
        SubjectType::Issue => "issue",
        SubjectType::Pull => "pull",
        SubjectType::Commit => "commit",
        SubjectType::Repository => "repository",
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkNotificationOptions {
    /// Only threads updated before this instant; defaults to now on the server.
    pub last_read_at: Option<DateTime<Utc>>,
    /// Threads to mark; the server defaults to unread ones.
    pub status: Vec<NotifyStatus>,
    pub to_status: Option<NotifyStatus>,
}

impl MarkNotificationOptions {
    fn query(&self) -> Query {
        let mut query = Query::new();
        query
            .push_time("last_read_at", self.last_read_at)
            .push_all("status-types", &status_params(&self.status));
        query.push_opt("to-status", self.to_status.map(NotifyStatus::as_str));
        query
    }

    fn uses_status(&self) -> bool {
        !self.status.is_empty() || self.to_status.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct NewCount {
    #[serde(default)]
    new: i64,
}

/// Decode a body that older servers leave empty.
fn decode_or_default<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(GiteaError::Json)
}

impl Client {
    async fn check_notification_support(&self, with_status: bool) -> Result<()> {
        self.check_server_version_constraint(NOTIFICATIONS_MIN)
            .await?;
        if with_status {
            self.check_server_version_constraint(STATUS_FILTER_MIN)
                .await?;
        }
        Ok(())
    }

    /// Number of unread notifications.
    pub async fn check_notifications(&self) -> Result<i64> {
        self.check_notification_support(false).await?;
        let count: NewCount = self.get_json("/notifications/new").await?;
        Ok(count.new)
    }

    /// Get a notification thread.
    pub async fn get_notification(&self, id: i64) -> Result<NotificationThread> {
        self.check_notification_support(false).await?;
        self.get_json(&api_path!("/notifications/threads/{}", id))
            .await
    }

    /// Mark one thread, as read unless `status` says otherwise. Returns the
    /// updated thread when the server sends it back.
    pub async fn read_notification(
        &self,
        id: i64,
        status: Option<NotifyStatus>,
    ) -> Result<Option<NotificationThread>> {
        self.check_notification_support(status.is_some()).await?;
        let mut query = Query::new();
        query.push_opt("to-status", status.map(NotifyStatus::as_str));
        let (body, _) = self
            .request(HttpMethod::Patch, api_path!("/notifications/threads/{}", id))
            .query(query)
            .send_bytes()
            .await?;
        decode_or_default(&body)
    }

    /// List notification threads of the authenticated user.
    pub async fn list_notifications(
        &self,
        opt: &ListNotificationOptions,
    ) -> Result<Page<NotificationThread>> {
        self.check_notification_support(!opt.status.is_empty())
            .await?;
        self.get_page("/notifications", opt).await
    }

    /// Mark notifications across all repositories. Returns the changed
    /// threads, or nothing on servers that answer without a body.
    pub async fn read_notifications(
        &self,
        opt: &MarkNotificationOptions,
    ) -> Result<Vec<NotificationThread>> {
        self.check_notification_support(opt.uses_status()).await?;
        self.mark_notifications("/notifications".to_string(), opt)
            .await
    }

    /// List notification threads of one repository.
    pub async fn list_repo_notifications(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListNotificationOptions,
    ) -> Result<Page<NotificationThread>> {
        self.check_notification_support(!opt.status.is_empty())
            .await?;
        self.get_page(&api_path!("/repos/{}/{}/notifications", owner, repo), opt)
            .await
    }

    /// Mark the notifications of one repository.
    pub async fn read_repo_notifications(
        &self,
        owner: &str,
        repo: &str,
        opt: &MarkNotificationOptions,
    ) -> Result<Vec<NotificationThread>> {
        self.check_notification_support(opt.uses_status()).await?;
        self.mark_notifications(api_path!("/repos/{}/{}/notifications", owner, repo), opt)
            .await
    }

    async fn mark_notifications(
        &self,
        path: String,
        opt: &MarkNotificationOptions,
    ) -> Result<Vec<NotificationThread>> {
        let (body, _) = self
            .request(HttpMethod::Put, path)
            .query(opt.query())
            .send_bytes()
            .await?;
        decode_or_default(&body)
    }
}

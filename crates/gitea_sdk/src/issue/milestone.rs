//! Milestones, addressable by id or by title.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::types::StateType;
use crate::version::VERSION_1_13_0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: StateType,
    pub open_issues: i64,
    pub closed_issues: i64,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "closed_at")]
    pub closed: Option<DateTime<Utc>>,
    #[serde(rename = "due_on")]
    pub deadline: Option<DateTime<Utc>>,
}

/// A milestone given either by numeric id or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneRef {
    Id(i64),
    Name(String),
}

impl From<i64> for MilestoneRef {
    fn from(id: i64) -> Self {
        MilestoneRef::Id(id)
    }
}

impl From<&str> for MilestoneRef {
    fn from(name: &str) -> Self {
        MilestoneRef::Name(name.to_string())
    }
}

impl From<String> for MilestoneRef {
    fn from(name: String) -> Self {
        MilestoneRef::Name(name)
    }
}

impl fmt::Display for MilestoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneRef::Id(id) => write!(f, "{id}"),
            MilestoneRef::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListMilestoneOption {
    pub list: ListOptions,
    /// Defaults to open milestones on the server side.
    pub state: Option<StateType>,
    /// Exact title filter, honored by servers >= 1.13.
    pub name: String,
}

impl PaginatedOptions for ListMilestoneOption {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_opt("state", self.state.map(StateType::as_str))
            .push_non_empty("name", &self.name);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMilestoneOption {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub state: StateType,
    #[serde(rename = "due_on", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl CreateMilestoneOption {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMilestoneOption {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateType>,
    #[serde(rename = "due_on", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl EditMilestoneOption {
    fn validate(&self) -> Result<()> {
        if !self.title.is_empty() && self.title.trim().is_empty() {
            return Err(GiteaError::Validation("title is empty".to_string()));
        }
        Ok(())
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl Client {
    /// List the milestones of a repository.
    pub async fn list_repo_milestones(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListMilestoneOption,
    ) -> Result<Page<Milestone>> {
        self.get_page(&api_path!("/repos/{}/{}/milestones", owner, repo), opt)
            .await
    }

    /// Get a milestone by id, or by title (see [`Client::resolve_milestone_by_name`]).
    pub async fn get_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: impl Into<MilestoneRef>,
    ) -> Result<Milestone> {
        match milestone.into() {
            MilestoneRef::Id(id) => {
                self.get_json(&api_path!("/repos/{}/{}/milestones/{}", owner, repo, id))
                    .await
            }
            MilestoneRef::Name(name) => self.resolve_milestone_by_name(owner, repo, &name).await,
        }
    }

    /// Find a milestone by title, ignoring case and surrounding whitespace.
    ///
    /// Servers >= 1.13 filter by name; older ones ignore the filter, so every
    /// page of every state is scanned.
    pub async fn resolve_milestone_by_name(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<Milestone> {
        let filtered = self.server_version_at_least(&VERSION_1_13_0).await?;
        if !filtered {
            tracing::warn!(
                owner,
                repo,
                "server predates milestone name filter, scanning all milestones"
            );
        }

        let wanted = normalize_title(name);
        let mut opt = ListMilestoneOption {
            list: ListOptions::new(1, 0),
            state: Some(StateType::All),
            name: if filtered { name.to_string() } else { String::new() },
        };
        loop {
            let page = self.list_repo_milestones(owner, repo, &opt).await?;
            let next = page.next_page();
            if page.is_empty() {
                break;
            }
            if let Some(found) = page
                .into_iter()
                .find(|m| normalize_title(&m.title) == wanted)
            {
                return Ok(found);
            }
            match next {
                Some(next) if next > opt.list.page => opt.list.page = next,
                _ => break,
            }
        }
        Err(GiteaError::NotFound(format!(
            "milestone '{name}' does not exist"
        )))
    }

    async fn milestone_id(&self, owner: &str, repo: &str, milestone: MilestoneRef) -> Result<i64> {
        match milestone {
            MilestoneRef::Id(id) => Ok(id),
            MilestoneRef::Name(name) => {
                Ok(self.resolve_milestone_by_name(owner, repo, &name).await?.id)
            }
        }
    }

    /// Create a milestone. A closed milestone is closed with a follow-up edit
    /// when the server ignores the initial state.
    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateMilestoneOption,
    ) -> Result<Milestone> {
        opt.validate()?;
        let milestone: Milestone = self
            .post_json(&api_path!("/repos/{}/{}/milestones", owner, repo), opt)
            .await?;

        if opt.state == StateType::Closed && milestone.state != StateType::Closed {
            tracing::debug!(id = milestone.id, "closing milestone after create");
            let close = EditMilestoneOption {
                state: Some(StateType::Closed),
                ..Default::default()
            };
            return self
                .edit_milestone(owner, repo, milestone.id, &close)
                .await;
        }
        Ok(milestone)
    }

    /// Edit a milestone given by id or title.
    pub async fn edit_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: impl Into<MilestoneRef>,
        opt: &EditMilestoneOption,
    ) -> Result<Milestone> {
        opt.validate()?;
        let id = self.milestone_id(owner, repo, milestone.into()).await?;
        self.patch_json(&api_path!("/repos/{}/{}/milestones/{}", owner, repo, id), opt)
            .await
    }

    /// Delete a milestone given by id or title.
    pub async fn delete_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone: impl Into<MilestoneRef>,
    ) -> Result<()> {
        let id = self.milestone_id(owner, repo, milestone.into()).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/milestones/{}", owner, repo, id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport};
    use crate::test_support::{
        api, client_with_version, push_json, push_status, request_json, request_urls,
    };

    fn milestone_json(id: i64, title: &str, state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "description": "",
            "state": state,
            "open_issues": 0,
            "closed_issues": 0,
            "due_on": null
        })
    }

    #[tokio::test]
    async fn resolve_uses_name_filter_on_new_servers() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/milestones?page=1&limit=10&state=all&name=v1.0",
            200,
            serde_json::json!([milestone_json(7, "v1.0", "open")]),
        );
        let client = client_with_version(&transport, "1.13.0");

        let found = client
            .resolve_milestone_by_name("test01", "repo", "v1.0")
            .await
            .unwrap();
        assert_eq!(found.id, 7);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn resolve_scans_pages_on_old_servers() {
        let transport = MockTransport::new();
        let first: Vec<_> = (1..=10)
            .map(|i| milestone_json(i, &format!("m{i}"), "closed"))
            .collect();
        transport.push_response(
            HttpMethod::Get,
            api("/repos/test01/repo/milestones?page=1&limit=10&state=all"),
            HttpResponse::new(200, serde_json::to_vec(&first).unwrap())
                .with_header("x-total-count", "12"),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/milestones?page=2&limit=10&state=all",
            200,
            serde_json::json!([
                milestone_json(11, "m11", "open"),
                milestone_json(12, " Release 2 ", "open")
            ]),
        );
        let client = client_with_version(&transport, "1.12.0");

        let found = client
            .resolve_milestone_by_name("test01", "repo", "release 2")
            .await
            .unwrap();
        assert_eq!(found.id, 12);
        assert_eq!(request_urls(&transport).len(), 2);
    }

    #[tokio::test]
    async fn resolve_missing_milestone_is_not_found() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/milestones?page=1&limit=10&state=all&name=nope",
            200,
            serde_json::json!([]),
        );
        let client = client_with_version(&transport, "1.20.0");

        let err = client
            .resolve_milestone_by_name("test01", "repo", "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "milestone 'nope' does not exist");
    }

    #[tokio::test]
    async fn create_closed_milestone_follows_up_with_edit() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/repos/test01/repo/milestones",
            201,
            milestone_json(3, "done", "open"),
        );
        push_json(
            &transport,
            HttpMethod::Patch,
            "/repos/test01/repo/milestones/3",
            200,
            milestone_json(3, "done", "closed"),
        );
        let client = client_with_version(&transport, "1.12.0");

        let created = client
            .create_milestone(
                "test01",
                "repo",
                &CreateMilestoneOption {
                    title: "done".to_string(),
                    state: StateType::Closed,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.state, StateType::Closed);
        assert_eq!(request_json(&transport, 1), serde_json::json!({"state": "closed"}));
    }

    #[tokio::test]
    async fn edit_and_delete_by_name() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/milestones?page=1&limit=10&state=all&name=v2",
            200,
            serde_json::json!([milestone_json(9, "v2", "open")]),
        );
        push_json(
            &transport,
            HttpMethod::Patch,
            "/repos/test01/repo/milestones/9",
            200,
            milestone_json(9, "v2", "open"),
        );
        push_status(&transport, HttpMethod::Delete, "/repos/test01/repo/milestones/9", 204);
        let client = client_with_version(&transport, "1.20.0");

        let edit = EditMilestoneOption {
            description: Some("second".to_string()),
            ..Default::default()
        };
        client.edit_milestone("test01", "repo", "v2", &edit).await.unwrap();
        client.delete_milestone("test01", "repo", 9).await.unwrap();
        assert_eq!(request_json(&transport, 1), serde_json::json!({"description": "second"}));
    }

    #[tokio::test]
    async fn whitespace_titles_are_rejected() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.20.0");
        let create = CreateMilestoneOption {
            title: "  ".to_string(),
            ..Default::default()
        };
        assert!(client.create_milestone("o", "r", &create).await.is_err());
        let edit = EditMilestoneOption {
            title: " ".to_string(),
            ..Default::default()
        };
        assert!(client.edit_milestone("o", "r", 1, &edit).await.is_err());
        assert!(transport.requests().is_empty());
    }
}

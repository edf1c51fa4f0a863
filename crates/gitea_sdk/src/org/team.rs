use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path, into_page};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::repo::Repository;
use crate::types::AccessMode;
use crate::user::User;

use super::Organization;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub organization: Option<Organization>,
    pub includes_all_repositories: bool,
    pub permission: AccessMode,
    pub can_create_org_repo: bool,
    pub units: Vec<String>,
    pub units_map: HashMap<String, String>,
}

/// Repository units a team can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamUnit {
    #[serde(rename = "repo.code")]
    Code,
    #[serde(rename = "repo.issues")]
    Issues,
    #[serde(rename = "repo.ext_issues")]
    ExtIssues,
    #[serde(rename = "repo.wiki")]
    Wiki,
    #[serde(rename = "repo.pulls")]
    Pulls,
    #[serde(rename = "repo.releases")]
    Releases,
    #[serde(rename = "repo.projects")]
    Projects,
    #[serde(rename = "repo.ext_wiki")]
    ExtWiki,
    #[serde(rename = "repo.packages")]
    Packages,
    #[serde(rename = "repo.actions")]
    Actions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTeamOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permission: AccessMode,
    #[serde(default)]
    pub can_create_org_repo: bool,
    #[serde(default)]
    pub includes_all_repositories: bool,
    #[serde(default)]
    pub units: Vec<TeamUnit>,
}

impl CreateTeamOption {
    fn validate(&self) -> Result<()> {
        validate_team(&self.name, self.permission, self.description.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditTeamOption {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permission: AccessMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_create_org_repo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes_all_repositories: Option<bool>,
    #[serde(default)]
    pub units: Vec<TeamUnit>,
}

impl EditTeamOption {
    fn validate(&self) -> Result<()> {
        let description = self.description.as_deref().map_or(0, str::len);
        validate_team(&self.name, self.permission, description)
    }
}

fn validate_team(name: &str, permission: AccessMode, description_len: usize) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GiteaError::Validation("name required".to_string()));
    }
    if name.len() > 30 {
        return Err(GiteaError::Validation("name to long".to_string()));
    }
    if description_len > 255 {
        return Err(GiteaError::Validation("description to long".to_string()));
    }
    if !matches!(
        permission,
        AccessMode::Read | AccessMode::Write | AccessMode::Admin
    ) {
        return Err(GiteaError::Validation(format!(
            "permission mode invalid: {}",
            permission.as_str()
        )));
    }
    Ok(())
}

/// Options for [`Client::search_org_teams`].
#[derive(Debug, Clone, Default)]
pub struct SearchTeamsOptions {
    pub list: ListOptions,
    pub query: String,
    pub include_description: bool,
}

impl PaginatedOptions for SearchTeamsOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("q", &self.query)
            .push("include_desc", self.include_description);
    }
}

#[derive(Debug, Deserialize)]
struct TeamSearchResults {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: String,
    #[serde(default)]
    data: Vec<Team>,
}

impl Client {
    /// List the teams of an organization.
    pub async fn list_org_teams(&self, org: &str, opt: &ListOptions) -> Result<Page<Team>> {
        self.get_page(&api_path!("/orgs/{}/teams", org), opt).await
    }

    /// Teams of the authenticated user across all organizations.
    pub async fn list_my_teams(&self, opt: &ListOptions) -> Result<Page<Team>> {
        self.get_page("/user/teams", opt).await
    }

    /// Search the teams of an organization.
    pub async fn search_org_teams(
        &self,
        org: &str,
        opt: &SearchTeamsOptions,
    ) -> Result<Page<Team>> {
        let (list, query) = self.paged_query(opt);
        let (results, response) = self
            .request(HttpMethod::Get, api_path!("/orgs/{}/teams/search", org))
            .query(query)
            .send::<TeamSearchResults>()
            .await?;
        if !results.ok {
            return Err(GiteaError::Api {
                status: response.status,
                message: results.error,
            });
        }
        Ok(into_page(results.data, response, &list))
    }

    /// Get a team.
    pub async fn get_team(&self, id: i64) -> Result<Team> {
        self.get_json(&api_path!("/teams/{}", id)).await
    }

    /// Create a team in an organization.
    pub async fn create_team(&self, org: &str, opt: &CreateTeamOption) -> Result<Team> {
        opt.validate()?;
        self.post_json(&api_path!("/orgs/{}/teams", org), opt).await
    }

    /// Edit a team.
    pub async fn edit_team(&self, id: i64, opt: &EditTeamOption) -> Result<()> {
        opt.validate()?;
        self.request(HttpMethod::Patch, api_path!("/teams/{}", id))
            .json(opt)?
            .send_empty()
            .await?;
        Ok(())
    }

    /// Delete a team.
    pub async fn delete_team(&self, id: i64) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/teams/{}", id))
            .await
    }

    /// List the members of a team.
    pub async fn list_team_members(&self, id: i64, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page(&api_path!("/teams/{}/members", id), opt).await
    }

    /// Get a member of a team.
    pub async fn get_team_member(&self, id: i64, user: &str) -> Result<User> {
        self.get_json(&api_path!("/teams/{}/members/{}", id, user))
            .await
    }

    /// Add `user` to a team.
    pub async fn add_team_member(&self, id: i64, user: &str) -> Result<()> {
        self.send_empty(HttpMethod::Put, &api_path!("/teams/{}/members/{}", id, user))
            .await
    }

    /// Remove `user` from a team.
    pub async fn remove_team_member(&self, id: i64, user: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/teams/{}/members/{}", id, user),
        )
        .await
    }

    /// List the repositories of a team.
    pub async fn list_team_repositories(
        &self,
        id: i64,
        opt: &ListOptions,
    ) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/teams/{}/repos", id), opt).await
    }

    /// Give a team access to a repository.
    pub async fn add_team_repository(&self, id: i64, org: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Put,
            &api_path!("/teams/{}/repos/{}/{}", id, org, repo),
        )
        .await
    }

    /// Revoke the access of a team to a repository.
    pub async fn remove_team_repository(&self, id: i64, org: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/teams/{}/repos/{}/{}", id, org, repo),
        )
        .await
    }
}

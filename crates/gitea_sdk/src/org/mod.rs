//! Organizations, their members, teams and action secrets.

mod member;
mod secret;
mod team;

use serde::{Deserialize, Serialize};

pub use secret::{CreateSecretOption, Secret};
pub use team::{CreateTeamOption, EditTeamOption, Team, TeamUnit};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::types::VisibleType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: i64,
    /// Organization name (`username` on the wire).
    #[serde(rename = "username")]
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub description: String,
    pub website: String,
    pub location: String,
    pub visibility: VisibleType,
    pub repo_admin_change_team_access: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrgOption {
    #[serde(rename = "username")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub full_name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub website: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_admin_change_team_access: Option<bool>,
}

impl CreateOrgOption {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GiteaError::Validation("org name is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOrgOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibleType>,
}

impl Client {
    /// Organizations the authenticated user belongs to.
    pub async fn list_my_orgs(&self, opt: &ListOptions) -> Result<Page<Organization>> {
        self.get_page("/user/orgs", opt).await
    }

    /// List the organizations `user` belongs to.
    pub async fn list_user_orgs(
        &self,
        user: &str,
        opt: &ListOptions,
    ) -> Result<Page<Organization>> {
        self.get_page(&api_path!("/users/{}/orgs", user), opt).await
    }

    /// Get an organization.
    pub async fn get_org(&self, org: &str) -> Result<Organization> {
        self.get_json(&api_path!("/orgs/{}", org)).await
    }

    /// Create an organization.
    pub async fn create_org(&self, opt: &CreateOrgOption) -> Result<Organization> {
        opt.validate()?;
        self.post_json("/orgs", opt).await
    }

    /// Edit an organization.
    pub async fn edit_org(&self, org: &str, opt: &EditOrgOption) -> Result<()> {
        self.request(HttpMethod::Patch, api_path!("/orgs/{}", org))
            .json(opt)?
            .send_empty()
            .await?;
        Ok(())
    }

    /// Delete an organization.
    pub async fn delete_org(&self, org: &str) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/orgs/{}", org))
            .await
    }
}

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::version::VERSION_1_12_0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: i64,
    pub name: String,
    /// Hex color, e.g. `#00aabb`.
    pub color: String,
    pub description: String,
    /// Scoped labels exclude each other on an issue.
    pub exclusive: bool,
    pub is_archived: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLabelOption {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exclusive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLabelOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<bool>,
}

/// Label ids to attach to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabelsOption {
    pub labels: Vec<i64>,
}

/// Accepts `rrggbb` with or without a leading `#`.
fn validate_color(color: &str) -> Result<()> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(GiteaError::Validation(format!("invalid color format: {color}")))
    }
}

impl CreateLabelOption {
    fn validate(&self) -> Result<()> {
        validate_color(&self.color)?;
        if self.name.trim().is_empty() {
            return Err(GiteaError::Validation("empty name not allowed".to_string()));
        }
        Ok(())
    }
}

impl EditLabelOption {
    fn validate(&self) -> Result<()> {
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(GiteaError::Validation("empty name not allowed".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// List the labels of a repository.
    pub async fn list_repo_labels(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Label>> {
        self.get_page(&api_path!("/repos/{}/{}/labels", owner, repo), opt)
            .await
    }

    /// Get a repository label.
    pub async fn get_repo_label(&self, owner: &str, repo: &str, id: i64) -> Result<Label> {
        self.get_json(&api_path!("/repos/{}/{}/labels/{}", owner, repo, id))
            .await
    }

    /// Create a label. Servers before 1.12 require the `#` color prefix, which
    /// is added when missing.
    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateLabelOption,
    ) -> Result<Label> {
        opt.validate()?;
        let mut opt = opt.clone();
        if !opt.color.starts_with('#') && !self.server_version_at_least(&VERSION_1_12_0).await? {
            opt.color.insert(0, '#');
        }
        self.post_json(&api_path!("/repos/{}/{}/labels", owner, repo), &opt)
            .await
    }

    /// Edit a repository label.
    pub async fn edit_label(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        opt: &EditLabelOption,
    ) -> Result<Label> {
        opt.validate()?;
        self.patch_json(&api_path!("/repos/{}/{}/labels/{}", owner, repo, id), opt)
            .await
    }

    /// Delete a repository label.
    pub async fn delete_label(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/labels/{}", owner, repo, id),
        )
        .await
    }

    /// List the labels attached to an issue.
    pub async fn get_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &ListOptions,
    ) -> Result<Page<Label>> {
        self.get_page(&api_path!("/repos/{}/{}/issues/{}/labels", owner, repo, index), opt)
            .await
    }

    /// Add labels to an issue; returns the issue's labels afterwards.
    pub async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &IssueLabelsOption,
    ) -> Result<Vec<Label>> {
        self.post_json(&api_path!("/repos/{}/{}/issues/{}/labels", owner, repo, index), opt)
            .await
    }

    /// Replace all labels of an issue.
    pub async fn replace_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        opt: &IssueLabelsOption,
    ) -> Result<Vec<Label>> {
        self.put_json(&api_path!("/repos/{}/{}/issues/{}/labels", owner, repo, index), opt)
            .await
    }

    /// Detach one label from an issue.
    pub async fn delete_issue_label(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        label: i64,
    ) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/{}/labels/{}", owner, repo, index, label),
        )
        .await
    }

    /// Detach every label from an issue.
    pub async fn clear_issue_labels(&self, owner: &str, repo: &str, index: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/issues/{}/labels", owner, repo, index),
        )
        .await
    }
}

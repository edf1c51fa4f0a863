//! Organization and repository webhooks, plus verification of delivered
//! payloads.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

/// Header carrying the hex HMAC-SHA256 of a delivered payload.
pub const SIGNATURE_HEADER: &str = "X-Gitea-Signature";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hook {
    pub id: i64,
    /// `gitea`, `gogs`, `slack`, `discord`, `dingtalk`, `telegram`, `msteams`,
    /// `feishu`, `matrix`, `wechatwork` or `packagist`.
    #[serde(rename = "type")]
    pub kind: String,
    pub branch_filter: String,
    /// Transport settings; at least `url` and `content_type`.
    pub config: HashMap<String, String>,
    pub events: Vec<String>,
    pub authorization_header: String,
    pub active: bool,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHookOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: HashMap<String, String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub branch_filter: String,
    #[serde(default)]
    pub active: bool,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub authorization_header: String,
}

impl CreateHookOption {
    fn validate(&self) -> Result<()> {
        if self.kind.is_empty() {
            return Err(GiteaError::Validation("hook type needed".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHookOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_header: Option<String>,
}

/// Check a payload against the signature Gitea sent in [`SIGNATURE_HEADER`].
///
/// The comparison runs in constant time. A signature that is not valid hex
/// never verifies.
#[must_use]
pub fn verify_webhook_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

impl Client {
    /// List the webhooks of an organization.
    pub async fn list_org_hooks(&self, org: &str, opt: &ListOptions) -> Result<Page<Hook>> {
        self.get_page(&api_path!("/orgs/{}/hooks", org), opt).await
    }

    /// List the webhooks of a repository.
    pub async fn list_repo_hooks(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<Hook>> {
        self.get_page(&api_path!("/repos/{}/{}/hooks", owner, repo), opt)
            .await
    }

    /// Get an organization webhook.
    pub async fn get_org_hook(&self, org: &str, id: i64) -> Result<Hook> {
        self.get_json(&api_path!("/orgs/{}/hooks/{}", org, id)).await
    }

    /// Get a repository webhook.
    pub async fn get_repo_hook(&self, owner: &str, repo: &str, id: i64) -> Result<Hook> {
        self.get_json(&api_path!("/repos/{}/{}/hooks/{}", owner, repo, id))
            .await
    }

    /// Create a webhook on an organization.
    pub async fn create_org_hook(&self, org: &str, opt: &CreateHookOption) -> Result<Hook> {
        opt.validate()?;
        self.post_json(&api_path!("/orgs/{}/hooks", org), opt).await
    }

    /// Create a webhook on a repository.
    pub async fn create_repo_hook(
        &self,
        owner: &str,
        repo: &str,
        opt: &CreateHookOption,
    ) -> Result<Hook> {
        opt.validate()?;
        self.post_json(&api_path!("/repos/{}/{}/hooks", owner, repo), opt)
            .await
    }

    /// Edit an organization webhook.
    pub async fn edit_org_hook(&self, org: &str, id: i64, opt: &EditHookOption) -> Result<()> {
        self.request(HttpMethod::Patch, api_path!("/orgs/{}/hooks/{}", org, id))
            .json(opt)?
            .send_empty()
            .await?;
        Ok(())
    }

    /// Edit a repository webhook.
    pub async fn edit_repo_hook(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        opt: &EditHookOption,
    ) -> Result<()> {
        self.request(
            HttpMethod::Patch,
            api_path!("/repos/{}/{}/hooks/{}", owner, repo, id),
        )
        .json(opt)?
        .send_empty()
        .await?;
        Ok(())
    }

    /// Delete an organization webhook.
    pub async fn delete_org_hook(&self, org: &str, id: i64) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/orgs/{}/hooks/{}", org, id))
            .await
    }

    /// Delete a repository webhook.
    pub async fn delete_repo_hook(&self, owner: &str, repo: &str, id: i64) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/hooks/{}", owner, repo, id),
        )
        .await
    }
}

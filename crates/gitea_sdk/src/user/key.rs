use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

use super::User;

/// An SSH key used to push to repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicKey {
    pub id: i64,
    pub key: String,
    pub url: String,
    pub title: String,
    pub fingerprint: String,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "user")]
    pub owner: Option<User>,
    pub read_only: bool,
    pub key_type: String,
}

/// Options for creating a public key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateKeyOption {
    pub title: String,
    pub key: String,
    /// Deploy keys only: restrict to pull access.
    pub read_only: bool,
}

impl Client {
    /// List the public keys of `user`.
    pub async fn list_public_keys(&self, user: &str, opt: &ListOptions) -> Result<Page<PublicKey>> {
        self.get_page(&api_path!("/users/{}/keys", user), opt).await
    }

    /// List the public keys of the authenticated user.
    pub async fn list_my_public_keys(&self, opt: &ListOptions) -> Result<Page<PublicKey>> {
        self.get_page("/user/keys", opt).await
    }

    /// Get a public key of the authenticated user.
    pub async fn get_public_key(&self, key_id: i64) -> Result<PublicKey> {
        self.get_json(&format!("/user/keys/{}", key_id)).await
    }

    /// Add a public key to the authenticated user.
    pub async fn create_public_key(&self, opt: &CreateKeyOption) -> Result<PublicKey> {
        self.post_json("/user/keys", opt).await
    }

    /// Delete a public key of the authenticated user.
    pub async fn delete_public_key(&self, key_id: i64) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &format!("/user/keys/{}", key_id))
            .await
    }
}

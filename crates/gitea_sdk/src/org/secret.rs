//! Action secrets. Values are write-only; listing returns names only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    pub name: String,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSecretOption {
    #[serde(skip)]
    pub name: String,
    pub data: String,
}

impl CreateSecretOption {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(GiteaError::Validation("secret name is empty".to_string()));
        }
        if self.data.is_empty() {
            return Err(GiteaError::Validation("secret data is empty".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// List the action secrets of an organization; values are never returned.
    pub async fn list_org_action_secrets(
        &self,
        org: &str,
        opt: &ListOptions,
    ) -> Result<Page<Secret>> {
        self.get_page(&api_path!("/orgs/{}/actions/secrets", org), opt)
            .await
    }

    /// Create or replace a secret. Returns `true` when it was created.
    pub async fn create_org_action_secret(
        &self,
        org: &str,
        opt: &CreateSecretOption,
    ) -> Result<bool> {
        opt.validate()?;
        let path = api_path!("/orgs/{}/actions/secrets/{}", org, &opt.name);
        self.put_secret(path, opt).await
    }

    pub(crate) async fn put_secret(&self, path: String, opt: &CreateSecretOption) -> Result<bool> {
        let response = self
            .request(HttpMethod::Put, path)
            .json(opt)?
            .send_empty()
            .await?;
        match response.status {
            201 => Ok(true),
            204 => Ok(false),
            other => Err(GiteaError::UnexpectedStatus(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    #[tokio::test]
    async fn create_then_update_org_secret() {
        let transport = MockTransport::new();
        push_status(&transport, HttpMethod::Put, "/orgs/ActionOrg/actions/secrets/test", 201);
        push_status(&transport, HttpMethod::Put, "/orgs/ActionOrg/actions/secrets/test", 204);
        push_json(
            &transport,
            HttpMethod::Get,
            "/orgs/ActionOrg/actions/secrets?page=1&limit=10",
            200,
            serde_json::json!([{"name": "TEST", "created_at": "2024-02-01T00:00:00Z"}]),
        );
        let client = client_with_version(&transport, "1.20.0");

        let mut opt = CreateSecretOption {
            name: "test".to_string(),
            data: "test".to_string(),
        };
        assert!(client.create_org_action_secret("ActionOrg", &opt).await.unwrap());
        assert_eq!(request_json(&transport, 0), serde_json::json!({"data": "test"}));

        opt.data = "test2".to_string();
        assert!(!client.create_org_action_secret("ActionOrg", &opt).await.unwrap());

        let secrets = client
            .list_org_action_secrets("ActionOrg", &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets.items[0].name, "TEST");
    }

    #[tokio::test]
    async fn secret_put_rejects_other_success_codes() {
        let transport = MockTransport::new();
        push_status(&transport, HttpMethod::Put, "/orgs/o/actions/secrets/s", 200);
        let client = client_with_version(&transport, "1.20.0");
        let opt = CreateSecretOption {
            name: "s".to_string(),
            data: "d".to_string(),
        };
        assert!(matches!(
            client.create_org_action_secret("o", &opt).await,
            Err(GiteaError::UnexpectedStatus(200))
        ));
    }

    #[tokio::test]
    async fn secret_requires_data() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.20.0");
        let opt = CreateSecretOption {
            name: "s".to_string(),
            data: String::new(),
        };
        assert!(matches!(
            client.create_org_action_secret("o", &opt).await,
            Err(GiteaError::Validation(_))
        ));
    }
}

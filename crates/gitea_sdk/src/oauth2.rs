//! OAuth2 applications of the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::version::VERSION_1_12_0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oauth2 {
    pub id: i64,
    pub name: String,
    pub client_id: String,
    /// Only returned on create and update.
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
    pub confidential_client: bool,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOauth2Option {
    pub name: String,
    pub confidential_client: bool,
    pub redirect_uris: Vec<String>,
}

impl Default for CreateOauth2Option {
    fn default() -> Self {
        Self {
            name: String::new(),
            confidential_client: true,
            redirect_uris: Vec::new(),
        }
    }
}

impl CreateOauth2Option {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GiteaError::Validation("name is empty".to_string()));
        }
        Ok(())
    }
}

impl Client {
    /// Register an OAuth2 application. Requires Gitea 1.12.
    pub async fn create_oauth2(&self, opt: &CreateOauth2Option) -> Result<Oauth2> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        opt.validate()?;
        self.post_json("/user/applications/oauth2", opt).await
    }

    /// List the OAuth2 applications of the authenticated user. Requires Gitea 1.12.
    pub async fn list_oauth2(&self, opt: &ListOptions) -> Result<Page<Oauth2>> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_page("/user/applications/oauth2", opt).await
    }

    /// Get an OAuth2 application. Requires Gitea 1.12.
    pub async fn get_oauth2(&self, id: i64) -> Result<Oauth2> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.get_json(&api_path!("/user/applications/oauth2/{}", id))
            .await
    }

    /// Replace name, redirect URIs and confidentiality; regenerates the secret.
    pub async fn update_oauth2(&self, id: i64, opt: &CreateOauth2Option) -> Result<Oauth2> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        opt.validate()?;
        self.patch_json(&api_path!("/user/applications/oauth2/{}", id), opt)
            .await
    }

    /// Delete an OAuth2 application. Requires Gitea 1.12.
    pub async fn delete_oauth2(&self, id: i64) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_12_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/user/applications/oauth2/{}", id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    fn app_json(uri: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 3,
            "name": "test",
            "client_id": "c1d2",
            "client_secret": "s3cr3t",
            "redirect_uris": [uri],
            "confidential_client": true,
            "created": "2024-01-10T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn oauth2_application_lifecycle() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/user/applications/oauth2",
            201,
            app_json("http://test/test"),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/user/applications/oauth2?page=1&limit=10",
            200,
            serde_json::json!([app_json("http://test/test")]),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/user/applications/oauth2/3",
            200,
            app_json("http://test/test"),
        );
        push_json(
            &transport,
            HttpMethod::Patch,
            "/user/applications/oauth2/3",
            200,
            app_json("https://test/login"),
        );
        push_status(&transport, HttpMethod::Delete, "/user/applications/oauth2/3", 204);
        let client = client_with_version(&transport, "1.20.0");

        let app = client
            .create_oauth2(&CreateOauth2Option {
                name: "test".to_string(),
                redirect_uris: vec!["http://test/test".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(request_json(&transport, 0)["confidential_client"], true);
        assert_eq!(client.list_oauth2(&ListOptions::default()).await.unwrap().len(), 1);
        assert_eq!(client.get_oauth2(app.id).await.unwrap().client_id, "c1d2");

        let updated = client
            .update_oauth2(
                app.id,
                &CreateOauth2Option {
                    name: app.name.clone(),
                    redirect_uris: vec!["https://test/login".to_string()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.redirect_uris, vec!["https://test/login"]);
        client.delete_oauth2(app.id).await.unwrap();
    }

    #[tokio::test]
    async fn oauth2_needs_name_and_1_12() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.20.0");
        assert!(client.create_oauth2(&CreateOauth2Option::default()).await.is_err());

        let old = client_with_version(&transport, "1.11.0");
        assert!(matches!(
            old.get_oauth2(1).await,
            Err(GiteaError::ServerTooOld { .. })
        ));
    }
}

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result};
use crate::version::VERSION_1_15_0;

/// Settings of the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub full_name: String,
    pub website: String,
    pub description: String,
    pub location: String,
    pub language: String,
    pub theme: String,
    pub diff_view_style: String,
    pub hide_email: bool,
    pub hide_activity: bool,
}

/// Partial update of [`UserSettings`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSettingsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_view_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_activity: Option<bool>,
}

impl Client {
    /// Requires Gitea 1.15.
    pub async fn get_user_settings(&self) -> Result<UserSettings> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.get_json("/user/settings").await
    }

    /// Requires Gitea 1.15.
    pub async fn update_user_settings(&self, opt: &UserSettingsOptions) -> Result<UserSettings> {
        self.check_server_version_ge(&VERSION_1_15_0).await?;
        self.patch_json("/user/settings", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GiteaError;
    use crate::http::{HttpMethod, MockTransport};
    use crate::test_support::{client_with_version, push_json, request_json};

    #[tokio::test]
    async fn update_user_settings_sends_only_set_fields() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Patch,
            "/user/settings",
            200,
            serde_json::json!({
                "full_name": "Admin User on Test",
                "theme": "auto",
                "language": "de_de",
                "hide_email": true,
                "hide_activity": false
            }),
        );
        let client = client_with_version(&transport, "1.15.0");

        let settings = client
            .update_user_settings(&UserSettingsOptions {
                full_name: Some("Admin User on Test".to_string()),
                language: Some("de_de".to_string()),
                hide_email: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            settings,
            UserSettings {
                full_name: "Admin User on Test".to_string(),
                theme: "auto".to_string(),
                language: "de_de".to_string(),
                hide_email: true,
                ..Default::default()
            }
        );
        assert_eq!(
            request_json(&transport, 0),
            serde_json::json!({
                "full_name": "Admin User on Test",
                "language": "de_de",
                "hide_email": true,
            })
        );
    }

    #[tokio::test]
    async fn user_settings_need_1_15() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.14.3");

        let err = client.get_user_settings().await.expect_err("too old");
        assert!(matches!(err, GiteaError::ServerTooOld { .. }));
        assert!(transport.requests().is_empty());
    }
}

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

/// Header letting an integrated server app act without the user's password.
pub const SERVER_ACCESS_TOKEN_HEADER: &str = "X-Gitea-Server-Access-Token";

/// A personal access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    pub id: i64,
    pub name: String,
    /// Full token value; only returned on creation.
    pub sha1: String,
    pub token_last_eight: String,
    pub scopes: Vec<String>,
}

/// Options for creating an access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateAccessTokenOption {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Also sent as `X-Gitea-Server-Access-Token` when set.
    #[serde(skip)]
    pub server_access_token: Option<String>,
}

impl Client {
    /// Tokens of `user`; the API demands basic auth for this call.
    pub async fn list_access_tokens(
        &self,
        user: &str,
        pass: &str,
        opt: &ListOptions,
    ) -> Result<Page<AccessToken>> {
        let (list, query) = self.paged_query(opt);
        let (items, response) = self
            .request(HttpMethod::Get, api_path!("/users/{}/tokens", user))
            .query(query)
            .basic_auth(user, pass)
            .send::<Vec<AccessToken>>()
            .await?;
        Ok(crate::client::into_page(items, response, &list))
    }

    /// Tokens of `user`, authorized by the server access token.
    pub async fn admin_list_access_tokens(
        &self,
        user: &str,
        server_token: &str,
    ) -> Result<Vec<AccessToken>> {
        let (items, _) = self
            .request(HttpMethod::Get, api_path!("/users/{}/tokens", user))
            .header(SERVER_ACCESS_TOKEN_HEADER, server_token)
            .send()
            .await?;
        Ok(items)
    }

    /// Create an access token for `user`; needs basic auth.
    pub async fn create_access_token(
        &self,
        user: &str,
        pass: &str,
        opt: &CreateAccessTokenOption,
    ) -> Result<AccessToken> {
        let mut request = self
            .request(HttpMethod::Post, api_path!("/users/{}/tokens", user))
            .basic_auth(user, pass)
            .json(opt)?;
        if let Some(ref server_token) = opt.server_access_token {
            request = request.header(SERVER_ACCESS_TOKEN_HEADER, server_token.clone());
        }
        let (token, _) = request.send().await?;
        Ok(token)
    }

    /// Delete a token by numeric id.
    pub async fn delete_access_token(&self, user: &str, pass: &str, token_id: i64) -> Result<()> {
        self.request(
            HttpMethod::Delete,
            api_path!("/users/{}/tokens/{}", user, token_id),
        )
        .basic_auth(user, pass)
        .send_empty()
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, request_json};

    #[tokio::test]
    async fn create_access_token_uses_basic_auth_and_server_token() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Post,
            "/users/test01/tokens",
            201,
            serde_json::json!({
                "id": 4,
                "name": "ci",
                "sha1": "0123456789abcdef",
                "token_last_eight": "89abcdef",
            }),
        );
        let client = client_with_version(&transport, "1.20.0");

        let token = client
            .create_access_token(
                "test01",
                "pw",
                &CreateAccessTokenOption {
                    name: "ci".to_string(),
                    scopes: vec!["read:repository".to_string()],
                    server_access_token: Some("srv".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(token.sha1, "0123456789abcdef");

        let req = &transport.requests()[0];
        assert_eq!(req.header("authorization"), Some("Basic dGVzdDAxOnB3"));
        assert_eq!(req.header("x-gitea-server-access-token"), Some("srv"));
        assert_eq!(
            request_json(&transport, 0),
            serde_json::json!({"name": "ci", "scopes": ["read:repository"]})
        );
    }

    #[tokio::test]
    async fn admin_list_access_tokens_keeps_client_auth() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/users/test01/tokens",
            200,
            serde_json::json!([{"id": 1, "name": "a"}]),
        );
        let client = client_with_version(&transport, "1.20.0");

        let tokens = client
            .admin_list_access_tokens("test01", "srv")
            .await
            .unwrap();
        assert_eq!(tokens.len(), 1);
        let req = &transport.requests()[0];
        assert_eq!(req.header("authorization"), Some("token test-token"));
        assert_eq!(req.header("x-gitea-server-access-token"), Some("srv"));
    }
}

//! Users: profile lookup, search, follow graph, keys, tokens and settings.

mod app;
mod follow;
mod key;
mod settings;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use app::{AccessToken, CreateAccessTokenOption};
pub use key::{CreateKeyOption, PublicKey};
pub use settings::{UserSettings, UserSettingsOptions};

use crate::client::{Client, Result, api_path, into_page};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::types::VisibleType;

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    /// Login name (`login` on the wire).
    #[serde(rename = "login")]
    pub user_name: String,
    /// Name used by external authentication sources.
    pub login_name: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub language: String,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub restricted: bool,
    #[serde(rename = "active")]
    pub is_active: bool,
    pub prohibit_login: bool,
    pub location: String,
    pub website: String,
    pub description: String,
    pub visibility: VisibleType,
    pub followers_count: i64,
    pub following_count: i64,
    pub starred_repos_count: i64,
}

/// Options for [`Client::search_users`].
#[derive(Debug, Clone, Default)]
pub struct SearchUsersOption {
    pub list: ListOptions,
    /// Matched against login and full name.
    pub keyword: String,
    pub uid: Option<i64>,
}

impl PaginatedOptions for SearchUsersOption {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("q", &self.keyword)
            .push_opt("uid", self.uid.filter(|uid| *uid > 0));
    }
}

#[derive(Debug, Deserialize)]
struct SearchUsersResponse {
    #[serde(default)]
    data: Vec<User>,
}

impl Client {
    /// The authenticated user.
    pub async fn get_my_user_info(&self) -> Result<User> {
        self.get_json("/user").await
    }

    /// Get a user by login name.
    pub async fn get_user_info(&self, user: &str) -> Result<User> {
        self.get_json(&api_path!("/users/{}", user)).await
    }

    /// Look a user up by numeric id through the search endpoint.
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let opt = SearchUsersOption {
            uid: Some(id),
            ..Default::default()
        };
        let page = self.search_users(&opt).await?;
        Ok(page.items.into_iter().find(|u| u.id == id))
    }

    /// Search users by login, full name or email.
    pub async fn search_users(&self, opt: &SearchUsersOption) -> Result<Page<User>> {
        let (list, query) = self.paged_query(opt);
        let (found, response) = self
            .request(HttpMethod::Get, "/users/search")
            .query(query)
            .send::<SearchUsersResponse>()
            .await?;
        Ok(into_page(found.data, response, &list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport};
    use crate::test_support::{api, client_with_version, push_json};

    fn user_json(id: i64, login: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "login": login,
            "login_name": "",
            "full_name": "",
            "email": format!("{login}@gitea.io"),
            "avatar_url": format!("https://gitea.test/user/avatar/{login}/-1"),
            "language": "en-US",
            "is_admin": id == 1,
            "last_login": "2024-01-01T10:00:00Z",
            "created": "2023-05-01T10:00:00Z",
            "restricted": false,
            "active": true,
            "prohibit_login": false,
            "location": "",
            "website": "",
            "description": "",
            "visibility": "public",
            "followers_count": 0,
            "following_count": 2,
            "starred_repos_count": 5
        })
    }

    #[tokio::test]
    async fn get_my_user_info_decodes_user() {
        let transport = MockTransport::new();
        push_json(&transport, HttpMethod::Get, "/user", 200, user_json(1, "test01"));
        let client = client_with_version(&transport, "1.20.0");

        let user = client.get_my_user_info().await.expect("user");
        assert_eq!(user.id, 1);
        assert_eq!(user.user_name, "test01");
        assert_eq!(user.email, "test01@gitea.io");
        assert!(user.is_admin);
        assert!(user.is_active);
        assert_eq!(user.following_count, 2);
        assert_eq!(user.visibility, VisibleType::Public);
    }

    #[tokio::test]
    async fn get_user_info_tolerates_missing_fields() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/users/old%20style",
            200,
            serde_json::json!({"id": 9, "login": "old style"}),
        );
        let client = client_with_version(&transport, "1.11.0");

        let user = client.get_user_info("old style").await.expect("user");
        assert_eq!(user.id, 9);
        assert!(user.created.is_none());
    }

    #[tokio::test]
    async fn get_user_info_rejects_empty_name_without_request() {
        let transport = MockTransport::new();
        let client = client_with_version(&transport, "1.20.0");

        let err = client.get_user_info("").await.expect_err("empty name");
        assert!(matches!(err, crate::GiteaError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn search_users_unwraps_data_envelope() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            api("/users/search?page=1&limit=10&q=test"),
            HttpResponse::new(
                200,
                serde_json::json!({
                    "ok": true,
                    "data": [user_json(1, "test01"), user_json(2, "test02")]
                })
                .to_string(),
            )
            .with_header("X-Total-Count", "2"),
        );
        let client = client_with_version(&transport, "1.20.0");

        let opt = SearchUsersOption {
            keyword: "test".to_string(),
            ..Default::default()
        };
        let page = client.search_users(&opt).await.expect("search");
        assert_eq!(page.len(), 2);
        assert_eq!(page.items[1].user_name, "test02");
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn get_user_by_id_searches_by_uid() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/users/search?page=1&limit=10&uid=2",
            200,
            serde_json::json!({"ok": true, "data": [user_json(2, "test02")]}),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/users/search?page=1&limit=10&uid=3",
            200,
            serde_json::json!({"ok": true, "data": []}),
        );
        let client = client_with_version(&transport, "1.20.0");

        let found = client.get_user_by_id(2).await.expect("lookup");
        assert_eq!(found.map(|u| u.user_name), Some("test02".to_string()));
        assert!(client.get_user_by_id(3).await.expect("lookup").is_none());
    }
}

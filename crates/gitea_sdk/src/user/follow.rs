use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

use super::User;

impl Client {
    /// List the followers of the authenticated user.
    pub async fn list_my_followers(&self, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page("/user/followers", opt).await
    }

    /// List the followers of `user`.
    pub async fn list_followers(&self, user: &str, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page(&api_path!("/users/{}/followers", user), opt)
            .await
    }

    /// List the users the authenticated user follows.
    pub async fn list_my_following(&self, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page("/user/following", opt).await
    }

    /// List the users `user` follows.
    pub async fn list_following(&self, user: &str, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page(&api_path!("/users/{}/following", user), opt)
            .await
    }

    /// Whether the authenticated user follows `target`.
    pub async fn is_following(&self, target: &str) -> Result<bool> {
        self.check_presence(&api_path!("/user/following/{}", target), 204)
            .await
    }

    /// Whether `user` follows `target`.
    pub async fn is_user_following(&self, user: &str, target: &str) -> Result<bool> {
        self.check_presence(&api_path!("/users/{}/following/{}", user, target), 204)
            .await
    }

    /// Follow `target`.
    pub async fn follow(&self, target: &str) -> Result<()> {
        self.send_empty(HttpMethod::Put, &api_path!("/user/following/{}", target))
            .await
    }

    /// Stop following `target`.
    pub async fn unfollow(&self, target: &str) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/user/following/{}", target))
            .await
    }
}

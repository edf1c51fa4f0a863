use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};
use crate::user::User;

impl Client {
    /// List the members of an organization.
    pub async fn list_org_membership(&self, org: &str, opt: &ListOptions) -> Result<Page<User>> {
        self.get_page(&api_path!("/orgs/{}/members", org), opt)
            .await
    }

    /// List the public members of an organization.
    pub async fn list_public_org_membership(
        &self,
        org: &str,
        opt: &ListOptions,
    ) -> Result<Page<User>> {
        self.get_page(&api_path!("/orgs/{}/public_members", org), opt)
            .await
    }

    /// Whether `user` is a member of `org`.
    pub async fn check_org_membership(&self, org: &str, user: &str) -> Result<bool> {
        self.check_presence(&api_path!("/orgs/{}/members/{}", org, user), 204)
            .await
    }

    /// Whether `user` publicly shows membership of `org`.
    pub async fn check_public_org_membership(&self, org: &str, user: &str) -> Result<bool> {
        self.check_presence(&api_path!("/orgs/{}/public_members/{}", org, user), 204)
            .await
    }

    /// Publicize or conceal the membership of `user`.
    pub async fn set_public_org_membership(
        &self,
        org: &str,
        user: &str,
        public: bool,
    ) -> Result<()> {
        let method = if public {
            HttpMethod::Put
        } else {
            HttpMethod::Delete
        };
        self.send_empty(method, &api_path!("/orgs/{}/public_members/{}", org, user))
            .await
    }

    /// Remove `user` from an organization.
    pub async fn delete_org_membership(&self, org: &str, user: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/orgs/{}/members/{}", org, user),
        )
        .await
    }
}

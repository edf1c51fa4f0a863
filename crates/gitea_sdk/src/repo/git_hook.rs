//! Server-side git hooks (`pre-receive`, `update`, `post-receive`).

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHook {
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditGitHookOption {
    pub content: String,
}

impl Client {
    /// List the server-side git hooks of a repository.
    pub async fn list_repo_git_hooks(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<GitHook>> {
        self.get_page(&api_path!("/repos/{}/{}/hooks/git", owner, repo), opt)
            .await
    }

    /// Get a server-side git hook.
    pub async fn get_repo_git_hook(&self, owner: &str, repo: &str, name: &str) -> Result<GitHook> {
        self.get_json(&api_path!("/repos/{}/{}/hooks/git/{}", owner, repo, name))
            .await
    }

    /// Replace the content of a server-side git hook.
    pub async fn edit_repo_git_hook(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        opt: &EditGitHookOption,
    ) -> Result<()> {
        self.request(
            HttpMethod::Patch,
            api_path!("/repos/{}/{}/hooks/git/{}", owner, repo, name),
        )
        .json(opt)?
        .send_empty()
        .await?;
        Ok(())
    }

    /// Remove the hook's content, which deactivates it.
    pub async fn delete_repo_git_hook(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/hooks/git/{}", owner, repo, name),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json, push_status, request_json};

    #[tokio::test]
    async fn git_hook_round_trip() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/hooks/git?page=1&limit=10",
            200,
            serde_json::json!([
                {"name": "pre-receive", "is_active": false},
                {"name": "update", "is_active": false}
            ]),
        );
        push_status(&transport, HttpMethod::Patch, "/repos/test01/repo/hooks/git/pre-receive", 200);
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/hooks/git/pre-receive",
            200,
            serde_json::json!({
                "name": "pre-receive",
                "is_active": true,
                "content": "#!/bin/sh\nexit 0\n",
            }),
        );
        push_status(
            &transport,
            HttpMethod::Delete,
            "/repos/test01/repo/hooks/git/pre-receive",
            204,
        );
        let client = client_with_version(&transport, "1.20.0");

        let hooks = client
            .list_repo_git_hooks("test01", "repo", &ListOptions::default())
            .await
            .unwrap();
        assert!(hooks.items.iter().all(|h| !h.is_active));

        client
            .edit_repo_git_hook(
                "test01",
                "repo",
                "pre-receive",
                &EditGitHookOption {
                    content: "#!/bin/sh\nexit 0\n".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(request_json(&transport, 1)["content"], "#!/bin/sh\nexit 0\n");

        let hook = client
            .get_repo_git_hook("test01", "repo", "pre-receive")
            .await
            .unwrap();
        assert!(hook.is_active);
        client
            .delete_repo_git_hook("test01", "repo", "pre-receive")
            .await
            .unwrap();
    }
}

//! Git trees and blobs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, PaginatedOptions, Query};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitEntry {
    pub path: String,
    pub mode: String,
    /// `blob`, `tree` or `commit`.
    #[serde(rename = "type")]
    pub kind: String,
    pub size: i64,
    pub sha: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitTree {
    pub sha: String,
    pub url: String,
    #[serde(rename = "tree")]
    pub entries: Vec<GitEntry>,
    pub truncated: bool,
    pub page: u32,
    pub total_count: u64,
}

impl GitTree {
    /// Whether a later page holds more entries.
    #[must_use]
    pub fn has_more(&self, page_size: u32) -> bool {
        self.truncated || u64::from(self.page.max(1)) * u64::from(page_size) < self.total_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitBlob {
    /// Content as sent by the server; see [`GitBlob::decoded`].
    pub content: String,
    pub encoding: String,
    pub url: String,
    pub sha: String,
    pub size: i64,
}

impl GitBlob {
    pub fn decoded(&self) -> Result<Vec<u8>> {
        if self.encoding == "base64" {
            let compact: String = self.content.split_whitespace().collect();
            return BASE64
                .decode(compact)
                .map_err(|e| GiteaError::Validation(format!("invalid base64 blob: {e}")));
        }
        Ok(self.content.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListTreeOptions {
    pub list: ListOptions,
    /// Tree SHA, branch or tag.
    pub git_ref: String,
    pub recursive: bool,
}

impl PaginatedOptions for ListTreeOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        if self.recursive {
            query.push("recursive", 1);
        }
    }
}

impl Client {
    /// Entries of a git tree. Pagination is reported in the body, not headers.
    pub async fn get_trees(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListTreeOptions,
    ) -> Result<GitTree> {
        let (_, query) = self.paged_query(opt);
        let (tree, _) = self
            .request(
                HttpMethod::Get,
                api_path!("/repos/{}/{}/git/trees/{}", owner, repo, &opt.git_ref),
            )
            .query(query)
            .send()
            .await?;
        Ok(tree)
    }

    /// Get a git blob by SHA.
    pub async fn get_blob(&self, owner: &str, repo: &str, sha: &str) -> Result<GitBlob> {
        self.get_json(&api_path!("/repos/{}/{}/git/blobs/{}", owner, repo, sha))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::test_support::{client_with_version, push_json};

    #[tokio::test]
    async fn recursive_tree_and_blob() {
        let transport = MockTransport::new();
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/git/trees/main?page=1&limit=10&recursive=1",
            200,
            serde_json::json!({
                "sha": "e0a9",
                "tree": [
                    {"path": "README.md", "mode": "100644", "type": "blob", "size": 5, "sha": "b1"},
                    {"path": "src", "mode": "040000", "type": "tree", "sha": "t1"}
                ],
                "truncated": false,
                "page": 1,
                "total_count": 2
            }),
        );
        push_json(
            &transport,
            HttpMethod::Get,
            "/repos/test01/repo/git/blobs/b1",
            200,
            serde_json::json!({
                "content": "aGVsbG8=",
                "encoding": "base64",
                "sha": "b1",
                "size": 5,
            }),
        );
        let client = client_with_version(&transport, "1.20.0");

        let tree = client
            .get_trees(
                "test01",
                "repo",
                &ListTreeOptions {
                    git_ref: "main".to_string(),
                    recursive: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(tree.entries.len(), 2);
        assert_eq!(tree.entries[1].kind, "tree");
        assert!(!tree.has_more(10));

        let blob = client.get_blob("test01", "repo", &tree.entries[0].sha).await.unwrap();
        assert_eq!(blob.decoded().unwrap(), b"hello");
    }

    #[test]
    fn tree_has_more_uses_total_count() {
        let tree = GitTree {
            page: 1,
            total_count: 25,
            ..Default::default()
        };
        assert!(tree.has_more(10));
        let last = GitTree {
            page: 3,
            total_count: 25,
            ..Default::default()
        };
        assert!(!last.has_more(10));
    }
}

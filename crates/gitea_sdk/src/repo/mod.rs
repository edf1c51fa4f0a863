//! Repositories and everything hanging off `/repos/{owner}/{repo}`.

mod branch;
mod branch_protection;
mod collaborator;
mod commit;
mod file;
mod fork;
mod git_hook;
mod migrate;
mod secret;
mod star;
mod tag;
mod team;
mod topic;
mod transfer;
mod tree;
mod watch;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use branch::{Branch, CreateBranchOption};
pub use branch_protection::{
    BranchProtection, CreateBranchProtectionOption, EditBranchProtectionOption,
};
pub use collaborator::{AddCollaboratorOption, CollaboratorPermission};
pub use commit::{
    Commit, CommitAffectedFile, CommitMeta, CommitStats, CommitUser, ListCommitOptions,
    PayloadCommit, PayloadCommitVerification, PayloadUser, RepoCommit,
};
pub use file::{
    CommitDates, ContentsResponse, CreateFileOptions, DeleteFileOptions, FileCommitResponse,
    FileLinks, FileOptions, FileResponse, Identity, UpdateFileOptions,
};
pub use fork::CreateForkOption;
pub use git_hook::{EditGitHookOption, GitHook};
pub use migrate::{GitServiceType, MigrateRepoOption};
pub use tag::{AnnotatedTag, AnnotatedTagObject, CreateTagOption, Tag};
pub use transfer::{CreateRepoFromTemplateOption, TransferRepoOption};
pub use tree::{GitBlob, GitEntry, GitTree, ListTreeOptions};

use crate::client::{Client, Result, api_path, into_page};
use crate::error::GiteaError;
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::user::User;

/// Access the requesting user has on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub admin: bool,
    pub push: bool,
    pub pull: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub owner: Option<User>,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub empty: bool,
    pub private: bool,
    pub fork: bool,
    pub template: bool,
    pub parent: Option<Box<Repository>>,
    pub mirror: bool,
    pub size: i64,
    pub language: String,
    pub languages_url: String,
    pub html_url: String,
    pub ssh_url: String,
    pub clone_url: String,
    pub original_url: String,
    pub website: String,
    pub stars_count: i64,
    pub forks_count: i64,
    pub watchers_count: i64,
    pub open_issues_count: i64,
    #[serde(rename = "open_pr_counter")]
    pub open_pulls: i64,
    #[serde(rename = "release_counter")]
    pub releases: i64,
    pub default_branch: String,
    pub archived: bool,
    #[serde(rename = "created_at")]
    pub created: Option<DateTime<Utc>>,
    #[serde(rename = "updated_at")]
    pub updated: Option<DateTime<Utc>>,
    pub permissions: Option<Permission>,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub has_pull_requests: bool,
    pub has_projects: bool,
    pub has_releases: bool,
    pub has_packages: bool,
    pub has_actions: bool,
    pub ignore_whitespace_conflicts: bool,
    pub allow_merge_commits: bool,
    pub allow_rebase: bool,
    pub allow_rebase_explicit: bool,
    pub allow_squash_merge: bool,
    pub default_merge_style: String,
    pub default_delete_branch_after_merge: bool,
    pub avatar_url: String,
    pub internal: bool,
    pub mirror_interval: String,
    pub mirror_updated: Option<DateTime<Utc>>,
}

/// Repository kinds accepted by the search `mode` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoType {
    Fork,
    Source,
    Mirror,
    Collaborative,
}

impl RepoType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RepoType::Fork => "fork",
            RepoType::Source => "source",
            RepoType::Mirror => "mirror",
            RepoType::Collaborative => "collaborative",
        }
    }
}

/// Filters for [`Client::search_repos`].
#[derive(Debug, Clone, Default)]
pub struct SearchRepoOptions {
    pub list: ListOptions,
    pub keyword: String,
    /// Match `keyword` against topics only.
    pub keyword_is_topic: bool,
    pub keyword_in_description: bool,
    /// Repositories owned by (or, with `exclusive == false`, accessible to) this user.
    pub owner_id: Option<i64>,
    pub starred_by_user_id: Option<i64>,
    pub is_private: Option<bool>,
    pub is_archived: Option<bool>,
    pub exclude_template: bool,
    pub repo_type: Option<RepoType>,
    /// `alpha`, `created`, `updated`, `size` or `id`.
    pub sort: String,
    /// `asc` or `desc`.
    pub order: String,
    pub exclusive: bool,
    pub priority_owner_id: Option<i64>,
}

impl PaginatedOptions for SearchRepoOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("q", &self.keyword)
            .push_flag("topic", self.keyword_is_topic)
            .push_flag("includeDesc", self.keyword_in_description)
            .push_opt("uid", self.owner_id)
            .push_opt("priority_owner_id", self.priority_owner_id)
            .push_opt("starredBy", self.starred_by_user_id)
            .push_opt("private", self.is_private)
            .push_opt("archived", self.is_archived);
        if self.exclude_template {
            query.push("template", false);
        }
        query
            .push_opt("mode", self.repo_type.map(RepoType::as_str))
            .push_non_empty("sort", &self.sort)
            .push_non_empty("order", &self.order)
            .push_flag("exclusive", self.exclusive);
    }
}

#[derive(Debug, Deserialize)]
struct SearchRepoResponse {
    #[serde(default)]
    data: Vec<Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRepoOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub private: bool,
    /// Name of a label set to seed the repository with.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issue_labels: String,
    #[serde(default)]
    pub auto_init: bool,
    #[serde(default)]
    pub template: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gitignores: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub readme: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_branch: String,
    /// `default`, `collaborator`, `committer` or `collaboratorcommitter`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trust_model: String,
}

impl CreateRepoOption {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GiteaError::Validation("name is empty".to_string()));
        }
        if self.name.len() > 100 {
            return Err(GiteaError::Validation(
                "name has more than 100 chars".to_string(),
            ));
        }
        if self.description.len() > 2048 {
            return Err(GiteaError::Validation(
                "description has more than 2048 chars".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fields left at `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRepoOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_pull_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_releases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_packages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_actions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_whitespace_conflicts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_merge_commits: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_rebase_explicit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_squash_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_merge_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_delete_branch_after_merge: Option<bool>,
}

/// Archive formats served by `/archive/{ref}.{ext}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
    TarGz,
    /// A `git bundle` of the whole history.
    Bundle,
}

impl ArchiveType {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveType::Zip => ".zip",
            ArchiveType::TarGz => ".tar.gz",
            ArchiveType::Bundle => ".bundle",
        }
    }
}

impl Client {
    /// Repositories of the authenticated user.
    pub async fn list_my_repos(&self, opt: &ListOptions) -> Result<Page<Repository>> {
        self.get_page("/user/repos", opt).await
    }

    /// List the repositories owned by `user`.
    pub async fn list_user_repos(&self, user: &str, opt: &ListOptions) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/users/{}/repos", user), opt).await
    }

    /// List the repositories of an organization.
    pub async fn list_org_repos(&self, org: &str, opt: &ListOptions) -> Result<Page<Repository>> {
        self.get_page(&api_path!("/orgs/{}/repos", org), opt).await
    }

    /// Search repositories.
    pub async fn search_repos(&self, opt: &SearchRepoOptions) -> Result<Page<Repository>> {
        let (list, query) = self.paged_query(opt);
        let (found, response) = self
            .request(HttpMethod::Get, "/repos/search")
            .query(query)
            .send::<SearchRepoResponse>()
            .await?;
        Ok(into_page(found.data, response, &list))
    }

    /// Create a repository owned by the authenticated user.
    pub async fn create_repo(&self, opt: &CreateRepoOption) -> Result<Repository> {
        opt.validate()?;
        self.post_json("/user/repos", opt).await
    }

    /// Create a repository in an organization.
    pub async fn create_org_repo(&self, org: &str, opt: &CreateRepoOption) -> Result<Repository> {
        opt.validate()?;
        self.post_json(&api_path!("/orgs/{}/repos", org), opt).await
    }

    /// Get a repository.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.get_json(&api_path!("/repos/{}/{}", owner, repo)).await
    }

    /// Get a repository by id.
    pub async fn get_repo_by_id(&self, id: i64) -> Result<Repository> {
        self.get_json(&api_path!("/repositories/{}", id)).await
    }

    /// Edit a repository.
    pub async fn edit_repo(
        &self,
        owner: &str,
        repo: &str,
        opt: &EditRepoOption,
    ) -> Result<Repository> {
        self.patch_json(&api_path!("/repos/{}/{}", owner, repo), opt)
            .await
    }

    /// Delete a repository.
    pub async fn delete_repo(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(HttpMethod::Delete, &api_path!("/repos/{}/{}", owner, repo))
            .await
    }

    /// Ask a mirror to fetch from its upstream now.
    pub async fn mirror_sync(&self, owner: &str, repo: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Post,
            &api_path!("/repos/{}/{}/mirror-sync", owner, repo),
        )
        .await
    }

    /// Bytes of code per detected language.
    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, i64>> {
        self.get_json(&api_path!("/repos/{}/{}/languages", owner, repo))
            .await
    }

    /// Download an archive of `git_ref`.
    pub async fn get_archive(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        archive: ArchiveType,
    ) -> Result<Vec<u8>> {
        let path = format!(
            "{}{}",
            api_path!("/repos/{}/{}/archive/{}", owner, repo, git_ref),
            archive.extension()
        );
        self.get_bytes(&path, Query::new()).await
    }
}

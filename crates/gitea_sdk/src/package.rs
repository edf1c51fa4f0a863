//! Package registry: packages owned by a user or organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page, PaginatedOptions, Query};
use crate::repo::Repository;
use crate::user::User;
use crate::version::VERSION_1_17_0;

/// One version of a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    pub id: i64,
    pub owner: Option<User>,
    /// Repository the package is linked to, if any.
    pub repository: Option<Repository>,
    pub creator: Option<User>,
    /// Registry type, e.g. `generic`, `cargo`, `npm`, `container`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub version: String,
    pub html_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageFile {
    pub id: i64,
    #[serde(rename = "Size")]
    pub size: i64,
    pub name: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub sha512: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListPackagesOptions {
    pub list: ListOptions,
    /// Registry type filter.
    pub kind: String,
    /// Name search.
    pub query: String,
}

impl PaginatedOptions for ListPackagesOptions {
    fn list_options(&self) -> &ListOptions {
        &self.list
    }

    fn append_query(&self, query: &mut Query) {
        query
            .push_non_empty("type", &self.kind)
            .push_non_empty("q", &self.query);
    }
}

impl Client {
    /// List the packages of a user or organization. Requires Gitea 1.17.
    pub async fn list_packages(
        &self,
        owner: &str,
        opt: &ListPackagesOptions,
    ) -> Result<Page<Package>> {
        self.check_server_version_ge(&VERSION_1_17_0).await?;
        self.get_page(&api_path!("/packages/{}", owner), opt).await
    }

    /// Get one version of a package. Requires Gitea 1.17.
    pub async fn get_package(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
        version: &str,
    ) -> Result<Package> {
        self.check_server_version_ge(&VERSION_1_17_0).await?;
        self.get_json(&api_path!("/packages/{}/{}/{}/{}", owner, kind, name, version))
            .await
    }

    /// Delete one version of a package. Requires Gitea 1.17.
    pub async fn delete_package(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
        version: &str,
    ) -> Result<()> {
        self.check_server_version_ge(&VERSION_1_17_0).await?;
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/packages/{}/{}/{}/{}", owner, kind, name, version),
        )
        .await
    }

    /// List the files of one package version. Requires Gitea 1.17.
    pub async fn list_package_files(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
        version: &str,
    ) -> Result<Vec<PackageFile>> {
        self.check_server_version_ge(&VERSION_1_17_0).await?;
        self.get_json(&api_path!(
            "/packages/{}/{}/{}/{}/files",
            owner,
            kind,
            name,
            version
        ))
        .await
    }
}

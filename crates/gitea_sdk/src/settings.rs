//! Instance-wide settings exposed under `/settings`.

use serde::{Deserialize, Serialize};

use crate::client::{Client, Result};
use crate::pagination::PageLimits;
use crate::version::VERSION_1_13_0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalUiSettings {
    pub default_theme: String,
    pub allowed_reactions: Vec<String>,
    pub custom_emojis: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalRepoSettings {
    pub mirrors_disabled: bool,
    pub http_git_disabled: bool,
    pub migrations_disabled: bool,
    pub stars_disabled: bool,
    pub time_tracking_disabled: bool,
    pub lfs_disabled: bool,
}

/// Limits the API applies to list and blob endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalApiSettings {
    pub max_response_items: u32,
    pub default_paging_num: u32,
    pub default_git_trees_per_page: u32,
    pub default_max_blob_size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalAttachmentSettings {
    pub enabled: bool,
    pub allowed_types: String,
    pub max_size: i64,
    pub max_files: i64,
}

impl Client {
    /// Instance-wide UI settings. Requires Gitea 1.13.
    pub async fn get_global_ui_settings(&self) -> Result<GlobalUiSettings> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.get_json("/settings/ui").await
    }

    /// Instance-wide repository settings. Requires Gitea 1.13.
    pub async fn get_global_repo_settings(&self) -> Result<GlobalRepoSettings> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.get_json("/settings/repository").await
    }

    /// Instance-wide API limits. Requires Gitea 1.13.
    pub async fn get_global_api_settings(&self) -> Result<GlobalApiSettings> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.get_json("/settings/api").await
    }

    /// Instance-wide attachment settings. Requires Gitea 1.13.
    pub async fn get_global_attachment_settings(&self) -> Result<GlobalAttachmentSettings> {
        self.check_server_version_ge(&VERSION_1_13_0).await?;
        self.get_json("/settings/attachment").await
    }

    /// Adopt the server's paging defaults for all later list calls.
    ///
    /// Servers that do not report limits keep the current ones.
    pub async fn sync_page_limits(&mut self) -> Result<PageLimits> {
        let api = self.get_global_api_settings().await?;
        if api.max_response_items > 0 {
            let default = if api.default_paging_num > 0 {
                api.default_paging_num
            } else {
                self.page_limits().default_page_size
            };
            self.set_page_limits(PageLimits::new(default, api.max_response_items));
            tracing::debug!(
                default = default,
                max = api.max_response_items,
                "synced page limits from server"
            );
        }
        Ok(self.page_limits())
    }
}

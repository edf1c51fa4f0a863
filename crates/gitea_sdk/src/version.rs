//! Server version discovery and version-gated API access.
//!
//! Many endpoints only exist on newer servers. The client asks `/version`
//! once, caches the parsed result, and endpoints call
//! [`Client::check_server_version_ge`] before sending requests that older
//! servers would reject (or emulate the feature when they can).

use semver::{Version, VersionReq};
use serde::Deserialize;

use crate::client::{Client, Result};
use crate::error::GiteaError;

pub const VERSION_1_11_0: Version = Version::new(1, 11, 0);
pub const VERSION_1_11_5: Version = Version::new(1, 11, 5);
pub const VERSION_1_12_0: Version = Version::new(1, 12, 0);
pub const VERSION_1_12_3: Version = Version::new(1, 12, 3);
pub const VERSION_1_13_0: Version = Version::new(1, 13, 0);
pub const VERSION_1_14_0: Version = Version::new(1, 14, 0);
pub const VERSION_1_15_0: Version = Version::new(1, 15, 0);
pub const VERSION_1_16_0: Version = Version::new(1, 16, 0);
pub const VERSION_1_17_0: Version = Version::new(1, 17, 0);

#[derive(Debug, Deserialize)]
struct ServerVersion {
    version: String,
}

/// Parse a server version string leniently.
///
/// Accepts what Gitea and Forgejo report in practice: `1.12`, `v1.21.0`,
/// `1.22.0+dev-120-gabcdef`, `1.21.0-rc1`. Forgejo's `7.0.0+gitea-1.21.0`
/// resolves to the embedded Gitea API version.
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let (rest, build) = match trimmed.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (trimmed, None),
    };

    if let Some(build) = build
        && let Some((_, gitea)) = build.split_once("gitea-")
    {
        return parse_version(gitea);
    }

    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(GiteaError::InvalidVersion(raw.to_string()));
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    let mut normalized = parts.join(".");
    if let Some(pre) = pre {
        normalized.push('-');
        normalized.push_str(pre);
    }
    if let Some(build) = build {
        normalized.push('+');
        normalized.push_str(build);
    }

    Version::parse(&normalized).map_err(|_| GiteaError::InvalidVersion(raw.to_string()))
}

/// Drop pre-release and build metadata.
fn release_of(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

impl Client {
    /// Ask the server which version it runs.
    pub async fn server_version(&self) -> Result<String> {
        let v: ServerVersion = self.get_json("/version").await?;
        Ok(v.version)
    }

    /// The parsed server version, fetched on first use and cached afterwards.
    pub async fn load_server_version(&self) -> Result<&Version> {
        self.server_version
            .get_or_try_init(|| async {
                let raw = self.server_version().await?;
                tracing::debug!(version = %raw, "detected gitea server version");
                parse_version(&raw)
            })
            .await
    }

    /// Check the server against a semver requirement such as `">=1.12.3"`.
    ///
    /// Pre-release and build metadata of the server version are ignored, so a
    /// `1.15.0+dev` build satisfies `>=1.15.0`.
    pub async fn check_server_version_constraint(&self, constraint: &str) -> Result<()> {
        let req = VersionReq::parse(constraint)
            .map_err(|e| GiteaError::InvalidVersion(format!("{}: {}", constraint, e)))?;
        if self.ignores_version() {
            return Ok(());
        }

        let version = self.load_server_version().await?;
        if req.matches(&release_of(version)) {
            Ok(())
        } else {
            Err(GiteaError::VersionConstraint {
                url: self.url().to_string(),
                constraint: constraint.to_string(),
            })
        }
    }

    /// Fail with [`GiteaError::ServerTooOld`] unless the server is at least `required`.
    pub async fn check_server_version_ge(&self, required: &Version) -> Result<()> {
        if self.server_version_at_least(required).await? {
            Ok(())
        } else {
            Err(GiteaError::ServerTooOld {
                url: self.url().to_string(),
                required: required.to_string(),
            })
        }
    }

    /// Whether the server is at least `required`; always true when version
    /// checks are disabled.
    pub async fn server_version_at_least(&self, required: &Version) -> Result<bool> {
        if self.ignores_version() {
            return Ok(true);
        }
        let version = self.load_server_version().await?;
        Ok(release_of(version) >= *required)
    }
}

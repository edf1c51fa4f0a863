//! Configuration file support for gitea-sdk.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `GITEA_SDK_`, e.g., `GITEA_SDK_SERVER__TOKEN`)
//! 3. Config file (~/.config/gitea-sdk/config.toml or ./gitea-sdk.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [server]
//! url = "https://codeberg.org"
//! token = "..."  # or use GITEA_SDK_SERVER__TOKEN env var
//! sudo = "someone"  # act as another user (admin tokens only)
//!
//! [http]
//! timeout_secs = 30
//! user_agent = "my-tool/1.0"
//! max_retries = 3
//!
//! [pagination]
//! page_size = 50
//! max_page_size = 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use gitea_sdk::{CODEBERG_HOST, Client, DEFAULT_PAGE_SIZE, GiteaError, MAX_PAGE_SIZE, RetryConfig};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server address and credentials.
    pub server: ServerConfig,
    /// HTTP client tuning.
    pub http: HttpConfig,
    /// Page size defaults applied to list calls.
    pub pagination: PaginationConfig,
}

/// Server configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the Gitea/Forgejo instance; defaults to Codeberg.
    pub url: Option<String>,
    /// Personal access token.
    pub token: Option<String>,
    /// User to impersonate via the `Sudo` header.
    pub sudo: Option<String>,
    /// One-time password for accounts with 2FA enabled.
    pub otp: Option<String>,
}

/// HTTP configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Overrides the default `gitea_sdk/<version>` user agent.
    pub user_agent: Option<String>,
    /// Retries after a rate-limited response. Zero disables retrying.
    pub max_retries: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
            max_retries: 3,
        }
    }
}

/// Pagination configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a call does not ask for one.
    pub page_size: u32,
    /// Upper bound for any requested page size.
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/gitea-sdk/config.toml)
    /// 3. Local config file (./gitea-sdk.toml)
    /// 4. Environment variables with GITEA_SDK_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::default_config_path()
            && path.exists()
        {
            tracing::debug!("Loading config from {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let local_config = PathBuf::from("gitea-sdk.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./gitea-sdk.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // GITEA_SDK_HTTP__TIMEOUT_SECS -> http.timeout_secs
        builder = builder.add_source(Self::environment());

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    fn environment() -> Environment {
        Environment::with_prefix("GITEA_SDK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// The configured server URL, falling back to Codeberg.
    pub fn server_url(&self) -> String {
        self.server
            .url
            .clone()
            .unwrap_or_else(|| CODEBERG_HOST.to_string())
    }

    /// Build a client from this configuration. `url` and `token` override the
    /// configured values.
    pub fn client(&self, url: Option<&str>, token: Option<&str>) -> Result<Client, GiteaError> {
        let url = url.map_or_else(|| self.server_url(), str::to_string);
        let mut builder = Client::builder(&url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .page_limits(self.pagination.page_size, self.pagination.max_page_size);

        if let Some(token) = token.map(str::to_string).or_else(|| self.server.token.clone()) {
            builder = builder.token(token);
        }
        if let Some(sudo) = &self.server.sudo {
            builder = builder.sudo(sudo);
        }
        if let Some(otp) = &self.server.otp {
            builder = builder.otp(otp);
        }
        if let Some(user_agent) = &self.http.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if self.http.max_retries > 0 {
            let retry = RetryConfig {
                max_retries: self.http.max_retries,
                ..RetryConfig::default()
            };
            builder = builder.retry(retry);
        }
        builder.build()
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitea-sdk").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(content: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.server.url.is_none());
        assert!(config.server.token.is_none());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.pagination.max_page_size, MAX_PAGE_SIZE);
        assert_eq!(config.server_url(), CODEBERG_HOST);
    }

    #[test]
    fn test_full_config_parsing() {
        let config = from_toml(
            r#"
            [server]
            url = "https://gitea.example.com"
            token = "abc123"
            sudo = "bot"
            otp = "123456"

            [http]
            timeout_secs = 5
            user_agent = "ci/1.0"
            max_retries = 0

            [pagination]
            page_size = 20
            max_page_size = 100
        "#,
        );

        assert_eq!(config.server_url(), "https://gitea.example.com");
        assert_eq!(config.server.token.as_deref(), Some("abc123"));
        assert_eq!(config.server.sudo.as_deref(), Some("bot"));
        assert_eq!(config.server.otp.as_deref(), Some("123456"));
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent.as_deref(), Some("ci/1.0"));
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.pagination.page_size, 20);
        assert_eq!(config.pagination.max_page_size, 100);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = from_toml(
            r#"
            [http]
            timeout_secs = 90
        "#,
        );
        assert_eq!(config.http.timeout_secs, 90);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.pagination.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_config_merging_order() {
        let settings = ConfigBuilder::builder()
            .add_source(File::from_str(
                "[server]\nurl = \"https://a.example\"\ntoken = \"t1\"",
                FileFormat::Toml,
            ))
            .add_source(File::from_str("[server]\ntoken = \"t2\"", FileFormat::Toml))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.server.url.as_deref(), Some("https://a.example"));
        assert_eq!(config.server.token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_config_invalid_toml() {
        let result = ConfigBuilder::builder()
            .add_source(File::from_str("[server\nurl = 1", FileFormat::Toml))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = from_toml(
            r#"
            [server]
            url = "https://gitea.example.com"
            unknown_field = "ignored"
        "#,
        );
        assert_eq!(config.server_url(), "https://gitea.example.com");
    }

    #[test]
    fn test_client_uses_overrides() {
        let config = from_toml("[server]\nurl = \"https://gitea.example.com\"");
        let client = config
            .client(Some("https://other.example.com"), Some("tok"))
            .unwrap();
        assert_eq!(client.url(), "https://other.example.com");

        let client = config.client(None, None).unwrap();
        assert_eq!(client.url(), "https://gitea.example.com");
    }

    #[test]
    fn test_client_applies_page_limits() {
        let config = from_toml("[pagination]\npage_size = 25\nmax_page_size = 40");
        let client = config.client(None, None).unwrap();
        let limits = client.page_limits();
        assert_eq!(limits.default_page_size, 25);
        assert_eq!(limits.max_page_size, 40);
    }

    #[test]
    fn test_default_config_path_names_the_app() {
        if let Some(path) = Config::default_config_path() {
            assert!(path.ends_with("config.toml"));
            assert!(path.to_string_lossy().contains("gitea-sdk"));
        }
    }
}

//! gitea_sdk - typed async client for the Gitea REST API.
//!
//! The crate talks to the `/api/v1` surface of Gitea, Forgejo and Codeberg.
//! Every endpoint is a method on [`Client`] that builds a URL, serializes the
//! options, dispatches through an [`http::HttpTransport`] and decodes the
//! response into the types defined next to it.
//!
//! List endpoints return a [`Page`], whose [`Page::has_next_page`] is derived
//! from the server's `Link` and `x-total-count` headers. Endpoints that need a
//! newer server than the one answering either fail with
//! [`GiteaError::ServerTooOld`] or fall back to an emulation (for example
//! [`Client::resolve_milestone_by_name`] scans every page on servers older
//! than 1.13).
//!
//! # Features
//!
//! - `reqwest-transport` (default) - the reqwest backed transport used by
//!   [`Client::new`]. Without it a transport must be passed to
//!   [`ClientBuilder::transport`].
//!
//! # Example
//!
//! ```ignore
//! use gitea_sdk::{Client, ListOptions};
//! use gitea_sdk::issue::ListMilestoneOption;
//!
//! let client = Client::new("https://codeberg.org", "token")?;
//! let milestone = client.resolve_milestone_by_name("forgejo", "forgejo", "v9.0.0").await?;
//!
//! let mut opts = ListMilestoneOption::default();
//! loop {
//!     let page = client.list_repo_milestones("forgejo", "forgejo", &opts).await?;
//!     let has_next = page.has_next_page();
//!     for m in page {
//!         println!("{}", m.title);
//!     }
//!     if !has_next {
//!         break;
//!     }
//!     opts.list.page += 1;
//! }
//! ```

pub mod admin;
pub mod client;
pub mod error;
pub mod hook;
pub mod http;
pub mod issue;
pub mod notification;
pub mod oauth2;
pub mod org;
pub mod package;
pub mod pagination;
pub mod pull;
pub mod release;
pub mod repo;
pub mod retry;
pub mod settings;
pub mod status;
pub mod types;
pub mod user;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{CODEBERG_HOST, Client, ClientBuilder, Result};
pub use error::{GiteaError, is_rate_limit_error, short_error_message};
pub use hook::verify_webhook_signature;
pub use pagination::{
    DEFAULT_PAGE_SIZE, ListOptions, MAX_PAGE_SIZE, Page, PageLimits, PaginatedOptions, Response,
};
pub use retry::RetryConfig;
pub use types::{StateType, VisibleType};
pub use version::parse_version;

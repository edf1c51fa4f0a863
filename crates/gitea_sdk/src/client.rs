//! Gitea API client creation and request plumbing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use semver::Version;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::error::{GiteaError, api_error_message, is_rate_limit_error, short_error_message};
use crate::http::{HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::pagination::{ListOptions, Page, PageLimits, PaginatedOptions, Query, Response};
use crate::retry::{RetryConfig, with_retry};
use crate::version::parse_version;

/// Default Codeberg host.
pub const CODEBERG_HOST: &str = "https://codeberg.org";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Header carrying a one-time password for accounts with 2FA enabled.
pub const OTP_HEADER: &str = "X-GITEA-OTP";

/// Header asking the server to act as another user (admin tokens only).
pub const SUDO_HEADER: &str = "Sudo";

#[must_use]
pub fn default_user_agent() -> String {
    format!("gitea-sdk-rs/{}", env!("CARGO_PKG_VERSION"))
}

pub type Result<T, E = GiteaError> = std::result::Result<T, E>;

#[derive(Clone, PartialEq, Eq)]
enum Auth {
    None,
    Token(String),
    Basic { username: String, password: String },
}

impl Auth {
    fn header_value(&self) -> Option<String> {
        match self {
            Auth::None => None,
            Auth::Token(token) => Some(format!("token {}", token)),
            Auth::Basic { username, password } => Some(basic_auth_value(username, password)),
        }
    }
}

fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

/// Gitea API client.
///
/// Works against Gitea, Forgejo and Codeberg. Cloning is cheap: the
/// transport and the cached server version are shared between clones.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn HttpTransport>,
    url: String,
    auth: Auth,
    otp: Option<String>,
    sudo: Option<String>,
    user_agent: String,
    ignore_version: bool,
    pub(crate) server_version: Arc<OnceCell<Version>>,
    page_limits: PageLimits,
    retry: Option<RetryConfig>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = match self.auth {
            Auth::None => "none",
            Auth::Token(_) => "token",
            Auth::Basic { .. } => "basic",
        };
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("auth", &auth)
            .field("sudo", &self.sudo)
            .field("user_agent", &self.user_agent)
            .field("ignore_version", &self.ignore_version)
            .field("page_limits", &self.page_limits)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    url: String,
    auth: Auth,
    otp: Option<String>,
    sudo: Option<String>,
    user_agent: Option<String>,
    gitea_version: Option<String>,
    ignore_version: bool,
    page_limits: PageLimits,
    timeout: StdDuration,
    retry: Option<RetryConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            auth: Auth::None,
            otp: None,
            sudo: None,
            user_agent: None,
            gitea_version: None,
            ignore_version: false,
            page_limits: PageLimits::default(),
            timeout: DEFAULT_TIMEOUT,
            retry: None,
            transport: None,
        }
    }

    /// Authenticate with a personal access token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth = if token.is_empty() {
            Auth::None
        } else {
            Auth::Token(token)
        };
        self
    }

    /// Authenticate with username and password.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Auth::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// One-time password sent with every request.
    #[must_use]
    pub fn otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }

    /// Act as `user` on every request (admin tokens only).
    #[must_use]
    pub fn sudo(mut self, user: impl Into<String>) -> Self {
        self.sudo = Some(user.into());
        self
    }

    /// Override the default `gitea_sdk/<version>` user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Assume the server runs `version` instead of asking `/version`.
    #[must_use]
    pub fn gitea_version(mut self, version: impl Into<String>) -> Self {
        self.gitea_version = Some(version.into());
        self
    }

    /// Skip all server version checks.
    #[must_use]
    pub fn ignore_version(mut self, ignore: bool) -> Self {
        self.ignore_version = ignore;
        self
    }

    /// Default and maximum page size for list calls.
    #[must_use]
    pub fn page_limits(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.page_limits = PageLimits::new(default_page_size, max_page_size);
        self
    }

    /// Timeout for the default reqwest transport.
    #[must_use]
    pub fn timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry rate-limited requests with exponential backoff.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Send requests through `transport` instead of reqwest.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the base URL and build the client.
    pub fn build(self) -> Result<Client> {
        let url = self.url.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&url)
            .map_err(|e| GiteaError::Config(format!("invalid base url {:?}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GiteaError::Config(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }

        let server_version = match self.gitea_version {
            Some(v) => OnceCell::new_with(Some(parse_version(&v)?)),
            None => OnceCell::new(),
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(self.timeout)?,
        };

        Ok(Client {
            transport,
            url,
            auth: self.auth,
            otp: self.otp,
            sudo: self.sudo,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            ignore_version: self.ignore_version,
            server_version: Arc::new(server_version),
            page_limits: self.page_limits,
            retry: self.retry,
        })
    }
}

#[cfg(feature = "reqwest-transport")]
fn default_transport(timeout: StdDuration) -> Result<Arc<dyn HttpTransport>> {
    use crate::http::reqwest_transport::ReqwestTransport;

    let transport =
        ReqwestTransport::with_timeout(timeout).map_err(|e| GiteaError::Config(e.to_string()))?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "reqwest-transport"))]
fn default_transport(_timeout: StdDuration) -> Result<Arc<dyn HttpTransport>> {
    Err(GiteaError::Config(
        "no HTTP transport; enable the reqwest-transport feature or pass one".to_string(),
    ))
}

impl Client {
    /// Start configuring a client for the server at `url`.
    #[must_use]
    pub fn builder(url: &str) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Create a token-authenticated client using the default transport.
    ///
    /// ```ignore
    /// let client = gitea_sdk::Client::new("https://codeberg.org", "token")?;
    /// let me = client.get_my_user_info().await?;
    /// ```
    pub fn new(url: &str, token: &str) -> Result<Self> {
        Self::builder(url).token(token).build()
    }

    /// Create a client on top of an existing transport.
    pub fn new_with_transport(
        url: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Self::builder(url).token(token).transport(transport).build()
    }

    /// Base URL without trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Page size limits applied to list calls.
    pub fn page_limits(&self) -> PageLimits {
        self.page_limits
    }

    /// Replace the page size limits, e.g. after `sync_page_limits`.
    pub fn set_page_limits(&mut self, limits: PageLimits) {
        self.page_limits = limits;
    }

    /// Act as `user` from now on, or stop impersonating with `None`.
    pub fn set_sudo(&mut self, user: Option<String>) {
        self.sudo = user;
    }

    /// A clone of this client that acts as `user`.
    #[must_use]
    pub fn with_sudo(&self, user: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.sudo = Some(user.into());
        client
    }

    /// Set or clear the one-time password.
    pub fn set_otp(&mut self, otp: Option<String>) {
        self.otp = otp;
    }

    pub(crate) fn ignores_version(&self) -> bool {
        self.ignore_version
    }

    pub(crate) fn request(&self, method: HttpMethod, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            path: path.into(),
            query: Query::new(),
            headers: Vec::new(),
            body: Vec::new(),
            basic_auth: None,
        }
    }

    fn base_headers(&self, basic_auth: Option<&(String, String)>) -> HttpHeaders {
        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ];

        let authorization = match basic_auth {
            Some((username, password)) => Some(basic_auth_value(username, password)),
            None => self.auth.header_value(),
        };
        if let Some(value) = authorization {
            headers.push(("Authorization".to_string(), value));
        }
        if let Some(ref otp) = self.otp {
            headers.push((OTP_HEADER.to_string(), otp.clone()));
        }
        if let Some(ref sudo) = self.sudo {
            headers.push((SUDO_HEADER.to_string(), sudo.clone()));
        }
        headers
    }

    async fn send_once(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "gitea request");

        let response = self.transport.send(request).await?;

        tracing::debug!(status = response.status, "gitea response");

        if response.status == 429 {
            let retry_after = response
                .header("retry-after")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(StdDuration::from_secs);
            return Err(GiteaError::RateLimited { retry_after });
        }

        Ok(response)
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        match self.retry {
            Some(ref config) => {
                let context = format!("{} {}", request.method, request.url);
                with_retry(
                    || self.send_once(request.clone()),
                    config,
                    is_rate_limit_error,
                    short_error_message,
                    &context,
                )
                .await
            }
            None => self.send_once(request).await,
        }
    }

    /// Normalize pagination options into a query string.
    pub(crate) fn paged_query<O>(&self, options: &O) -> (ListOptions, Query)
    where
        O: PaginatedOptions + ?Sized,
    {
        let list = options.list_options().normalized(&self.page_limits);
        let mut query = Query::new();
        list.append_query(&mut query);
        options.append_query(&mut query);
        (list, query)
    }

    /// GET a JSON array endpoint as one page.
    pub(crate) async fn get_page<T, O>(&self, path: &str, options: &O) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        O: PaginatedOptions + ?Sized,
    {
        let (list, query) = self.paged_query(options);
        let (items, response) = self
            .request(HttpMethod::Get, path)
            .query(query)
            .send::<Vec<T>>()
            .await?;
        Ok(into_page(items, response, &list))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let (value, _) = self.request(HttpMethod::Get, path).send().await?;
        Ok(value)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (value, _) = self
            .request(HttpMethod::Post, path)
            .json(body)?
            .send()
            .await?;
        Ok(value)
    }

    pub(crate) async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (value, _) = self
            .request(HttpMethod::Patch, path)
            .json(body)?
            .send()
            .await?;
        Ok(value)
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (value, _) = self
            .request(HttpMethod::Put, path)
            .json(body)?
            .send()
            .await?;
        Ok(value)
    }

    /// Send a request without body and discard the (empty) response.
    pub(crate) async fn send_empty(&self, method: HttpMethod, path: &str) -> Result<()> {
        self.request(method, path).send_empty().await?;
        Ok(())
    }

    /// Send a request and return the status, whatever it is.
    pub(crate) async fn get_status_code(&self, method: HttpMethod, path: &str) -> Result<u16> {
        Ok(self.request(method, path).send_status().await?.status)
    }

    /// GET a presence endpoint: `present` maps to true, 404 to false.
    pub(crate) async fn check_presence(&self, path: &str, present: u16) -> Result<bool> {
        match self.get_status_code(HttpMethod::Get, path).await? {
            status if status == present => Ok(true),
            404 => Ok(false),
            other => Err(GiteaError::UnexpectedStatus(other)),
        }
    }

    pub(crate) async fn get_bytes(&self, path: &str, query: Query) -> Result<Vec<u8>> {
        let (bytes, _) = self
            .request(HttpMethod::Get, path)
            .query(query)
            .send_bytes()
            .await?;
        Ok(bytes)
    }
}

pub(crate) fn into_page<T>(items: Vec<T>, mut response: Response, list: &ListOptions) -> Page<T> {
    response.prepare_paginated(list, items.len());
    Page { items, response }
}

/// A request under construction.
pub(crate) struct ApiRequest<'a> {
    client: &'a Client,
    method: HttpMethod,
    path: String,
    query: Query,
    headers: HttpHeaders,
    body: Vec<u8>,
    basic_auth: Option<(String, String)>,
}

impl<'a> ApiRequest<'a> {
    pub(crate) fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = serde_json::to_vec(body)?;
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        Ok(self)
    }

    /// Override the client's credentials for this request.
    pub(crate) fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = Some((username.to_string(), password.to_string()));
        self
    }

    fn into_http(self) -> (&'a Client, HttpRequest) {
        let client = self.client;
        let mut url = format!("{}/api/v1{}", client.url, self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query.encode());
        }

        let mut headers = client.base_headers(self.basic_auth.as_ref());
        headers.extend(self.headers);

        let request = HttpRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
        };
        (client, request)
    }

    /// Send and return the raw response regardless of status.
    pub(crate) async fn send_status(self) -> Result<Response> {
        let (client, request) = self.into_http();
        let response = client.dispatch(request).await?;
        Ok(Response::from_http(&response))
    }

    async fn send_checked(self) -> Result<HttpResponse> {
        let (client, request) = self.into_http();
        let response = client.dispatch(request).await?;
        if !response.is_success() {
            let message = api_error_message(response.status, &response.body);
            tracing::debug!(status = response.status, %message, "gitea api error");
            return Err(GiteaError::Api {
                status: response.status,
                message,
            });
        }
        Ok(response)
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(self) -> Result<(T, Response)> {
        let response = self.send_checked().await?;
        let value = serde_json::from_slice(&response.body).map_err(GiteaError::Json)?;
        Ok((value, Response::from_http(&response)))
    }

    pub(crate) async fn send_bytes(self) -> Result<(Vec<u8>, Response)> {
        let response = self.send_checked().await?;
        let meta = Response::from_http(&response);
        Ok((response.body, meta))
    }

    pub(crate) async fn send_empty(self) -> Result<Response> {
        let response = self.send_checked().await?;
        Ok(Response::from_http(&response))
    }
}

/// Escape one URL path segment, rejecting empty ones.
pub(crate) fn escape_segment(segment: impl fmt::Display) -> Result<String> {
    let segment = segment.to_string();
    if segment.is_empty() {
        return Err(GiteaError::Validation(
            "path segment must not be empty".to_string(),
        ));
    }
    Ok(urlencoding::encode(&segment).into_owned())
}

/// Escape a slash-separated file path, keeping the slashes.
pub(crate) fn escape_file_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Build an API path from a format string, escaping every argument.
macro_rules! api_path {
    ($fmt:literal $(, $seg:expr)* $(,)?) => {
        format!($fmt $(, $crate::client::escape_segment($seg)?)*)
    };
}
pub(crate) use api_path;

//! Pagination options and response pagination metadata.
//!
//! Every list endpoint embeds a [`ListOptions`]. Before a request is sent the
//! options are normalized against the client's [`PageLimits`]:
//!
//! - `all = true` disables pagination (`page=0&limit=0`),
//! - page `0` becomes page `1`,
//! - page size `0` becomes the default page size,
//! - page sizes above the server maximum are clamped.
//!
//! Responses expose the server's `Link` and `x-total-count` headers through
//! [`Response`], which answers [`Response::has_next_page`].

use chrono::{DateTime, Utc};

use crate::http::{HttpHeaders, HttpResponse, header_get};

/// Page size used when the caller leaves `page_size` at zero.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the stock Gitea configuration accepts (`MAX_RESPONSE_ITEMS`).
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page-size bounds applied to every paginated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Build limits, keeping the default within `1..=max`.
    #[must_use]
    pub fn new(default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}

/// Page/page-size parameters shared by all paginated endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number; `0` means the first page.
    pub page: u32,
    /// Items per page; `0` means the default page size.
    pub page_size: u32,
    /// Ask the server for every item at once.
    pub all: bool,
}

impl ListOptions {
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            all: false,
        }
    }

    /// Options that disable pagination entirely.
    #[must_use]
    pub fn unpaginated() -> Self {
        Self {
            page: 0,
            page_size: 0,
            all: true,
        }
    }

    /// Apply defaults and clamp the page size.
    #[must_use]
    pub fn normalized(&self, limits: &PageLimits) -> ListOptions {
        if self.all {
            return ListOptions::unpaginated();
        }

        let page = self.page.max(1);
        let page_size = match self.page_size {
            0 => limits.default_page_size,
            n if n > limits.max_page_size => limits.max_page_size,
            n => n,
        };

        ListOptions {
            page,
            page_size,
            all: false,
        }
    }

    /// Append `page` and `limit` to `query`.
    pub fn append_query(&self, query: &mut Query) {
        query.push("page", self.page);
        query.push("limit", self.page_size);
    }
}

/// Options types that embed a [`ListOptions`].
pub trait PaginatedOptions {
    fn list_options(&self) -> &ListOptions;

    /// Add endpoint specific filters after `page` and `limit`.
    fn append_query(&self, _query: &mut Query) {}
}

impl PaginatedOptions for ListOptions {
    fn list_options(&self) -> &ListOptions {
        self
    }
}

/// Ordered query-string builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Push only when the string is not empty.
    pub fn push_non_empty(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(key, value);
        }
        self
    }

    /// Push `true` only when the flag is set.
    pub fn push_flag(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.push(key, true);
        }
        self
    }

    /// Push a repeated key, one entry per value.
    pub fn push_all<V: ToString>(&mut self, key: &str, values: &[V]) -> &mut Self {
        for value in values {
            self.push(key, value.to_string());
        }
        self
    }

    /// Push an RFC 3339 timestamp.
    pub fn push_time(&mut self, key: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `a=1&b=2` (no leading `?`).
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

/// Page numbers advertised by a `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPagination {
    pub first_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
}

/// Parse an RFC 8288 `Link` header into page numbers.
///
/// Example header:
/// ```text
/// <https://gitea.test/api/v1/repos/o/r/issues?page=3&limit=10>; rel="next",
/// <https://gitea.test/api/v1/repos/o/r/issues?page=4&limit=10>; rel="last"
/// ```
#[must_use]
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            match rel_type {
                "first" => info.first_page = Some(page_num),
                "prev" => info.prev_page = Some(page_num),
                "next" => info.next_page = Some(page_num),
                "last" => info.last_page = Some(page_num),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}

/// Rate limit headers, when the server (or a proxy in front of it) sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: usize,
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Extract rate limit info from response headers.
#[must_use]
pub fn parse_rate_limit_headers(headers: &HttpHeaders) -> Option<RateLimitInfo> {
    let limit = header_get(headers, "x-ratelimit-limit")?
        .parse::<usize>()
        .ok()?;
    let remaining = header_get(headers, "x-ratelimit-remaining")?
        .parse::<usize>()
        .ok()?;
    let reset_epoch = header_get(headers, "x-ratelimit-reset")?
        .parse::<i64>()
        .ok()?;
    let reset_at = DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(Utc::now);
    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
    })
}

/// Metadata of an API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HttpHeaders,
    pub first_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
    /// Value of `x-total-count`, when present.
    pub total_count: Option<u64>,
    pub rate_limit: Option<RateLimitInfo>,
}

impl Response {
    #[must_use]
    pub fn from_http(response: &HttpResponse) -> Self {
        let links = response
            .header("link")
            .map(parse_link_header)
            .unwrap_or_default();
        let total_count = response
            .header("x-total-count")
            .and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            status: response.status,
            headers: response.headers.clone(),
            first_page: links.first_page,
            prev_page: links.prev_page,
            next_page: links.next_page,
            last_page: links.last_page,
            total_count,
            rate_limit: parse_rate_limit_headers(&response.headers),
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Whether the server reports another page after this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fill in pagination fields the server did not send.
    ///
    /// Older servers (and some endpoints) omit the `Link` header. In that case
    /// the next page is derived from `x-total-count`, or, lacking that, from
    /// whether the page came back full.
    pub fn prepare_paginated(&mut self, options: &ListOptions, items_on_page: usize) {
        if options.all || options.page_size == 0 {
            return;
        }
        // Any `Link` relation means the server paginated this response itself.
        if self.first_page.is_some()
            || self.prev_page.is_some()
            || self.next_page.is_some()
            || self.last_page.is_some()
        {
            return;
        }

        let page = options.page.max(1);
        let page_size = u64::from(options.page_size);

        match self.total_count {
            Some(total) => {
                let last = total.div_ceil(page_size).max(1);
                let last = u32::try_from(last).unwrap_or(u32::MAX);
                self.last_page = Some(last);
                self.first_page = Some(1);
                if page > 1 {
                    self.prev_page = Some(page - 1);
                }
                if page < last {
                    self.next_page = page.checked_add(1);
                }
            }
            None => {
                if page > 1 {
                    self.prev_page = Some(page - 1);
                }
                if items_on_page as u64 >= page_size {
                    self.next_page = page.checked_add(1);
                }
            }
        }
    }
}

/// One page of results plus the response metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub response: Response,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.response.has_next_page()
    }

    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        self.response.next_page
    }

    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.response.total_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_applies_defaults() {
        let limits = PageLimits::default();
        let opts = ListOptions::default().normalized(&limits);
        assert_eq!(opts, ListOptions::new(1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn normalized_clamps_page_size_to_max() {
        let limits = PageLimits::default();
        let opts = ListOptions::new(3, 500).normalized(&limits);
        assert_eq!(opts.page, 3);
        assert_eq!(opts.page_size, MAX_PAGE_SIZE);

        let custom = PageLimits::new(20, 100);
        assert_eq!(ListOptions::new(1, 75).normalized(&custom).page_size, 75);
        assert_eq!(ListOptions::new(1, 0).normalized(&custom).page_size, 20);
    }

    #[test]
    fn normalized_unpaginated_sends_zeroes() {
        let opts = ListOptions {
            page: 7,
            page_size: 20,
            all: true,
        }
        .normalized(&PageLimits::default());
        let mut query = Query::new();
        opts.append_query(&mut query);
        assert_eq!(query.encode(), "page=0&limit=0");
    }

    #[test]
    fn page_limits_keep_default_within_max() {
        let limits = PageLimits::new(100, 30);
        assert_eq!(limits.default_page_size, 30);
        assert_eq!(limits.max_page_size, 30);

        let limits = PageLimits::new(0, 0);
        assert_eq!(limits.default_page_size, 1);
        assert_eq!(limits.max_page_size, 1);
    }

    #[test]
    fn query_encodes_in_insertion_order_and_escapes() {
        let mut query = Query::new();
        query
            .push("state", "all")
            .push_non_empty("q", "hello world&more")
            .push_non_empty("skip", "")
            .push_opt::<u32>("missing", None)
            .push_flag("binary", false)
            .push_flag("recursive", true)
            .push_all("status-types", &["unread", "pinned"]);
        assert_eq!(
            query.encode(),
            "state=all&q=hello+world%26more&recursive=true&status-types=unread&status-types=pinned"
        );
    }

    #[test]
    fn parse_link_header_extracts_all_relations() {
        let header = concat!(
            "<https://gitea.test/api/v1/repos/org1/repo1/issues?limit=1&page=3>; rel=\"next\",",
            "<https://gitea.test/api/v1/repos/org1/repo1/issues?limit=1&page=4>; rel=\"last\",",
            "<https://gitea.test/api/v1/repos/org1/repo1/issues?limit=1&page=1>; rel=\"first\",",
            "<https://gitea.test/api/v1/repos/org1/repo1/issues?limit=1&page=1>; rel=\"prev\""
        );
        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(3));
        assert_eq!(info.last_page, Some(4));
        assert_eq!(info.first_page, Some(1));
        assert_eq!(info.prev_page, Some(1));
    }

    #[test]
    fn parse_link_header_ignores_garbage() {
        let info = parse_link_header("not a link, <https://x.test/no-query>; rel=\"next\"");
        assert_eq!(info, LinkPagination::default());
    }

    #[test]
    fn response_from_http_reads_links_total_and_rate_limit() {
        let http = HttpResponse::new(200, "[]")
            .with_header(
                "Link",
                "<https://gitea.test/api/v1/user/repos?page=2&limit=10>; rel=\"next\"",
            )
            .with_header("X-Total-Count", "42")
            .with_header("X-RateLimit-Limit", "100")
            .with_header("X-RateLimit-Remaining", "99")
            .with_header("X-RateLimit-Reset", "1700000000");
        let resp = Response::from_http(&http);
        assert!(resp.has_next_page());
        assert_eq!(resp.next_page, Some(2));
        assert_eq!(resp.total_count, Some(42));
        let rate = resp.rate_limit.expect("rate limit headers");
        assert_eq!(rate.limit, 100);
        assert_eq!(rate.remaining, 99);
        assert_eq!(rate.reset_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn prepare_paginated_uses_total_count_without_link() {
        let http = HttpResponse::new(200, "[]").with_header("x-total-count", "25");
        let mut resp = Response::from_http(&http);
        resp.prepare_paginated(&ListOptions::new(2, 10), 10);
        assert_eq!(resp.next_page, Some(3));
        assert_eq!(resp.last_page, Some(3));
        assert_eq!(resp.prev_page, Some(1));

        let mut resp = Response::from_http(&http);
        resp.prepare_paginated(&ListOptions::new(3, 10), 5);
        assert!(!resp.has_next_page());
        assert_eq!(resp.last_page, Some(3));
    }

    #[test]
    fn prepare_paginated_falls_back_to_full_page_heuristic() {
        let http = HttpResponse::new(200, "[]");
        let mut full = Response::from_http(&http);
        full.prepare_paginated(&ListOptions::new(1, 10), 10);
        assert_eq!(full.next_page, Some(2));

        let mut partial = Response::from_http(&http);
        partial.prepare_paginated(&ListOptions::new(1, 10), 9);
        assert!(!partial.has_next_page());
    }

    #[test]
    fn prepare_paginated_keeps_server_links() {
        let http = HttpResponse::new(200, "[]")
            .with_header(
                "link",
                "<https://gitea.test/api/v1/x?page=5>; rel=\"last\"",
            )
            .with_header("x-total-count", "1000");
        let mut resp = Response::from_http(&http);
        resp.prepare_paginated(&ListOptions::new(5, 10), 10);
        assert!(!resp.has_next_page());
        assert_eq!(resp.last_page, Some(5));
    }

    #[test]
    fn prepare_paginated_trusts_link_without_next_on_last_page() {
        let http = HttpResponse::new(200, "[]").with_header(
            "link",
            "<https://gitea.test/api/v1/x?page=1>; rel=\"first\",\
             <https://gitea.test/api/v1/x?page=2>; rel=\"prev\"",
        );
        let mut resp = Response::from_http(&http);
        resp.prepare_paginated(&ListOptions::new(3, 10), 10);
        assert!(!resp.has_next_page());
        assert_eq!(resp.prev_page, Some(2));
        assert_eq!(resp.first_page, Some(1));
    }

    #[test]
    fn prepare_paginated_does_not_overflow_on_last_page_number() {
        let mut resp = Response::from_http(&HttpResponse::new(200, "[]"));
        resp.prepare_paginated(&ListOptions::new(u32::MAX, 10), 10);
        assert_eq!(resp.next_page, None);
        assert_eq!(resp.prev_page, Some(u32::MAX - 1));
    }

    #[test]
    fn query_push_all_repeats_the_key() {
        let mut query = Query::new();
        query.push_all("labels", &[1_i64, 2]).push_all("q", &["a b"]);
        assert_eq!(query.encode(), "labels=1&labels=2&q=a+b");
    }

    #[test]
    fn prepare_paginated_skips_unpaginated_requests() {
        let mut resp = Response::from_http(&HttpResponse::new(200, "[]"));
        resp.prepare_paginated(&ListOptions::unpaginated(), 500);
        assert!(!resp.has_next_page());
    }
}

//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::Client;
use crate::http::{HttpMethod, HttpResponse, MockTransport};

pub(crate) const BASE: &str = "https://gitea.test";

/// Full API URL for `path` (which may carry a query string).
pub(crate) fn api(path: &str) -> String {
    format!("{BASE}/api/v1{path}")
}

/// Client pinned to `version` so no `/version` request is made.
pub(crate) fn client_with_version(transport: &MockTransport, version: &str) -> Client {
    Client::builder(BASE)
        .token("test-token")
        .gitea_version(version)
        .transport(Arc::new(transport.clone()))
        .build()
        .expect("test client should build")
}

/// Client that discovers the version through `/version`.
pub(crate) fn client_without_version(transport: &MockTransport) -> Client {
    Client::builder(BASE)
        .token("test-token")
        .transport(Arc::new(transport.clone()))
        .build()
        .expect("test client should build")
}

pub(crate) fn push_json(
    transport: &MockTransport,
    method: HttpMethod,
    path: &str,
    status: u16,
    body: serde_json::Value,
) {
    transport.push_json(method, api(path), status, &body);
}

pub(crate) fn push_status(transport: &MockTransport, method: HttpMethod, path: &str, status: u16) {
    transport.push_response(method, api(path), HttpResponse::new(status, Vec::new()));
}

/// Decode the JSON body of the `index`th recorded request.
pub(crate) fn request_json(transport: &MockTransport, index: usize) -> serde_json::Value {
    let requests = transport.requests();
    serde_json::from_slice(&requests[index].body).expect("request body should be JSON")
}

pub(crate) fn request_urls(transport: &MockTransport) -> Vec<String> {
    transport.requests().into_iter().map(|r| r.url).collect()
}

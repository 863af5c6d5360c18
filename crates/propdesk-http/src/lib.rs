//! HTTP layer for Propdesk.
//!
//! Provides [`HttpClient`], the single configured transport every API call
//! goes through. Two interceptors run around each request:
//!
//! - **Request**: attaches `Authorization: Bearer <token>` when a token is
//!   stored under [`keys::AUTH_TOKEN`](propdesk_store::keys::AUTH_TOKEN).
//! - **Response**: on HTTP 401, deletes the stored token and user record.
//!   The caller still gets the error; navigation is not this layer's job.
//!
//! Every failure comes back as a typed [`ApiError`](propdesk_protocol::ApiError).

mod client;
mod error;
mod interceptor;

pub use client::HttpClient;
pub use reqwest::Method;
pub use reqwest::multipart;

use std::time::Duration;

use serde::Serialize;

use propdesk_protocol::ApiError;

/// Per-request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL used unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Prefix for every request path, e.g. `https://api.example.com/api`.
    pub base_url: String,
    /// Applied to each request as a whole (connect + response).
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Extra per-call settings: headers and query parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header. Later values for the same name replace earlier ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// A request body.
#[derive(Debug, Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// A JSON body (`Content-Type: application/json`).
    Json(serde_json::Value),
    /// A `multipart/form-data` body, used for image uploads.
    Multipart(multipart::Form),
}

impl Body {
    /// Serializes `value` into a JSON body.
    ///
    /// # Errors
    /// Returns [`ApiError::Unknown`] if `value` can't be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::unknown(e.to_string()))
    }
}

impl From<multipart::Form> for Body {
    fn from(form: multipart::Form) -> Self {
        Self::Multipart(form)
    }
}

/// Percent-encodes `value` as a single path segment, so an id containing
/// `/`, `?` or `#` can't change the endpoint it is placed in.
///
/// # Errors
/// Returns [`ApiError::Unknown`] for an empty value, `.` or `..`, none of
/// which can name a resource.
pub fn path_segment(value: &str) -> Result<String, ApiError> {
    if matches!(value, "" | "." | "..") {
        return Err(ApiError::unknown(format!("invalid path segment: {value:?}")));
    }
    let mut url = reqwest::Url::parse("http://localhost/")
        .map_err(|e| ApiError::unknown(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::unknown("url cannot have path segments"))?
        .clear()
        .push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}

//! The [`HttpClient`] and its request pipeline.

use std::sync::Arc;

use propdesk_protocol::ApiError;
use propdesk_store::{KeyValueStore, Storage};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Body, HttpConfig, RequestOptions, error, interceptor};

/// The configured transport shared by every API client.
///
/// Cloning is cheap: the underlying connection pool, the config, and the
/// storage handle are all shared.
pub struct HttpClient<S> {
    client: reqwest::Client,
    config: Arc<HttpConfig>,
    storage: Storage<S>,
}

impl<S> Clone for HttpClient<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            storage: self.storage.clone(),
        }
    }
}

impl<S: KeyValueStore> HttpClient<S> {
    /// Builds a client with the given config, reading tokens from and
    /// clearing them in `storage`.
    ///
    /// # Errors
    /// Returns [`ApiError::Unknown`] if the TLS backend can't be initialized.
    pub fn new(config: HttpConfig, storage: Storage<S>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::unknown(e.to_string()))?;
        Ok(Self {
            client,
            config: Arc::new(config),
            storage,
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, Body::Empty, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, body, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, body, options).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::PATCH, path, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, Body::Empty, options).await
    }

    /// Sends one request through both interceptors and decodes the body.
    ///
    /// An empty response body decodes as JSON `null`, so `T = ()` or
    /// `T = Option<_>` work for endpoints that return nothing.
    ///
    /// # Errors
    /// - [`ApiError::Transport`]: no response (unreachable, timed out).
    /// - [`ApiError::Application`]: non-2xx status; message from the body.
    /// - [`ApiError::Unknown`]: bad request setup or undecodable body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::unknown(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::unknown(format!("invalid header value: {e}")))?;
            request = request.header(name, value);
        }
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        let (request, authenticated) =
            interceptor::authorize(&self.storage, request).await;
        tracing::debug!(%method, path, authenticated, "sending request");

        let response = request.send().await.map_err(|e| error::send_error(&e))?;
        let status = response.status();
        interceptor::inspect_status(&self.storage, status, path).await;

        let bytes = response.bytes().await.map_err(|e| error::body_error(&e))?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            let err = ApiError::from_status(status.as_u16(), &body);
            tracing::debug!(%method, path, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }

        if bytes.is_empty() {
            return serde_json::from_value(Value::Null).map_err(|e| error::decode_error(&e));
        }
        serde_json::from_slice(&bytes).map_err(|e| error::decode_error(&e))
    }

    fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use propdesk_store::MemoryStore;

    use super::*;

    fn client(base: &str) -> HttpClient<MemoryStore> {
        HttpClient::new(HttpConfig::new(base), Storage::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path_with_single_slash() {
        assert_eq!(client("http://h/api/").url("/plots"), "http://h/api/plots");
        assert_eq!(client("http://h/api").url("plots"), "http://h/api/plots");
        assert_eq!(client("http://h/api").url("/rooms/1"), "http://h/api/rooms/1");
    }

    #[tokio::test]
    async fn test_invalid_header_name_is_unknown_error() {
        let http = client("http://127.0.0.1:1");
        let result: Result<Value, _> = http
            .get("/x", RequestOptions::new().header("bad header", "v"))
            .await;
        assert!(matches!(result, Err(ApiError::Unknown { .. })));
    }
}

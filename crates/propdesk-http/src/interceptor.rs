//! Request and response interceptors.
//!
//! Both read or write the shared [`Storage`]; neither ever fails the
//! request on a storage problem.

use propdesk_store::{KeyValueStore, Storage, keys};
use reqwest::{RequestBuilder, StatusCode};

/// Attaches the stored bearer token, if any.
///
/// Returns the builder and whether a token was attached. A failed token
/// read has already degraded to `None` inside [`Storage::get_item`], so the
/// request simply goes out unauthenticated.
pub(crate) async fn authorize<S: KeyValueStore>(
    storage: &Storage<S>,
    request: RequestBuilder,
) -> (RequestBuilder, bool) {
    match storage.get_item(keys::AUTH_TOKEN).await {
        Some(token) if !token.is_empty() => (request.bearer_auth(token), true),
        _ => (request, false),
    }
}

/// Reacts to a received response status.
///
/// A 401 means the stored credentials are no longer accepted: both the
/// token and the cached user are deleted. Every other status passes
/// through untouched.
pub(crate) async fn inspect_status<S: KeyValueStore>(
    storage: &Storage<S>,
    status: StatusCode,
    path: &str,
) {
    if status != StatusCode::UNAUTHORIZED {
        return;
    }
    tracing::warn!(path, "received 401, clearing stored credentials");
    if let Err(e) = storage
        .remove_items(&[keys::AUTH_TOKEN, keys::USER_DATA])
        .await
    {
        tracing::error!(error = %e, "failed to clear credentials after 401");
    }
}

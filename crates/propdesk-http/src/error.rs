//! Mapping from `reqwest` failures to [`ApiError`].

use propdesk_protocol::ApiError;

/// Classifies a failure that happened before a response was available.
///
/// Builder errors (a malformed URL, an invalid header) are programming
/// mistakes, not network trouble, so they keep their raw text.
pub(crate) fn send_error(e: &reqwest::Error) -> ApiError {
    if e.is_builder() {
        return ApiError::unknown(e.to_string());
    }
    tracing::debug!(error = %e, timeout = e.is_timeout(), "no response received");
    ApiError::network()
}

/// Classifies a failure while reading the body of a response.
pub(crate) fn body_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        return ApiError::network();
    }
    ApiError::unknown(e.to_string())
}

/// Classifies a body that arrived but doesn't match the expected type.
pub(crate) fn decode_error(e: &serde_json::Error) -> ApiError {
    tracing::debug!(error = %e, "response body did not decode");
    ApiError::unknown(format!("invalid response body: {e}"))
}

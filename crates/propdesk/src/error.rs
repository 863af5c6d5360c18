//! Unified error type for the Propdesk client.

use propdesk_protocol::ApiError;
use propdesk_session::SessionError;
use propdesk_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `propdesk` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` variants
/// let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PropdeskError {
    /// An API call failed (network, HTTP status, or undecodable body).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing persisted credentials failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session lifecycle operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A login response reported success but carried no token.
    #[error("login response did not include a token")]
    MissingToken,
}

impl PropdeskError {
    /// `true` when the underlying cause is an HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) | Self::Session(SessionError::Rejected(e)) => e.is_unauthorized(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err: PropdeskError = ApiError::network().into();
        assert!(matches!(err, PropdeskError::Api(_)));
        assert!(err.to_string().contains("Network error"));
    }

    #[test]
    fn test_from_store_error() {
        let err: PropdeskError = StoreError::Unavailable("disk gone".into()).into();
        assert!(matches!(err, PropdeskError::Store(_)));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_from_session_error() {
        let err: PropdeskError = SessionError::NotLoggedIn.into();
        assert!(matches!(err, PropdeskError::Session(_)));
    }

    #[test]
    fn test_is_unauthorized_sees_through_session_rejection() {
        let expired = ApiError::from_status(401, &serde_json::json!({ "error": "Token expired" }));
        let err: PropdeskError = SessionError::Rejected(expired).into();
        assert!(err.is_unauthorized());
        assert!(!PropdeskError::MissingToken.is_unauthorized());
    }
}

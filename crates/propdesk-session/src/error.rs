//! Error types for the session layer.

use propdesk_protocol::ApiError;
use propdesk_store::StoreError;

/// Errors returned by session lifecycle operations.
///
/// Profile-refresh failures during start-up never show up here: start-up
/// always reaches a terminal state. What does surface is anything that
/// means the session truth couldn't be recorded or was refused.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Persisting or clearing credentials failed.
    #[error("failed to persist session: {0}")]
    Storage(#[from] StoreError),

    /// The server refused the token (HTTP 401). The session is now
    /// anonymous and stored credentials have been cleared.
    #[error("session rejected: {0}")]
    Rejected(ApiError),

    /// The profile couldn't be fetched for a reason other than a rejected
    /// token. The session is unchanged.
    #[error("profile refresh failed: {0}")]
    Refresh(ApiError),

    /// `login` was handed an empty token.
    #[error("token is empty")]
    EmptyToken,

    /// The operation needs a signed-in session.
    #[error("not logged in")]
    NotLoggedIn,
}

//! The remote half of the session: fetching the profile and signing out.
//!
//! The session provider doesn't talk HTTP itself. It calls an
//! [`AuthService`], which the `propdesk` crate implements on top of the
//! real API client and which tests replace with a scripted mock.

use std::future::Future;

use propdesk_protocol::{ApiError, User};

/// Remote operations the session lifecycle depends on.
///
/// # Example
///
/// ```rust
/// use propdesk_protocol::{ApiError, User};
/// use propdesk_session::AuthService;
///
/// /// Always offline. Handy for exercising the stale-cache path.
/// struct Offline;
///
/// impl AuthService for Offline {
///     async fn fetch_profile(&self) -> Result<User, ApiError> {
///         Err(ApiError::network())
///     }
///
///     async fn logout(&self) -> Result<(), ApiError> {
///         Err(ApiError::network())
///     }
/// }
/// ```
pub trait AuthService: Send + Sync + 'static {
    /// Fetches the profile of whoever the stored token belongs to.
    ///
    /// A rejected token must come back as an error whose
    /// [`is_unauthorized`](ApiError::is_unauthorized) is `true`.
    fn fetch_profile(&self) -> impl Future<Output = Result<User, ApiError>> + Send;

    /// Tells the server the session is over.
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

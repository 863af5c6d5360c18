//! Session types: what the client currently believes about who is signed in.
//!
//! A [`Session`] tracks:
//! - WHETHER someone is signed in, and with WHICH token ([`SessionState`])
//! - WHO they are (the cached [`User`])
//! - WHETHER start-up is still deciding the above (`is_loading`)

use std::time::Duration;

use propdesk_protocol::User;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on the best-effort remote logout call. Local state is
    /// cleared once it completes, fails, or runs out of time.
    ///
    /// Default: 10 seconds.
    pub remote_logout_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remote_logout_timeout: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Whether the client is signed in.
///
/// ```text
///              ┌──(login)───────────────┐
///              │                        ▼
///   Anonymous ─┘                 Authenticated { token }
///       ▲                               │
///       └──(logout / token rejected)────┘
/// ```
///
/// The token lives inside `Authenticated`, so "signed in without a token"
/// can't be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nobody is signed in.
    Anonymous,

    /// Signed in with this bearer token.
    Authenticated { token: String },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A snapshot of the session.
///
/// Handed out by value; changing it requires going through the
/// [`SessionProvider`](crate::SessionProvider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    user: Option<User>,
    loading: bool,
}

impl Session {
    /// The state before start-up has looked at storage.
    pub(crate) fn initializing() -> Self {
        Self {
            state: SessionState::Anonymous,
            user: None,
            loading: true,
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
            user: None,
            loading: false,
        }
    }

    pub(crate) fn authenticated(token: String, user: Option<User>) -> Self {
        Self {
            state: SessionState::Authenticated { token },
            user,
            loading: false,
        }
    }

    /// Marks a snapshot as still loading (optimistic start-up).
    pub(crate) fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// `true` until start-up has reached a terminal state.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The bearer token, if signed in.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "1".into(),
            avatar: None,
            created_at: None,
        }
    }

    #[test]
    fn test_initializing_is_loading_and_logged_out() {
        let s = Session::initializing();
        assert!(s.is_loading());
        assert!(!s.is_logged_in());
        assert_eq!(s.token(), None);
        assert_eq!(s.user(), None);
    }

    #[test]
    fn test_authenticated_exposes_token_and_user() {
        let s = Session::authenticated("tok".into(), Some(user()));
        assert!(s.is_logged_in());
        assert!(!s.is_loading());
        assert_eq!(s.token(), Some("tok"));
        assert_eq!(s.user().map(|u| u.id.as_str()), Some("1"));
    }

    #[test]
    fn test_logged_in_always_has_token() {
        for s in [
            Session::initializing(),
            Session::anonymous(),
            Session::authenticated("t".into(), None),
            Session::authenticated("t".into(), None).loading(),
        ] {
            assert_eq!(s.is_logged_in(), s.token().is_some());
        }
    }

    #[test]
    fn test_default_config_logout_timeout() {
        assert_eq!(
            SessionConfig::default().remote_logout_timeout,
            Duration::from_secs(10)
        );
    }
}

//! The session provider: sole owner and writer of session state.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──→ [Initializing] ──initialize()──┬──→ [Anonymous]      (no token)
//!                                          └──→ [Authenticated]  (token found)
//!                                                   │  ▲
//!                                   logout() / 401  │  │ login()
//!                                                   ▼  │
//!                                              [Anonymous]
//! ```
//!
//! # Serialization
//!
//! Every lifecycle operation holds `op_lock` for its whole duration.
//! `tokio::sync::Mutex` is fair, so overlapping calls run one after another
//! in the order they were made instead of interleaving their awaits.

use propdesk_protocol::User;
use propdesk_store::{KeyValueStore, Storage, keys};
use tokio::sync::{Mutex, watch};

use crate::{AuthService, Session, SessionConfig, SessionError};

/// Owns the session and persists it through a [`Storage`].
pub struct SessionProvider<S, A> {
    storage: Storage<S>,
    auth: A,
    config: SessionConfig,
    state: watch::Sender<Session>,
    op_lock: Mutex<()>,
}

impl<S: KeyValueStore, A: AuthService> SessionProvider<S, A> {
    /// Creates a provider in the initializing state. Call
    /// [`initialize`](Self::initialize) once at start-up.
    pub fn new(storage: Storage<S>, auth: A) -> Self {
        Self::with_config(storage, auth, SessionConfig::default())
    }

    pub fn with_config(storage: Storage<S>, auth: A, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            storage,
            auth,
            config,
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// A snapshot of the current session.
    pub fn get_state(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribes to session changes.
    ///
    /// The receiver starts out holding the current snapshot; every
    /// transition after that marks it changed.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The auth service this provider calls.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Restores the persisted session.
    ///
    /// - No token stored → anonymous.
    /// - Token stored → authenticated right away with the cached user
    ///   (still loading), then the profile is refreshed. Fresh data is
    ///   written through to storage. If the server rejects the token (401)
    ///   the session becomes anonymous; any other failure keeps the cached
    ///   user.
    ///
    /// Never fails: every path ends in a terminal, non-loading state.
    /// Calling it again after start-up returns the current state untouched.
    pub async fn initialize(&self) -> Session {
        let _guard = self.op_lock.lock().await;

        let loading = self.state.borrow().is_loading();
        if !loading {
            tracing::debug!("session already initialized");
            return self.get_state();
        }

        let token = self
            .storage
            .get_item(keys::AUTH_TOKEN)
            .await
            .filter(|t| !t.is_empty());
        let cached: Option<User> = self.storage.get_object(keys::USER_DATA).await;

        let Some(token) = token else {
            tracing::info!("no stored token, starting anonymous");
            return self.transition(Session::anonymous());
        };

        self.transition(Session::authenticated(token.clone(), cached.clone()).loading());

        match self.auth.fetch_profile().await {
            Ok(user) => {
                if let Err(e) = self.storage.set_object(keys::USER_DATA, &user).await {
                    tracing::warn!(error = %e, "failed to cache refreshed profile");
                }
                self.transition(Session::authenticated(token, Some(user)))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("stored token rejected during start-up");
                if let Err(e) = self.clear_credentials().await {
                    tracing::warn!(error = %e, "failed to clear rejected credentials");
                }
                self.transition(Session::anonymous())
            }
            Err(e) => {
                tracing::warn!(error = %e, cached_user = cached.is_some(), "profile refresh failed, keeping cached user");
                self.transition(Session::authenticated(token, cached))
            }
        }
    }

    /// Signs in with a token obtained from the auth API.
    ///
    /// With `user`, it is persisted and used as is. Without, the profile
    /// is fetched and persisted; if that fetch fails for any reason other
    /// than a rejected token, the session is still authenticated, just
    /// without a user yet.
    ///
    /// # Errors
    /// - [`SessionError::EmptyToken`] if `token` is empty; nothing changes.
    /// - [`SessionError::Storage`] if the token or user can't be persisted.
    ///   A token that was already written is removed again and the session
    ///   is left anonymous.
    /// - [`SessionError::Rejected`] if the profile fetch answered 401; the
    ///   session is left anonymous.
    pub async fn login(
        &self,
        token: impl Into<String>,
        user: Option<User>,
    ) -> Result<Session, SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let _guard = self.op_lock.lock().await;

        self.storage.set_item(keys::AUTH_TOKEN, &token).await?;

        let user = match user {
            Some(user) => Some(user),
            None => match self.auth.fetch_profile().await {
                Ok(user) => Some(user),
                Err(e) if e.is_unauthorized() => {
                    tracing::info!("token rejected while fetching profile after login");
                    if let Err(e) = self.clear_credentials().await {
                        tracing::warn!(error = %e, "failed to clear rejected credentials");
                    }
                    self.transition(Session::anonymous());
                    return Err(SessionError::Rejected(e));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "profile fetch after login failed");
                    None
                }
            },
        };

        if let Some(user) = &user {
            if let Err(e) = self.storage.set_object(keys::USER_DATA, user).await {
                tracing::warn!(error = %e, "failed to persist user, rolling back login");
                if let Err(e) = self.clear_credentials().await {
                    tracing::warn!(error = %e, "failed to roll back stored token");
                }
                self.transition(Session::anonymous());
                return Err(e.into());
            }
        }

        tracing::info!(user_id = user.as_ref().map(|u| u.id.as_str()), "logged in");
        Ok(self.transition(Session::authenticated(token, user)))
    }

    /// Signs out.
    ///
    /// The remote logout is best-effort: its failure (or running past
    /// [`SessionConfig::remote_logout_timeout`]) is logged and ignored.
    /// Local state is then always reset to anonymous.
    ///
    /// # Errors
    /// [`SessionError::Storage`] if the stored credentials couldn't be
    /// removed. The in-memory session is anonymous regardless.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let _guard = self.op_lock.lock().await;

        match tokio::time::timeout(self.config.remote_logout_timeout, self.auth.logout()).await {
            Ok(Ok(())) => tracing::debug!("remote logout succeeded"),
            Ok(Err(e)) => tracing::warn!(error = %e, "remote logout failed, clearing local session anyway"),
            Err(_) => tracing::warn!("remote logout timed out, clearing local session anyway"),
        }

        let cleared = self.clear_credentials().await;
        self.transition(Session::anonymous());
        tracing::info!("logged out");
        cleared.map_err(SessionError::from)
    }

    /// Replaces the cached user, in storage first and then in memory.
    /// Token and login state are untouched.
    ///
    /// # Errors
    /// - [`SessionError::NotLoggedIn`] when anonymous; nothing is written.
    /// - [`SessionError::Storage`] if the user can't be persisted; the
    ///   in-memory user is then left as it was.
    pub async fn update_user(&self, user: User) -> Result<(), SessionError> {
        let _guard = self.op_lock.lock().await;

        if !self.state.borrow().is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }

        self.storage.set_object(keys::USER_DATA, &user).await?;
        tracing::debug!(user_id = %user.id, "user updated");
        self.state.send_modify(|s| s.set_user(user));
        Ok(())
    }

    /// Re-fetches the profile of the signed-in user and writes it through.
    ///
    /// # Errors
    /// - [`SessionError::NotLoggedIn`] when anonymous.
    /// - [`SessionError::Rejected`] on 401; the session becomes anonymous.
    /// - [`SessionError::Refresh`] on any other fetch failure.
    /// - [`SessionError::Storage`] if the fresh profile can't be persisted.
    pub async fn refresh(&self) -> Result<Session, SessionError> {
        let _guard = self.op_lock.lock().await;

        if !self.state.borrow().is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }

        match self.auth.fetch_profile().await {
            Ok(user) => {
                self.storage.set_object(keys::USER_DATA, &user).await?;
                self.state.send_modify(|s| s.set_user(user));
                Ok(self.get_state())
            }
            Err(e) if e.is_unauthorized() => {
                if let Err(e) = self.clear_credentials().await {
                    tracing::warn!(error = %e, "failed to clear rejected credentials");
                }
                self.transition(Session::anonymous());
                Err(SessionError::Rejected(e))
            }
            Err(e) => Err(SessionError::Refresh(e)),
        }
    }

    async fn clear_credentials(&self) -> Result<(), propdesk_store::StoreError> {
        self.storage
            .remove_items(&[keys::AUTH_TOKEN, keys::USER_DATA])
            .await
    }

    /// Publishes `next` and returns a copy of it.
    fn transition(&self, next: Session) -> Session {
        tracing::info!(
            logged_in = next.is_logged_in(),
            loading = next.is_loading(),
            has_user = next.user().is_some(),
            "session state changed"
        );
        self.state.send_replace(next.clone());
        next
    }
}

// =========================================================================
// Tests
// =========================================================================

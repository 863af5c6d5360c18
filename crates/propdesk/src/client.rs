//! `Propdesk` builder and client handle.
//!
//! This is the entry point for using the API from an application. It ties
//! together all the layers: store → http → auth/resources → session.

use std::sync::Arc;
use std::time::Duration;

use propdesk_http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpClient, HttpConfig};
use propdesk_protocol::{AuthPayload, LoginCredentials, RegisterCredentials};
use propdesk_session::{Session, SessionConfig, SessionProvider};
use propdesk_store::{KeyValueStore, Storage};

use crate::{AuthApi, PlotsApi, PropdeskError, RoomsApi, TenantsApi};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "PROPDESK_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PROPDESK_TIMEOUT_SECS";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Reads [`ENV_API_URL`] and [`ENV_TIMEOUT_SECS`], falling back to the
    /// defaults for anything unset. An unparsable timeout is ignored with a
    /// warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid timeout"),
            }
        }
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`Propdesk`] client.
///
/// # Example
///
/// ```rust,no_run
/// use propdesk::prelude::*;
///
/// # async fn run() -> Result<(), PropdeskError> {
/// let client = PropdeskBuilder::new()
///     .base_url("https://api.example.com/api")
///     .build(MemoryStore::new())?;
/// client.session().initialize().await;
/// # Ok(())
/// # }
/// ```
pub struct PropdeskBuilder {
    config: ClientConfig,
    session_config: SessionConfig,
}

impl PropdeskBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            session_config: SessionConfig::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Builds the client on top of `store`.
    ///
    /// The session starts out loading; call
    /// [`SessionProvider::initialize`] before relying on it.
    pub fn build<S: KeyValueStore>(self, store: S) -> Result<Propdesk<S>, PropdeskError> {
        let storage = Storage::new(store);
        let http = HttpClient::new(
            HttpConfig {
                base_url: self.config.base_url,
                timeout: self.config.timeout,
            },
            storage.clone(),
        )?;

        let auth = AuthApi::new(http.clone());
        let session = Arc::new(SessionProvider::with_config(
            storage.clone(),
            auth.clone(),
            self.session_config,
        ));

        tracing::debug!(base_url = %http.config().base_url, "propdesk client built");

        Ok(Propdesk {
            plots: PlotsApi::new(http.clone()),
            rooms: RoomsApi::new(http.clone()),
            tenants: TenantsApi::new(http),
            auth,
            session,
            storage,
        })
    }
}

impl Default for PropdeskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Propdesk
// ---------------------------------------------------------------------------

/// A configured client: API handles plus the session they share.
///
/// All handles go through the same HTTP client and storage, so a token
/// stored by [`sign_in`](Self::sign_in) is attached to every later call,
/// and a 401 from any endpoint clears it for all of them.
pub struct Propdesk<S> {
    auth: AuthApi<S>,
    plots: PlotsApi<S>,
    rooms: RoomsApi<S>,
    tenants: TenantsApi<S>,
    session: Arc<SessionProvider<S, AuthApi<S>>>,
    storage: Storage<S>,
}

impl<S: KeyValueStore> Propdesk<S> {
    pub fn auth(&self) -> &AuthApi<S> {
        &self.auth
    }

    pub fn plots(&self) -> &PlotsApi<S> {
        &self.plots
    }

    pub fn rooms(&self) -> &RoomsApi<S> {
        &self.rooms
    }

    pub fn tenants(&self) -> &TenantsApi<S> {
        &self.tenants
    }

    /// The shared session provider. Clone the `Arc` to hand it to other
    /// tasks.
    pub fn session(&self) -> &Arc<SessionProvider<S, AuthApi<S>>> {
        &self.session
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    /// Logs in with email and password and starts a session with the
    /// returned token.
    ///
    /// If the response carries the user it is stored as is; otherwise the
    /// session fetches the profile.
    ///
    /// # Errors
    /// - [`PropdeskError::Api`] if the login call fails or is refused.
    /// - [`PropdeskError::MissingToken`] if the server accepted the login
    ///   but sent no token.
    /// - [`PropdeskError::Session`] if the session couldn't be persisted.
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Session, PropdeskError> {
        let resp = self.auth.login(credentials).await?;
        let payload = resp.data.ok_or(PropdeskError::MissingToken)?;
        self.start_session(payload).await
    }

    /// Registers an account. When the server signs the new account in
    /// right away (answers with a token), a session is started and
    /// returned; otherwise `None`.
    ///
    /// # Errors
    /// - [`PropdeskError::Api`] if registration fails or is refused.
    /// - [`PropdeskError::Session`] if the session couldn't be persisted.
    pub async fn sign_up(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<Option<Session>, PropdeskError> {
        let resp = self.auth.register(credentials).await?;
        match resp.data {
            Some(payload) if payload.token.as_deref().is_some_and(|t| !t.is_empty()) => {
                self.start_session(payload).await.map(Some)
            }
            _ => {
                tracing::debug!(email = %credentials.email, "registered without a session");
                Ok(None)
            }
        }
    }

    /// Hands the token and user of an auth response to the session.
    async fn start_session(&self, payload: AuthPayload) -> Result<Session, PropdeskError> {
        let token = payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or(PropdeskError::MissingToken)?;
        Ok(self.session.login(token, payload.user).await?)
    }
}

//! Typed client for the `/auth` endpoints.

use propdesk_http::{Body, HttpClient, RequestOptions};
use propdesk_protocol::{
    ApiError, AuthResponse, LoginCredentials, ProfileResponse, RegisterCredentials,
    ResetPasswordCredentials, User,
};
use propdesk_session::AuthService;
use propdesk_store::KeyValueStore;

use crate::resources::expect_success;

/// Login, registration, profile and password reset.
///
/// Every method returns the server's envelope after checking it: an
/// envelope with `success: false` comes back as
/// [`ApiError::Application`] carrying the server's `error` or `message`.
pub struct AuthApi<S> {
    http: HttpClient<S>,
}

impl<S> Clone for AuthApi<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<S: KeyValueStore> AuthApi<S> {
    pub fn new(http: HttpClient<S>) -> Self {
        Self { http }
    }

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        tracing::debug!(email = %credentials.email, "logging in");
        self.post_auth("/auth/login", Body::json(credentials)?)
            .await
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<AuthResponse, ApiError> {
        tracing::debug!(email = %credentials.email, "registering");
        self.post_auth("/auth/register", Body::json(credentials)?)
            .await
    }

    /// `POST /auth/reset-password`. Without `token` this requests a reset
    /// link; with `token` and `password` it sets the new password.
    pub async fn reset_password(
        &self,
        credentials: &ResetPasswordCredentials,
    ) -> Result<AuthResponse, ApiError> {
        self.post_auth("/auth/reset-password", Body::json(credentials)?)
            .await
    }

    /// `GET /auth/profile`.
    pub async fn get_profile(&self) -> Result<ProfileResponse, ApiError> {
        let resp: ProfileResponse = self
            .http
            .get("/auth/profile", RequestOptions::new())
            .await?;
        resp.into_checked()
    }

    /// `POST /auth/logout`. Failures are logged and otherwise ignored;
    /// local sign-out never depends on the server.
    pub async fn logout(&self) {
        if let Err(e) = self.remote_logout().await {
            tracing::warn!(error = %e, "remote logout failed");
        }
    }

    async fn remote_logout(&self) -> Result<(), ApiError> {
        let resp = self
            .http
            .post("/auth/logout", Body::Empty, RequestOptions::new())
            .await?;
        expect_success(resp)
    }

    async fn post_auth(&self, path: &str, body: Body) -> Result<AuthResponse, ApiError> {
        let resp: AuthResponse = self.http.post(path, body, RequestOptions::new()).await?;
        resp.into_checked()
    }
}

impl<S: KeyValueStore> AuthService for AuthApi<S> {
    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get_profile().await?.into_data()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.remote_logout().await
    }
}

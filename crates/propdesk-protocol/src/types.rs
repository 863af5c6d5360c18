//! Auth-related wire types: the user record, credential payloads, and the
//! response envelope every endpoint wraps its data in.
//!
//! The API is written for a JavaScript client, so field names on the wire
//! are camelCase (`createdAt`, not `created_at`). The
//! `#[serde(rename_all = "camelCase")]` attributes below keep the Rust side
//! idiomatic while matching the JSON exactly.

use serde::{Deserialize, Serialize};

use crate::ApiError;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The signed-in user's profile.
///
/// Created from `/auth/profile` (or the `user` field of a login response),
/// cached locally under the `USER_DATA` key, and replaced whenever the
/// profile is refreshed.
///
/// Identifiers are strings: the server treats them as opaque.
///
/// `#[serde(skip_serializing_if = "Option::is_none")]` leaves absent optional
/// fields out of the JSON entirely, so a cached user written back to
/// storage looks the same as what the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Body of `POST /auth/reset-password`.
///
/// The first call sends only `email` (requesting a reset); the follow-up
/// sends the emailed `token` together with the new `password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordCredentials {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// ApiResponse envelope
// ---------------------------------------------------------------------------

/// The envelope every endpoint responds with:
///
/// ```text
/// { "success": true,  "data": { ... } }
/// { "success": false, "error": "Email already registered" }
/// ```
///
/// `data` is generic: `ApiResponse<User>` for the profile endpoint,
/// `ApiResponse<Vec<Plot>>` for a listing, and so on. Every field except
/// `success` is optional because the server omits whichever ones don't apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Turns a `success: false` envelope into [`ApiError::Application`].
    pub fn into_checked(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::rejected(
                self.error.as_deref(),
                self.message.as_deref(),
            ))
        }
    }

    /// Checks the envelope and takes its `data`.
    ///
    /// A successful envelope without `data` is [`ApiError::Unknown`].
    pub fn into_data(self) -> Result<T, ApiError> {
        self.into_checked()?
            .data
            .ok_or_else(|| ApiError::unknown("response contained no data"))
    }
}

/// The `data` of a login/register/reset response.
///
/// Both fields are optional: reset-password answers without them, and
/// some servers send the token without the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Response of login, register and reset-password.
pub type AuthResponse = ApiResponse<AuthPayload>;

/// Response of `GET /auth/profile`.
pub type ProfileResponse = ApiResponse<User>;

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_deserializes_minimal_record() {
        // This is the exact shape cached under USER_DATA by older clients.
        let user: User = serde_json::from_value(json!({
            "id": "1", "name": "A", "email": "a@x.com", "phone": "1"
        }))
        .unwrap();

        assert_eq!(user.id, "1");
        assert_eq!(user.avatar, None);
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn test_user_uses_camel_case_and_omits_absent_fields() {
        let user = User {
            id: "7".into(),
            name: "Grace".into(),
            email: "g@x.com".into(),
            phone: "555".into(),
            avatar: None,
            created_at: Some("2024-01-02T00:00:00Z".into()),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["createdAt"], "2024-01-02T00:00:00Z");
        assert!(json.get("avatar").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_api_response_parses_failure_without_data() {
        let resp: ProfileResponse = serde_json::from_value(json!({
            "success": false,
            "error": "Token expired"
        }))
        .unwrap();

        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("Token expired"));
    }

    #[test]
    fn test_auth_response_parses_token_and_user() {
        let resp: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "token": "tok",
                "user": { "id": "2", "name": "B", "email": "b@x.com", "phone": "2" }
            },
            "message": "Welcome back"
        }))
        .unwrap();

        let data = resp.data.unwrap();
        assert_eq!(data.token.as_deref(), Some("tok"));
        assert_eq!(data.user.unwrap().name, "B");
    }

    #[test]
    fn test_reset_password_request_omits_unset_fields() {
        let body = ResetPasswordCredentials {
            email: "a@x.com".into(),
            password: None,
            token: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!({ "email": "a@x.com" }));
    }

    #[test]
    fn test_into_data_failed_envelope_is_application_error() {
        let resp: ProfileResponse =
            serde_json::from_str(r#"{"success":false,"message":"Invalid credentials"}"#).unwrap();

        let err = resp.into_data().unwrap_err();

        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_into_data_missing_data_is_unknown() {
        let resp: ProfileResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();

        assert!(matches!(resp.into_data(), Err(ApiError::Unknown { .. })));
    }

    #[test]
    fn test_into_checked_keeps_payload_without_data() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"success":true,"message":"Reset link sent"}"#).unwrap();

        let resp = resp.into_checked().unwrap();

        assert_eq!(resp.message.as_deref(), Some("Reset link sent"));
        assert!(resp.data.is_none());
    }
}

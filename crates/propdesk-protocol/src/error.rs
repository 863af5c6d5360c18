//! The error taxonomy for API calls.
//!
//! Every failed request ends up as exactly one [`ApiError`] variant, so
//! callers pattern-match on the kind of failure instead of probing
//! response bodies:
//!
//! - **Transport**: no response arrived (DNS, refused connection, timeout).
//! - **Application**: the server answered with a non-2xx status, or with
//!   a 2xx envelope that says `success: false`.
//! - **Unknown**: a response arrived but couldn't be understood, or the
//!   failure doesn't fit either bucket above.

use serde_json::Value;

/// The message shown for any failure where no response was received.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection.";

/// A failed API call, normalized into a human-readable message.
///
/// The `Display` output of every variant is exactly `message`, so UI code
/// can show `err.to_string()` without knowing the variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("{message}")]
    Transport { message: String },

    /// The server rejected the request.
    ///
    /// `status` is `None` when the rejection came from a 2xx envelope with
    /// `success: false`.
    #[error("{message}")]
    Application {
        status: Option<u16>,
        message: String,
    },

    /// Anything else, carrying the raw error text.
    #[error("{message}")]
    Unknown { message: String },
}

impl ApiError {
    /// A transport failure with the standard network-error message.
    pub fn network() -> Self {
        Self::Transport {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Builds an `Application` error from an HTTP status and its body.
    ///
    /// The message is the body's `error` field, else its `message` field,
    /// else `Request failed with status code {status}`.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            format!("Request failed with status code {status}")
        });
        Self::Application {
            status: Some(status),
            message,
        }
    }

    /// Builds an `Application` error for a 2xx envelope that reported
    /// `success: false`.
    pub fn rejected(error: Option<&str>, message: Option<&str>) -> Self {
        let message = error
            .filter(|m| !m.is_empty())
            .or(message.filter(|m| !m.is_empty()))
            .unwrap_or("Request failed")
            .to_string();
        Self::Application {
            status: None,
            message,
        }
    }

    /// Wraps any other failure, keeping its raw text.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => *status,
            Self::Transport { .. } | Self::Unknown { .. } => None,
        }
    }

    /// Returns `true` if the server answered 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Application { message, .. }
            | Self::Unknown { message } => message,
        }
    }
}

/// Pulls `error`, then `message`, out of a JSON error body.
fn server_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|field| {
        body.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    })
}

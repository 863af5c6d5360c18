//! Session management for Propdesk.
//!
//! This crate owns the answer to "is someone signed in, and who?":
//!
//! 1. **Start-up**: restoring a persisted token and cached user, then
//!    refreshing the profile ([`SessionProvider::initialize`])
//! 2. **Lifecycle**: `login`, `logout`, `update_user`, `refresh`
//! 3. **Observation**: a snapshot ([`SessionProvider::get_state`]) and a
//!    change feed ([`SessionProvider::subscribe`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Screens / CLI (above)  ← read session state, call lifecycle ops
//!     ↕
//! Session Layer (this crate)  ← sole writer of session state
//!     ↕
//! Store + AuthService (below)  ← persisted credentials, remote profile
//! ```

mod auth;
mod error;
mod provider;
mod session;

pub use auth::AuthService;
pub use error::SessionError;
pub use provider::SessionProvider;
pub use session::{Session, SessionConfig, SessionState};

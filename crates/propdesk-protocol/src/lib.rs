//! Wire protocol for Propdesk.
//!
//! This crate defines the "language" the client and the property API speak:
//!
//! - **Types** ([`User`], [`ApiResponse`], credential payloads): the JSON
//!   bodies that travel to and from `/auth/*`.
//! - **Resources** ([`Plot`], [`Room`], [`Tenant`] and their create/update
//!   payloads): the CRUD models behind `/plots`, `/rooms`, `/tenants`.
//! - **Errors** ([`ApiError`]): the typed outcome of a failed API call.
//!
//! # Architecture
//!
//! The protocol layer sits below both the HTTP client and the session
//! provider. It doesn't know how requests are sent or where tokens live;
//! it only knows what the payloads look like.
//!
//! ```text
//! HTTP client (requests) → Protocol (typed bodies) ← Session (current user)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod resources;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::{ApiError, NETWORK_ERROR_MESSAGE};
pub use resources::{
    NewPlot, NewRoom, NewTenant, Plot, PlotUpdate, Room, RoomStatus,
    RoomUpdate, Tenant, TenantUpdate,
};
pub use types::{
    ApiResponse, AuthPayload, AuthResponse, LoginCredentials,
    ProfileResponse, RegisterCredentials, ResetPasswordCredentials, User,
};

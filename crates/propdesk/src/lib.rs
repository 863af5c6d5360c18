//! # Propdesk
//!
//! Client SDK for the Propdesk property-management API.
//!
//! Propdesk keeps one authenticated session on top of a pluggable
//! key-value store: the bearer token and cached user survive restarts,
//! every request carries the token, and a 401 from any endpoint signs the
//! client out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use propdesk::prelude::*;
//!
//! # async fn run() -> Result<(), PropdeskError> {
//! propdesk::init_tracing();
//!
//! let client = PropdeskBuilder::new()
//!     .base_url("https://api.example.com/api")
//!     .build(FileStore::new("propdesk-session.json"))?;
//!
//! if !client.session().initialize().await.is_logged_in() {
//!     client
//!         .sign_in(&LoginCredentials {
//!             email: "a@x.com".into(),
//!             password: "secret".into(),
//!         })
//!         .await?;
//! }
//!
//! for plot in client.plots().list().await? {
//!     println!("{} ({})", plot.name, plot.address);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
mod resources;

pub use auth::AuthApi;
pub use client::{ClientConfig, ENV_API_URL, ENV_TIMEOUT_SECS, Propdesk, PropdeskBuilder};
pub use error::PropdeskError;
pub use resources::{PlotsApi, RoomsApi, TenantsApi, Upload};

pub use propdesk_http as http;
pub use propdesk_protocol as protocol;
pub use propdesk_session as session;
pub use propdesk_store as store;

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`
/// (default `info`).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everyday imports.
pub mod prelude {
    pub use crate::{
        AuthApi, ClientConfig, PlotsApi, Propdesk, PropdeskBuilder, PropdeskError, RoomsApi,
        TenantsApi, Upload,
    };
    pub use propdesk_protocol::{
        ApiError, LoginCredentials, NewPlot, NewRoom, NewTenant, Plot, PlotUpdate,
        RegisterCredentials, ResetPasswordCredentials, Room, RoomStatus, RoomUpdate, Tenant,
        TenantUpdate, User,
    };
    pub use propdesk_session::{Session, SessionConfig, SessionError, SessionProvider, SessionState};
    pub use propdesk_store::{FileStore, KeyValueStore, MemoryStore, Storage};
}

//! Persistent key-value storage for Propdesk.
//!
//! Provides the [`KeyValueStore`] trait that abstracts over where session
//! data lives (a file on the device, memory in tests), and the
//! [`Storage`] handle that the rest of the client talks to.
//!
//! # Failure policy
//!
//! Backends report every failure. [`Storage`] decides what callers see:
//! reads that fail are logged and come back as "absent", writes that fail
//! are returned as [`StoreError`]. Callers must always tolerate missing
//! data.

mod error;
mod file;
mod memory;
mod storage;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use storage::Storage;

use std::future::Future;

/// Well-known keys used by the session layer.
pub mod keys {
    /// The opaque bearer token.
    pub const AUTH_TOKEN: &str = "AUTH_TOKEN";
    /// The JSON-serialized signed-in user.
    pub const USER_DATA: &str = "USER_DATA";
}

/// A string-to-string store that survives restarts (or not, for
/// [`MemoryStore`]).
///
/// All methods are fallible and async so backends can hit the disk
/// without blocking the runtime.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `Ok(None)` if absent.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `key`. Removing a key that doesn't exist is not an error.
    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes every key.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

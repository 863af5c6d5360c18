//! The [`Storage`] handle: the read/write policy on top of a backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KeyValueStore, StoreError};

/// A cheaply cloneable handle to a shared [`KeyValueStore`].
///
/// Reads never fail from the caller's point of view: a backend error is
/// logged at `warn` and reported as `None`. Writes return their error.
pub struct Storage<S> {
    inner: Arc<S>,
}

impl<S> Clone for Storage<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps a store that is already shared.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self { inner: store }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &S {
        &self.inner
    }

    /// Returns the string under `key`, or `None` if it's absent or the
    /// read failed.
    pub async fn get_item(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, treating as absent");
                None
            }
        }
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await.inspect_err(|e| {
            tracing::error!(key, error = %e, "storage write failed");
        })
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await.inspect_err(|e| {
            tracing::error!(key, error = %e, "storage remove failed");
        })
    }

    /// Removes every key in `keys`.
    ///
    /// All removals are attempted even if one fails; the first failure is
    /// returned.
    pub async fn remove_items(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut first_err = None;
        for key in keys {
            if let Err(e) = self.remove_item(key).await {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await.inspect_err(|e| {
            tracing::error!(error = %e, "storage clear failed");
        })
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn set_object<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json).await
    }

    /// Reads and deserializes the JSON under `key`.
    ///
    /// A value that doesn't decode as `T` is logged and treated as absent.
    pub async fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is not valid JSON for this type");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    /// A backend where every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        async fn clear(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn test_get_item_degrades_to_none_on_backend_failure() {
        let storage = Storage::new(BrokenStore);
        assert_eq!(storage.get_item("AUTH_TOKEN").await, None);
    }

    #[tokio::test]
    async fn test_writes_propagate_backend_failure() {
        let storage = Storage::new(BrokenStore);

        assert!(matches!(
            storage.set_item("k", "v").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(storage.remove_item("k").await.is_err());
        assert!(storage.clear().await.is_err());
        assert!(storage.set_object("k", &vec![1, 2]).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_items_reports_first_failure() {
        let storage = Storage::new(BrokenStore);
        let result = storage.remove_items(&["a", "b"]).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_get_object_with_wrong_shape_is_none() {
        let storage = Storage::new(MemoryStore::with_entries([("n", "\"text\"")]));
        let value: Option<u32> = storage.get_object("n").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_clones_share_the_same_backend() {
        let storage = Storage::new(MemoryStore::new());
        let other = storage.clone();

        storage.set_item("k", "v").await.unwrap();

        assert_eq!(other.get_item("k").await.as_deref(), Some("v"));
    }
}

use crate::KvKey;
use errors::{ListError, SetError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Where key-value records are stored.
///
/// It is a thin wrapper
/// [around your chosen storage backend implementation][`KvStorageBackend`],
/// removing the need to specify the concrete type of the storage backend
/// everywhere in your code.
///
/// Cloning a [`KvStore`] is cheap: all clones share the same backend.
#[derive(Debug, Clone)]
pub struct KvStore(Arc<dyn KvStorageBackend>);

impl KvStore {
    /// Creates a new store using the provided backend.
    pub fn new<Backend>(backend: Backend) -> Self
    where
        Backend: KvStorageBackend + 'static,
    {
        Self(Arc::new(backend))
    }

    /// Store `value` under `key`.
    ///
    /// If there is already a record for `key`, it is overwritten.
    pub async fn set<T>(&self, key: &KvKey, value: &T) -> Result<(), SetError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.0.set(key, value).await
    }

    /// Retrieve all the records stored in `namespace`, in ascending key order.
    ///
    /// Every value is deserialized into `T`.
    /// The whole namespace is scanned: the cost grows linearly with the number of records.
    pub async fn list<T>(&self, namespace: &str) -> Result<Vec<KvEntry<T>>, ListError>
    where
        T: DeserializeOwned,
    {
        self.0
            .list(namespace)
            .await?
            .into_iter()
            .map(|entry| {
                let value = serde_json::from_value(entry.value).map_err(|e| {
                    ListError::Deserialization(anyhow::Error::new(e).context(format!(
                        "Failed to deserialize the value stored under {}",
                        entry.key
                    )))
                })?;
                Ok(KvEntry {
                    key: entry.key,
                    value,
                })
            })
            .collect()
    }

    /// Release the resources held by the underlying backend (e.g. a connection pool).
    ///
    /// The store should not be used after it has been closed.
    pub async fn close(&self) {
        self.0.close().await
    }
}

#[async_trait::async_trait]
/// The interface of a key-value storage backend.
pub trait KvStorageBackend: std::fmt::Debug + Send + Sync {
    /// Store `value` under `key`, atomically replacing any existing record.
    async fn set(&self, key: &KvKey, value: serde_json::Value) -> Result<(), SetError>;

    /// Return all the records stored in `namespace`, sorted by key in ascending order.
    ///
    /// The returned records must be a consistent snapshot of the namespace
    /// at some point during the call.
    async fn list(&self, namespace: &str) -> Result<Vec<KvEntry>, ListError>;

    /// Release the resources held by the backend.
    ///
    /// The default implementation does nothing.
    async fn close(&self) {}
}

#[derive(Debug, Clone, PartialEq)]
/// A record retrieved from a [`KvStore`].
pub struct KvEntry<T = serde_json::Value> {
    /// The key the record is stored under.
    pub key: KvKey,
    /// The stored value.
    pub value: T,
}

/// Errors that can occur when interacting with a key-value storage backend.
pub mod errors {
    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`KvStore::set`](crate::KvStore::set).
    pub enum SetError {
        /// Failed to serialize the value.
        #[error("Failed to serialize the value.")]
        Serialization(#[from] serde_json::Error),
        /// Something else went wrong when storing the value.
        #[error("Something went wrong when storing the value.")]
        Other(#[source] anyhow::Error),
    }

    #[non_exhaustive]
    #[derive(Debug, thiserror::Error)]
    /// The error returned by [`KvStore::list`](crate::KvStore::list).
    pub enum ListError {
        /// One of the stored values couldn't be deserialized.
        #[error("Failed to deserialize a stored value.")]
        Deserialization(#[source] anyhow::Error),
        #[error(transparent)]
        /// One of the stored keys couldn't be decoded.
        InvalidKey(#[from] InvalidKeyError),
        /// Something else went wrong when listing the records.
        #[error("Something went wrong when listing the stored records.")]
        Other(#[source] anyhow::Error),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("`{raw}` is not a valid encoded key part.")]
    /// A key retrieved from the storage backend doesn't follow the expected encoding.
    pub struct InvalidKeyError {
        /// The raw key, as retrieved from the backend.
        pub raw: String,
    }
}

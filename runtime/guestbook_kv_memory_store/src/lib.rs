//! An in-memory storage backend for [`guestbook_kv`].
//!
//! Check out [`InMemoryKvStore`] for more details.
use guestbook_kv::store::errors::{ListError, SetError};
use guestbook_kv::store::{KvEntry, KvStorageBackend};
use guestbook_kv::{KvKey, KvStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
/// An in-memory key-value store.
///
/// # Limitations
///
/// Records are lost when the process exits and they are not shared
/// across different instances of the application.
/// This store is meant for testing and local development.
///
/// # Implementation details
///
/// Records are kept in a [`BTreeMap`] ordered by [`KvKey`], behind a single lock.
/// Listing a namespace is a range scan over the map, so it always returns
/// a consistent snapshot.
pub struct InMemoryKvStore(Arc<Mutex<BTreeMap<KvKey, serde_json::Value>>>);

impl From<InMemoryKvStore> for KvStore {
    fn from(value: InMemoryKvStore) -> Self {
        KvStore::new(value)
    }
}

impl InMemoryKvStore {
    /// Creates a new (empty) in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStorageBackend for InMemoryKvStore {
    #[tracing::instrument(
        name = "Store key-value record",
        level = tracing::Level::TRACE,
        skip_all,
        fields(key = %key)
    )]
    async fn set(&self, key: &KvKey, value: serde_json::Value) -> Result<(), SetError> {
        let mut guard = self.0.lock().await;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    #[tracing::instrument(
        name = "List key-value records",
        level = tracing::Level::TRACE,
        skip(self)
    )]
    async fn list(&self, namespace: &str) -> Result<Vec<KvEntry>, ListError> {
        let guard = self.0.lock().await;
        let entries = guard
            .range(KvKey::namespace_start(namespace.to_owned())..)
            .take_while(|(key, _)| key.namespace() == namespace)
            .map(|(key, value)| KvEntry {
                key: key.to_owned(),
                value: value.to_owned(),
            })
            .collect();
        Ok(entries)
    }
}

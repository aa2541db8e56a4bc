//! The comment log: entries are keyed by title, later submissions overwrite earlier ones.
use guestbook_kv::store::errors::{ListError, SetError};
use guestbook_kv::{KvKey, KvStore};

/// The namespace holding all comments.
pub const COMMENTS_NAMESPACE: &str = "comments";

/// Persist `content` under `title`, replacing any previous content for the same title.
pub async fn write(store: &KvStore, title: &str, content: &str) -> Result<(), SetError> {
    store
        .set(&KvKey::new(COMMENTS_NAMESPACE, title), content)
        .await
}

/// Retrieve every comment as a `"<title>: <content>"` line, in ascending title order.
pub async fn read_all(store: &KvStore) -> Result<Vec<String>, ListError> {
    let entries = store.list::<String>(COMMENTS_NAMESPACE).await?;
    Ok(entries
        .into_iter()
        .map(|entry| format!("{}: {}", entry.key.part(), entry.value))
        .collect())
}

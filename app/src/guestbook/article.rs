//! The article log: every submission is a new entry keyed by its timestamp.
use guestbook_kv::store::errors::{ListError, SetError};
use guestbook_kv::{KvKey, KvStore};

/// The namespace holding all articles.
pub const ARTICLES_NAMESPACE: &str = "articles";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
/// A guestbook article.
pub struct Article {
    /// When the article was submitted, in milliseconds since the Unix epoch.
    ///
    /// It doubles as the article key: two articles submitted within the same
    /// millisecond collide, and the latest one wins.
    pub timestamp: i64,
    pub title: String,
    pub content: String,
}

/// Persist `article` under its timestamp.
pub async fn write(store: &KvStore, article: &Article) -> Result<(), SetError> {
    store
        .set(&KvKey::new(ARTICLES_NAMESPACE, article.timestamp), article)
        .await
}

/// Retrieve every article, newest first.
pub async fn read_all(store: &KvStore) -> Result<Vec<Article>, ListError> {
    let entries = store.list::<Article>(ARTICLES_NAMESPACE).await?;
    Ok(entries.into_iter().rev().map(|entry| entry.value).collect())
}

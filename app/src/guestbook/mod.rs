//! The guestbook: submissions, storage and retrieval.
//!
//! Two storage models are available, selected via [`GuestbookVariant`]:
//!
//! - [`article`]: an append-only log keyed by submission time, displayed newest first;
//! - [`comment`]: a map keyed by title, displayed in ascending title order.
pub mod article;
pub mod comment;
mod errors;

pub use errors::GuestbookError;

use crate::configuration::{GuestbookConfig, GuestbookVariant, WritePolicy};
use article::Article;
use guestbook_kv::KvStore;
use jiff::Timestamp;

/// The title recorded when the submission doesn't provide one.
pub const DEFAULT_TITLE: &str = "-";
/// The content recorded when the submission doesn't provide one.
pub const DEFAULT_CONTENT: &str = "---";

#[derive(serde::Deserialize, Debug, Default, Clone)]
/// The query parameters accepted by the guestbook page.
///
/// A parameter may be repeated: only its first occurrence is used.
pub struct GuestbookQuery {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A title/content pair ready to be recorded.
pub struct Submission {
    pub title: String,
    pub content: String,
    explicit: bool,
}

impl Submission {
    /// Build a submission from the page's query parameters.
    ///
    /// Missing or empty parameters are replaced by [`DEFAULT_TITLE`] and [`DEFAULT_CONTENT`].
    pub fn from_query(query: GuestbookQuery) -> Self {
        let explicit = !query.title.is_empty() || !query.content.is_empty();
        Self {
            title: or_default(query.title.into_iter().next(), DEFAULT_TITLE),
            content: or_default(query.content.into_iter().next(), DEFAULT_CONTENT),
            explicit,
        }
    }

    /// `true` if at least one of `title` or `content` was present in the query.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The entries stored in the guestbook, in display order.
pub enum Entries {
    /// Newest first.
    Articles(Vec<Article>),
    /// Formatted as `"<title>: <content>"`, in ascending title order.
    Comments(Vec<String>),
}

impl Entries {
    pub fn len(&self) -> usize {
        match self {
            Entries::Articles(a) => a.len(),
            Entries::Comments(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
/// A guestbook backed by a [`KvStore`].
///
/// The storage model is chosen once, at construction time, via [`GuestbookVariant`].
pub struct Guestbook {
    store: KvStore,
    variant: GuestbookVariant,
    write_policy: WritePolicy,
}

impl Guestbook {
    pub fn new(store: KvStore, config: &GuestbookConfig) -> Self {
        Self {
            store,
            variant: config.variant,
            write_policy: config.write_policy,
        }
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Record `submission`, as of `now`.
    ///
    /// It returns `false` if the write policy skipped the submission.
    #[tracing::instrument(
        name = "Record guestbook submission",
        skip_all,
        fields(variant = ?self.variant, explicit = submission.is_explicit())
    )]
    pub async fn record(
        &self,
        submission: &Submission,
        now: Timestamp,
    ) -> Result<bool, GuestbookError> {
        if self.write_policy == WritePolicy::OnSubmit && !submission.is_explicit() {
            return Ok(false);
        }
        match self.variant {
            GuestbookVariant::Articles => {
                let article = Article {
                    timestamp: now.as_millisecond(),
                    title: submission.title.clone(),
                    content: submission.content.clone(),
                };
                article::write(&self.store, &article).await?;
            }
            GuestbookVariant::Comments => {
                comment::write(&self.store, &submission.title, &submission.content).await?;
            }
        }
        Ok(true)
    }

    /// Retrieve every entry, in display order.
    #[tracing::instrument(
        name = "Retrieve guestbook entries",
        skip_all,
        fields(variant = ?self.variant)
    )]
    pub async fn entries(&self) -> Result<Entries, GuestbookError> {
        let entries = match self.variant {
            GuestbookVariant::Articles => Entries::Articles(article::read_all(&self.store).await?),
            GuestbookVariant::Comments => Entries::Comments(comment::read_all(&self.store).await?),
        };
        Ok(entries)
    }
}

//! The configuration values required by the application.
//!
//! The HTTP server configuration lives in the `server` crate: the types here
//! only cover what request handlers need.
use std::path::PathBuf;

#[derive(serde::Deserialize, Debug, Clone)]
/// The configuration object holding all the values required
/// to configure the application.
pub struct AppConfig {
    pub guestbook: GuestbookConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn guestbook_config(&self) -> &GuestbookConfig {
        &self.guestbook
    }

    pub fn store_config(&self) -> &StoreConfig {
        &self.store
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
/// How the guestbook stores and displays submissions.
pub struct GuestbookConfig {
    /// Which log submissions are recorded into.
    ///
    /// Set the `APP_GUESTBOOK__VARIANT` environment variable to override its value.
    pub variant: GuestbookVariant,
    /// Whether a page view without parameters records a placeholder entry.
    ///
    /// Defaults to [`WritePolicy::Always`].
    #[serde(default)]
    pub write_policy: WritePolicy,
    /// The IANA name of the time zone used to display article timestamps,
    /// e.g. `Europe/Rome`.
    ///
    /// The system time zone is used if missing.
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// The storage model of the guestbook.
pub enum GuestbookVariant {
    /// Every submission is a new article, keyed by its timestamp.
    /// Articles are displayed newest first.
    Articles,
    /// Submissions are keyed by title: a later submission with the same title
    /// replaces the previous content.
    /// Comments are displayed in ascending title order.
    Comments,
}

#[derive(serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// When a page view writes to the guestbook.
pub enum WritePolicy {
    /// Every page view writes an entry. Missing parameters are replaced by placeholders.
    #[default]
    Always,
    /// Only page views carrying a `title` or a `content` query parameter write an entry.
    OnSubmit,
}

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(tag = "backend", rename_all = "snake_case")]
/// The storage backend used by the guestbook.
///
/// Set the `APP_STORE__BACKEND` environment variable to override the backend.
pub enum StoreConfig {
    /// Entries are kept in memory and lost on restart.
    InMemory,
    /// Entries are persisted in a SQLite database.
    Sqlite(SqliteConfig),
}

#[derive(serde::Deserialize, Debug, Clone)]
/// Configuration for the SQLite storage backend.
pub struct SqliteConfig {
    /// The path to the database file. It is created if it doesn't exist.
    ///
    /// Set the `APP_STORE__PATH` environment variable to override its value.
    pub path: PathBuf,
    /// The maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

//! SQL storage backends for [`guestbook_kv`], built on top of [`sqlx`].
//!
//! Each database is gated behind a cargo feature:
//!
//! - `sqlite`, enabled by default, for [`SqliteKvStore`].
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite;

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use sqlite::SqliteKvStore;

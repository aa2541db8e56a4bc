/*!
An ordered key-value store for the guestbook.

# Data model

Every record lives under a [`KvKey`], made of two parts:

- A **namespace** (e.g. `articles`), used to group related records together.
- A [`KeyPart`] that identifies the record inside its namespace: either an integer
  (e.g. an epoch timestamp) or a string (e.g. a title).

Values are JSON documents.

# Ordering

Keys are totally ordered: by namespace first, then by key part.
Integer key parts sort numerically and always come before string key parts,
which sort byte-wise.
[`KvStore::list`] returns all the records in a namespace following that order.

# Storage backends

[`KvStore`] is a thin wrapper around a [`KvStorageBackend`](store::KvStorageBackend) implementation:

- `guestbook_kv_memory_store`, an in-memory backend for tests and local development.
- `guestbook_kv_sqlx`, a SQLite backend built on top of `sqlx`.
*/
mod key;
mod store_;

pub use key::{KeyPart, KvKey};
pub use store_::KvStore;

pub mod store {
    //! Types and traits related to [`KvStore`][super::KvStore].
    pub use crate::store_::errors;
    pub use crate::store_::{KvEntry, KvStorageBackend};
}

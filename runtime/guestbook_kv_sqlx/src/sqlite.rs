//! Types related to [`SqliteKvStore`].
use guestbook_kv::store::errors::{InvalidKeyError, ListError, SetError};
use guestbook_kv::store::{KvEntry, KvStorageBackend};
use guestbook_kv::{KeyPart, KvKey, KvStore};
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone)]
/// A key-value store using SQLite as its backend.
///
/// # Implementation details
///
/// This store uses `sqlx` to interact with SQLite.
/// All records are stored in a single table. You can use
/// [`migrate`](Self::migrate) to create the table required by the store in the database.
/// Alternatively, you can use [`migration_query`](Self::migration_query)
/// to get the SQL query that creates the table in order to run it yourself
/// (e.g. as part of your database migration scripts).
///
/// Key parts are stored as text, encoded so that SQLite's byte-wise ordering
/// matches the ordering of [`KeyPart`]:
///
/// - `KeyPart::Int(n)` becomes the prefix `"i"` followed by 16 lowercase hex digits
///   of `n` with its sign bit flipped;
/// - `KeyPart::Text(s)` becomes the prefix `"s"` followed by the text itself.
///
/// Values are stored as JSON text.
pub struct SqliteKvStore(SqlitePool);

impl From<SqliteKvStore> for KvStore {
    fn from(value: SqliteKvStore) -> Self {
        KvStore::new(value)
    }
}

impl SqliteKvStore {
    /// Creates a new SQLite key-value store instance.
    ///
    /// It requires a pool of SQLite connections to interact with the database
    /// where the records are stored.
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    /// Return the query used to create the key-value table.
    ///
    /// # Implementation details
    ///
    /// The query is designed to be idempotent, meaning it can be run multiple times
    /// without causing any issues. If the table already exists, the query does nothing.
    pub fn migration_query() -> &'static str {
        "CREATE TABLE IF NOT EXISTS kv_entries (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (namespace, key)
) WITHOUT ROWID;"
    }

    /// Create the key-value table in the database.
    ///
    /// This method is idempotent, meaning it can be called multiple times without
    /// causing any issues. If the table already exists, this method does nothing.
    ///
    /// If you prefer to run the query yourself, rely on [`migration_query`](Self::migration_query)
    /// to get the SQL that's being executed.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        use sqlx::Executor as _;

        self.0.execute(Self::migration_query()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KvStorageBackend for SqliteKvStore {
    /// Upsert the record for `key`.
    #[tracing::instrument(
        name = "Store key-value record",
        level = tracing::Level::INFO,
        skip_all,
        fields(key = %key)
    )]
    async fn set(&self, key: &KvKey, value: serde_json::Value) -> Result<(), SetError> {
        let query = sqlx::query(
            "INSERT INTO kv_entries (namespace, key, value) \
            VALUES (?, ?, ?) \
            ON CONFLICT (namespace, key) DO UPDATE \
            SET value = excluded.value",
        )
        .bind(key.namespace())
        .bind(encode_key_part(key.part()))
        .bind(value.to_string());

        query
            .execute(&self.0)
            .await
            .map_err(|e| SetError::Other(e.into()))?;
        Ok(())
    }

    /// Select every record in `namespace`, relying on the key encoding for ordering.
    #[tracing::instrument(
        name = "List key-value records",
        level = tracing::Level::INFO,
        skip(self)
    )]
    async fn list(&self, namespace: &str) -> Result<Vec<KvEntry>, ListError> {
        let rows = sqlx::query(
            "SELECT key, value \
            FROM kv_entries \
            WHERE namespace = ? \
            ORDER BY key",
        )
        .bind(namespace)
        .fetch_all(&self.0)
        .await
        .map_err(|e| ListError::Other(e.into()))?;

        rows.into_iter()
            .map(|row| {
                let raw_key: String = row
                    .try_get("key")
                    .map_err(|e| ListError::Other(e.into()))?;
                let raw_value: String = row
                    .try_get("value")
                    .map_err(|e| ListError::Other(e.into()))?;
                let part = decode_key_part(&raw_key)?;
                let value = serde_json::from_str(&raw_value).map_err(|e| {
                    ListError::Deserialization(
                        anyhow::Error::new(e)
                            .context(format!("Invalid JSON stored under `{raw_key}`")),
                    )
                })?;
                Ok(KvEntry {
                    key: KvKey::new(namespace.to_owned(), part),
                    value,
                })
            })
            .collect()
    }

    async fn close(&self) {
        self.0.close().await
    }
}

const SIGN_BIT: u64 = 1 << 63;

fn encode_key_part(part: &KeyPart) -> String {
    match part {
        // Flipping the sign bit maps i64 onto u64 preserving order.
        KeyPart::Int(n) => format!("i{:016x}", (*n as u64) ^ SIGN_BIT),
        KeyPart::Text(s) => format!("s{s}"),
    }
}

fn decode_key_part(raw: &str) -> Result<KeyPart, InvalidKeyError> {
    let invalid = || InvalidKeyError {
        raw: raw.to_owned(),
    };
    if let Some(hex) = raw.strip_prefix('i') {
        if hex.len() != 16 {
            return Err(invalid());
        }
        let bits = u64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(KeyPart::Int((bits ^ SIGN_BIT) as i64))
    } else if let Some(text) = raw.strip_prefix('s') {
        Ok(KeyPart::Text(text.to_owned()))
    } else {
        Err(invalid())
    }
}

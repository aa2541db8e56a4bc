use crate::configuration::{AppConfig, GuestbookConfig, StoreConfig};
use crate::guestbook::Guestbook;
use guestbook_kv::KvStore;
use guestbook_kv_memory_store::InMemoryKvStore;
use guestbook_kv_sqlx::SqliteKvStore;
use jiff::tz::TimeZone;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[derive(Debug, Clone)]
/// The long-lived components shared by all request handlers.
///
/// It is built once, at startup, and must be torn down via
/// [`ApplicationState::teardown`] when the server shuts down.
pub struct ApplicationState {
    pub guestbook: Guestbook,
    /// The time zone used to display article timestamps.
    pub time_zone: TimeZone,
}

impl ApplicationState {
    /// Open the configured store and assemble the application state.
    ///
    /// The SQLite backend creates its table if it doesn't exist yet.
    pub async fn new(config: &AppConfig) -> Result<Self, ApplicationStateError> {
        let store = open_store(config.store_config()).await?;
        Self::with_store(store, config.guestbook_config())
    }

    /// Assemble the application state on top of an existing store.
    pub fn with_store(
        store: KvStore,
        config: &GuestbookConfig,
    ) -> Result<Self, ApplicationStateError> {
        let time_zone = match &config.time_zone {
            Some(name) => {
                TimeZone::get(name).map_err(|e| ApplicationStateError::TimeZone {
                    name: name.to_owned(),
                    source: e,
                })?
            }
            None => TimeZone::system(),
        };
        Ok(Self {
            guestbook: Guestbook::new(store, config),
            time_zone,
        })
    }

    /// Release the resources held by the application, e.g. the database connection pool.
    pub async fn teardown(self) {
        self.guestbook.store().close().await
    }
}

async fn open_store(config: &StoreConfig) -> Result<KvStore, ApplicationStateError> {
    match config {
        StoreConfig::InMemory => Ok(InMemoryKvStore::new().into()),
        StoreConfig::Sqlite(config) => {
            let options = SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await
                .map_err(ApplicationStateError::StoreConnection)?;
            let store = SqliteKvStore::new(pool);
            store
                .migrate()
                .await
                .map_err(ApplicationStateError::StoreMigration)?;
            Ok(store.into())
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`ApplicationState::new`].
pub enum ApplicationStateError {
    #[error("Failed to connect to the SQLite database")]
    StoreConnection(#[source] sqlx::Error),
    #[error("Failed to create the key-value table in the SQLite database")]
    StoreMigration(#[source] sqlx::Error),
    #[error("`{name}` is not a known time zone")]
    TimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },
    #[error("Failed to build the request router")]
    Router(#[from] matchit::InsertError),
}

#[cfg(test)]
mod tests {
    use super::{ApplicationState, ApplicationStateError};
    use crate::configuration::{
        AppConfig, GuestbookConfig, GuestbookVariant, SqliteConfig, StoreConfig, WritePolicy,
    };
    use crate::guestbook::{GuestbookQuery, Submission};

    fn guestbook_config(time_zone: Option<&str>) -> GuestbookConfig {
        GuestbookConfig {
            variant: GuestbookVariant::Comments,
            write_policy: WritePolicy::Always,
            time_zone: time_zone.map(ToOwned::to_owned),
        }
    }

    #[tokio::test]
    async fn unknown_time_zones_are_rejected() {
        let config = AppConfig {
            guestbook: guestbook_config(Some("Not/AZone")),
            store: StoreConfig::InMemory,
        };
        let err = ApplicationState::new(&config).await.unwrap_err();
        assert!(matches!(err, ApplicationStateError::TimeZone { .. }));
    }

    #[tokio::test]
    async fn sqlite_entries_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            guestbook: guestbook_config(None),
            store: StoreConfig::Sqlite(SqliteConfig {
                path: dir.path().join("guestbook.db"),
                max_connections: 1,
            }),
        };
        let submission = Submission::from_query(GuestbookQuery {
            title: vec!["Hello".into()],
            content: vec!["World".into()],
        });

        let state = ApplicationState::new(&config).await.unwrap();
        state
            .guestbook
            .record(&submission, jiff::Timestamp::now())
            .await
            .unwrap();
        state.teardown().await;

        let state = ApplicationState::new(&config).await.unwrap();
        let entries = state.guestbook.entries().await.unwrap();
        assert_eq!(
            entries,
            crate::guestbook::Entries::Comments(vec!["Hello: World".into()])
        );
        state.teardown().await;
    }
}

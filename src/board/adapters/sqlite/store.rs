//! SQLite board store backed by an r2d2 connection pool.

use super::{StoreConfig, transaction::SqliteTransaction};
use crate::board::ports::{BoardStore, BoardStoreError, BoardStoreResult, BoardTransaction};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use tracing::debug;

/// SQLite connection pool type used by board adapters.
pub type BoardSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// SQL creating the `stage` and `task` relations.
pub const CREATE_SCHEMA_SQL: &str = include_str!(
    "../../../../migrations/2026-10-18-000000_create_board_tables/up.sql"
);

/// SQLite-backed board store.
///
/// Each [`BoardStore::transaction`] checks a connection out of the pool,
/// opens an `IMMEDIATE` transaction (taking the database write lock up
/// front) and returns the connection when the operation finishes.
///
/// # Example
///
/// ```no_run
/// use buildit_board::board::adapters::sqlite::{SqliteBoardStore, StoreConfig};
///
/// # async fn open() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteBoardStore::connect(&StoreConfig::from_env()?)?;
/// store.initialize_schema().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteBoardStore {
    pool: BoardSqlitePool,
}

/// Per-connection pragmas: foreign keys are off by default in SQLite.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

impl SqliteBoardStore {
    /// Creates a store from an existing pool.
    ///
    /// The pool's connections must already enforce foreign keys.
    #[must_use]
    pub const fn new(pool: BoardSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool according to `config`.
    ///
    /// An in-memory database is held by a single connection that is exempt
    /// from idle and lifetime recycling, so its contents live as long as the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the pool cannot open its
    /// connections.
    pub fn connect(config: &StoreConfig) -> BoardStoreResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_path.as_str());
        let mut builder = Pool::builder()
            .max_size(config.pool_size())
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout_ms: config.busy_timeout_millis(),
            }));
        if config.is_in_memory() {
            // The database is owned by its only connection; it must never be reaped.
            builder = builder.idle_timeout(None).max_lifetime(None);
        }
        let pool = builder
            .build(manager)
            .map_err(BoardStoreError::persistence)?;
        debug!(
            database = %config.database_path,
            pool_size = config.pool_size(),
            "opened sqlite board store"
        );
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &BoardSqlitePool {
        &self.pool
    }

    /// Creates the board relations when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the DDL fails.
    pub async fn initialize_schema(&self) -> BoardStoreResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_SCHEMA_SQL)
                .map_err(BoardStoreError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardStoreResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> BoardStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardStoreError::persistence)?
    }
}

#[async_trait]
impl BoardStore for SqliteBoardStore {
    async fn transaction<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<BoardStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, E> {
            let mut connection = pool.get().map_err(BoardStoreError::persistence)?;
            run_immediate(&mut connection, operation)
        })
        .await
        .map_err(BoardStoreError::persistence)?
    }
}

/// Outcome of a failed SQLite transaction: either the operation itself
/// rejected the work, or the database failed to begin, commit or roll back.
enum TransactionFailure<E> {
    Operation(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionFailure<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

fn run_immediate<T, E, F>(connection: &mut SqliteConnection, operation: F) -> Result<T, E>
where
    F: FnOnce(&mut dyn BoardTransaction) -> Result<T, E>,
    E: From<BoardStoreError>,
{
    connection
        .immediate_transaction::<T, TransactionFailure<E>, _>(|tx_conn| {
            let mut transaction = SqliteTransaction::new(tx_conn);
            operation(&mut transaction).map_err(TransactionFailure::Operation)
        })
        .map_err(|failure| match failure {
            TransactionFailure::Operation(err) => err,
            TransactionFailure::Database(err) => E::from(BoardStoreError::persistence(err)),
        })
}

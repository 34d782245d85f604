mod customers;
mod orders;
mod products;

use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Sqlite, SqlitePool, Transaction,
};
use thiserror::Error;
use tracing::debug;

pub use customers::{CustomerError, CustomerRepository};
pub use orders::{OrderError, OrderRepository};
pub use products::ProductRepository;

/// SQLite extended result code for a violated foreign key.
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";

/// Top-level database handle that owns the SQLite connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Establishes a new SQLite connection pool for the provided connection string.
    ///
    /// The database file is created when missing. Every pooled connection
    /// enforces foreign keys and runs in WAL mode.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StorageError::Connect)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Applies migrations located under `migrations/`.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(StorageError::Migration)?;
        Ok(())
    }

    /// Opens a unit of work: one pooled connection inside a transaction.
    ///
    /// Dropping the returned value without calling [`UnitOfWork::commit`]
    /// rolls the transaction back and returns the connection to the pool.
    pub async fn begin(&self) -> Result<UnitOfWork, StorageError> {
        let tx = self.pool.begin().await?;
        debug!(stage = "storage", "unit of work opened");
        Ok(UnitOfWork { tx })
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Request-scoped store handle. Repositories borrow its connection.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub fn customers(&mut self) -> CustomerRepository<'_> {
        CustomerRepository::new(&mut self.tx)
    }

    pub fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(&mut self.tx)
    }

    pub fn orders(&mut self) -> OrderRepository<'_> {
        OrderRepository::new(&mut self.tx)
    }

    /// Makes every change performed through this unit of work durable.
    pub async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        debug!(stage = "storage", "unit of work committed");
        Ok(())
    }
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to sqlite: {0}")]
    Connect(sqlx::Error),
    #[error("failed to run database migrations: {0}")]
    Migration(MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_FOREIGNKEY)
        }
        _ => false,
    }
}

//! Executor and driver error types.

use thiserror::Error;

/// Result type for executor operations.
pub type DbResult<T> = Result<T, ExecError>;

/// Errors raised by [`Db`](super::Db).
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("already in transaction")]
    AlreadyInTransaction,

    #[error("not in transaction")]
    NotInTransaction,

    /// The transaction was already committed or rolled back.
    #[error("transaction has already been committed or rolled back")]
    TransactionDone,

    #[error("query returned no rows")]
    NoRows,

    /// Errors reported by the driver, unchanged.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Errors reported by a [`Driver`](super::Driver).
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection is closed")]
    Closed,

    #[error("{0}")]
    Backend(String),
}

//! The `Db` handle.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cache::{CacheStats, StatementCache};
use super::rewrite::rewrite_placeholders;
use super::sqlite::SqliteDriver;
use super::{DbResult, Driver, DriverError, ExecError, ExecResult, Row, Rows, Statement, Transaction};
use crate::backend::{Backend, SqlBackend};
use crate::config::Settings;
use crate::query::Value;

/// A database handle: a plain connection or an open transaction.
///
/// Handles returned by [`Db::begin`] share the driver, backend and statement
/// cache of their parent but run every statement inside their transaction.
#[derive(Debug)]
pub struct Db {
    driver: Arc<dyn Driver>,
    backend: Backend,
    tx: Option<Box<dyn Transaction>>,
    tx_done: bool,
    cache: Arc<StatementCache>,
    statement_cache: bool,
}

impl Db {
    pub fn new(driver: Arc<dyn Driver>, backend: Backend) -> Self {
        Self {
            driver,
            backend,
            tx: None,
            tx_done: false,
            cache: Arc::new(StatementCache::new()),
            statement_cache: true,
        }
    }

    /// Open the database described by `settings` with the bundled driver.
    ///
    /// Only SQLite ships a driver; other backends go through [`Db::new`].
    pub fn open(settings: &Settings) -> crate::Result<Self> {
        let backend = settings.database.backend_kind()?;
        let driver: Arc<dyn Driver> = match backend {
            Backend::Sqlite => Arc::new(
                SqliteDriver::open(&settings.database.resolved_url()?).map_err(ExecError::from)?,
            ),
            other => {
                return Err(ExecError::from(DriverError::Backend(format!(
                    "no bundled driver for backend {}",
                    other
                )))
                .into())
            }
        };
        Ok(Self::new(driver, backend).with_statement_cache(settings.executor.statement_cache))
    }

    /// Enable or disable prepared-statement caching.
    pub fn with_statement_cache(mut self, enabled: bool) -> Self {
        self.statement_cache = enabled;
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // =========================================================================
    // Execution
    // =========================================================================

    pub fn exec(&self, sql: &str, args: &[Value]) -> DbResult<ExecResult> {
        let sql = self.rewrite(sql);
        if let Some(stmt) = self.prepared(&sql, args)? {
            debug!(sql = %sql, args = args.len(), prepared = true, "db.exec");
            return Ok(stmt.exec(args)?);
        }
        debug!(sql = %sql, args = args.len(), prepared = false, "db.exec");
        Ok(match &self.tx {
            Some(tx) => tx.exec(&sql, args)?,
            None => self.driver.exec(&sql, args)?,
        })
    }

    pub fn query(&self, sql: &str, args: &[Value]) -> DbResult<Rows> {
        let sql = self.rewrite(sql);
        if let Some(stmt) = self.prepared(&sql, args)? {
            debug!(sql = %sql, args = args.len(), prepared = true, "db.query");
            return Ok(stmt.query(args)?);
        }
        debug!(sql = %sql, args = args.len(), prepared = false, "db.query");
        Ok(match &self.tx {
            Some(tx) => tx.query(&sql, args)?,
            None => self.driver.query(&sql, args)?,
        })
    }

    /// First row of the result, or [`ExecError::NoRows`].
    pub fn query_row(&self, sql: &str, args: &[Value]) -> DbResult<Row> {
        self.query(sql, args)?
            .into_iter()
            .next()
            .ok_or(ExecError::NoRows)
    }

    fn rewrite<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        if self.backend.replaces_placeholders() {
            rewrite_placeholders(sql, &self.backend)
        } else {
            Cow::Borrowed(sql)
        }
    }

    /// The cached statement for `sql`, bound to the transaction if any.
    ///
    /// `None` means run unprepared: no args, caching disabled, or preparing
    /// failed (the unprepared run reports the error).
    fn prepared(&self, sql: &str, args: &[Value]) -> DbResult<Option<Arc<dyn Statement>>> {
        if self.tx_done {
            return Err(ExecError::TransactionDone);
        }
        if args.is_empty() || !self.statement_cache {
            return Ok(None);
        }

        let stmt = match self.cache.lookup(sql) {
            Some(stmt) => stmt,
            None => match self.driver.prepare(sql) {
                Ok(stmt) => {
                    debug!(sql = %sql, "statement_cache.miss");
                    self.cache.insert(sql, Arc::clone(&stmt));
                    stmt
                }
                Err(err) => {
                    debug!(sql = %sql, error = %err, "statement_cache.prepare_failed");
                    return Ok(None);
                }
            },
        };

        match &self.tx {
            None => Ok(Some(stmt)),
            Some(tx) => match tx.bind(&stmt) {
                Ok(bound) => Ok(Some(bound)),
                Err(err) => {
                    debug!(sql = %sql, error = %err, "statement_cache.bind_failed");
                    Ok(None)
                }
            },
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Start a transaction, returning a new handle that runs inside it.
    pub fn begin(&self) -> DbResult<Db> {
        if self.tx.is_some() {
            return Err(ExecError::AlreadyInTransaction);
        }
        let tx = self.driver.begin()?;
        info!(driver = self.driver.name(), "transaction.begin");
        Ok(Db {
            driver: Arc::clone(&self.driver),
            backend: self.backend,
            tx: Some(tx),
            tx_done: false,
            cache: Arc::clone(&self.cache),
            statement_cache: self.statement_cache,
        })
    }

    /// Commit the transaction. A failed commit is rolled back before the
    /// error is returned, so the handle never leaves a transaction open.
    pub fn commit(&mut self) -> DbResult<()> {
        let tx = self.finish()?;
        if let Err(err) = tx.commit() {
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "transaction.rollback_after_commit_failed");
            }
            return Err(err.into());
        }
        info!("transaction.commit");
        Ok(())
    }

    pub fn rollback(&mut self) -> DbResult<()> {
        let tx = self.finish()?;
        tx.rollback()?;
        info!("transaction.rollback");
        Ok(())
    }

    /// Mark the transaction finalized and return it.
    fn finish(&mut self) -> DbResult<&dyn Transaction> {
        let tx = self.tx.as_deref().ok_or(ExecError::NotInTransaction)?;
        if self.tx_done {
            return Err(ExecError::TransactionDone);
        }
        self.tx_done = true;
        Ok(tx)
    }

    /// Close the handle.
    ///
    /// A transactional handle rolls back if it was never finalized and leaves
    /// the connection open. A plain handle closes the driver.
    pub fn close(&mut self) -> DbResult<()> {
        if self.tx.is_some() {
            if self.tx_done {
                return Ok(());
            }
            return self.rollback();
        }
        self.driver.close()?;
        Ok(())
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    pub fn quote_string(&self, s: &str) -> String {
        self.backend.quote_string(s)
    }

    pub fn quote_identifier(&self, ident: &str) -> String {
        self.backend.quote_identifier(ident)
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        if let Some(tx) = &self.tx {
            if !self.tx_done {
                self.tx_done = true;
                if let Err(err) = tx.rollback() {
                    warn!(error = %err, "transaction.rollback_on_drop_failed");
                }
            }
        }
    }
}

//! Bundled SQLite driver over `rusqlite`.
//!
//! The driver keeps one connection for plain statements. Every transaction
//! opens its own connection to the same database, so statements on the plain
//! handle never run inside another handle's transaction and several
//! transactions can be open at once. In-memory databases are opened as named
//! shared-cache databases so all of these connections see the same data.
//!
//! Prepared statements are checked when prepared and then run through
//! rusqlite's per-connection statement cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};

use super::{Driver, DriverError, ExecResult, Rows, Statement, Transaction};
use crate::query::Value;

type SharedConnection = Arc<Mutex<Option<Connection>>>;

static MEMORY_DATABASES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct SqliteDriver {
    /// Path or URI every connection of this driver opens.
    target: Arc<str>,
    conn: SharedConnection,
}

impl SqliteDriver {
    /// Open (or create) a database file. `":memory:"` or an empty path opens
    /// a private in-memory database.
    pub fn open(path: &str) -> Result<Self, DriverError> {
        if path.is_empty() || path == ":memory:" {
            return Self::open_in_memory();
        }
        Self::connect_to(path.into())
    }

    pub fn open_in_memory() -> Result<Self, DriverError> {
        let n = MEMORY_DATABASES.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:joinery-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            n
        );
        Self::connect_to(uri.into())
    }

    fn connect_to(target: Arc<str>) -> Result<Self, DriverError> {
        let conn = connect(&target)?;
        Ok(Self {
            target,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Run a batch of statements without parameters (schema setup).
    pub fn execute_batch(&self, sql: &str) -> Result<(), DriverError> {
        with_conn(&self.conn, |conn| conn.execute_batch(sql))
    }
}

fn connect(target: &str) -> rusqlite::Result<Connection> {
    Connection::open_with_flags(target, OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI)
}

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn prepare(&self, sql: &str) -> Result<Arc<dyn Statement>, DriverError> {
        with_conn(&self.conn, |conn| conn.prepare_cached(sql).map(drop))?;
        Ok(Arc::new(SqliteStatement {
            sql: sql.to_string(),
            conn: Arc::clone(&self.conn),
        }))
    }

    fn exec(&self, sql: &str, args: &[Value]) -> Result<ExecResult, DriverError> {
        with_conn(&self.conn, |conn| exec_on(conn, sql, args))
    }

    fn query(&self, sql: &str, args: &[Value]) -> Result<Rows, DriverError> {
        with_conn(&self.conn, |conn| query_on(conn, sql, args))
    }

    fn begin(&self) -> Result<Box<dyn Transaction>, DriverError> {
        // A closed driver opens no new transactions.
        with_conn(&self.conn, |_| Ok(()))?;
        let conn = connect(&self.target)?;
        conn.execute_batch("BEGIN")?;
        Ok(Box::new(SqliteTransaction {
            conn: Arc::new(Mutex::new(Some(conn))),
        }))
    }

    fn close(&self) -> Result<(), DriverError> {
        match self.conn.lock().take() {
            Some(conn) => conn.close().map_err(|(_, err)| err.into()),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
struct SqliteStatement {
    sql: String,
    conn: SharedConnection,
}

impl Statement for SqliteStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn exec(&self, args: &[Value]) -> Result<ExecResult, DriverError> {
        with_conn(&self.conn, |conn| exec_on(conn, &self.sql, args))
    }

    fn query(&self, args: &[Value]) -> Result<Rows, DriverError> {
        with_conn(&self.conn, |conn| query_on(conn, &self.sql, args))
    }
}

/// A transaction on its own connection. The connection is released once the
/// transaction commits or rolls back.
#[derive(Debug)]
struct SqliteTransaction {
    conn: SharedConnection,
}

impl SqliteTransaction {
    fn finish(&self, sql: &str) -> Result<(), DriverError> {
        with_conn(&self.conn, |conn| conn.execute_batch(sql))?;
        self.conn.lock().take();
        Ok(())
    }
}

impl Transaction for SqliteTransaction {
    fn exec(&self, sql: &str, args: &[Value]) -> Result<ExecResult, DriverError> {
        with_conn(&self.conn, |conn| exec_on(conn, sql, args))
    }

    fn query(&self, sql: &str, args: &[Value]) -> Result<Rows, DriverError> {
        with_conn(&self.conn, |conn| query_on(conn, sql, args))
    }

    /// Re-prepare the statement text on the transaction's connection.
    fn bind(&self, stmt: &Arc<dyn Statement>) -> Result<Arc<dyn Statement>, DriverError> {
        with_conn(&self.conn, |conn| conn.prepare_cached(stmt.sql()).map(drop))?;
        Ok(Arc::new(SqliteStatement {
            sql: stmt.sql().to_string(),
            conn: Arc::clone(&self.conn),
        }))
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.finish("COMMIT")
    }

    fn rollback(&self) -> Result<(), DriverError> {
        self.finish("ROLLBACK")
    }
}

fn with_conn<T>(
    conn: &Mutex<Option<Connection>>,
    f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
) -> Result<T, DriverError> {
    let guard = conn.lock();
    let conn = guard.as_ref().ok_or(DriverError::Closed)?;
    Ok(f(conn)?)
}

fn exec_on(conn: &Connection, sql: &str, args: &[Value]) -> rusqlite::Result<ExecResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let before = conn.last_insert_rowid();
    let affected = stmt.execute(params_from_iter(args.iter()))?;
    let after = conn.last_insert_rowid();
    // The rowid only counts when this statement inserted the row.
    let inserted = affected > 0 && (after != before || is_insert(sql));
    Ok(ExecResult {
        rows_affected: affected as u64,
        last_insert_id: inserted.then_some(after),
    })
}

fn is_insert(sql: &str) -> bool {
    sql.split_whitespace()
        .next()
        .is_some_and(|kw| kw.eq_ignore_ascii_case("INSERT") || kw.eq_ignore_ascii_case("REPLACE"))
}

fn query_on(conn: &Connection, sql: &str, args: &[Value]) -> rusqlite::Result<Rows> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..width)
            .map(|i| row.get_ref(i).map(Value::from))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        out.push(values);
    }
    Ok(Rows::new(columns, out))
}

// =============================================================================
// Value conversions
// =============================================================================

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Int(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Field(name) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    format!("field reference {} cannot be bound as a parameter", name).into(),
                ))
            }
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Int(i),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

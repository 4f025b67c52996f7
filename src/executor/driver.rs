//! Driver contract.
//!
//! A driver owns the actual database connection. The executor talks to it
//! through three object-safe traits:
//!
//! - [`Driver`]: the plain connection; prepares statements and opens
//!   transactions
//! - [`Statement`]: a prepared statement, reusable across calls
//! - [`Transaction`]: an open transaction; statements prepared on the plain
//!   connection are re-bound to it with [`Transaction::bind`]

use std::fmt;
use std::sync::Arc;

use super::DriverError;
use crate::query::Value;

pub trait Driver: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn prepare(&self, sql: &str) -> Result<Arc<dyn Statement>, DriverError>;

    fn exec(&self, sql: &str, args: &[Value]) -> Result<ExecResult, DriverError>;

    fn query(&self, sql: &str, args: &[Value]) -> Result<Rows, DriverError>;

    fn begin(&self) -> Result<Box<dyn Transaction>, DriverError>;

    fn close(&self) -> Result<(), DriverError>;
}

pub trait Statement: fmt::Debug + Send + Sync {
    fn sql(&self) -> &str;

    fn exec(&self, args: &[Value]) -> Result<ExecResult, DriverError>;

    fn query(&self, args: &[Value]) -> Result<Rows, DriverError>;
}

pub trait Transaction: fmt::Debug + Send + Sync {
    fn exec(&self, sql: &str, args: &[Value]) -> Result<ExecResult, DriverError>;

    fn query(&self, sql: &str, args: &[Value]) -> Result<Rows, DriverError>;

    /// A version of `stmt` that runs inside this transaction.
    fn bind(&self, stmt: &Arc<dyn Statement>) -> Result<Arc<dyn Statement>, DriverError>;

    fn commit(&self) -> Result<(), DriverError>;

    fn rollback(&self) -> Result<(), DriverError>;
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// A result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the first column called `name`.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| self.values.get(i))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fully fetched result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Rows {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let columns: Arc<[String]> = columns.into();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

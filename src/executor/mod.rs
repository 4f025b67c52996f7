//! Query execution.
//!
//! [`Db`] runs SQL through a [`Driver`], either on the plain connection or
//! inside a driver [`Transaction`]. On the way it:
//!
//! - rewrites `?` placeholders for backends that number them
//! - prepares statements that carry arguments and keeps them in a
//!   [`StatementCache`] shared by every handle derived from the same `Db`
//! - tracks transaction state (begin, commit, rollback, close, drop)
//!
//! Preparation failures are not reported: the statement runs unprepared and
//! any error comes from that run.

mod cache;
mod db;
mod driver;
mod error;
mod rewrite;
mod sqlite;


pub use cache::{statement_key, CacheStats, StatementCache};
pub use db::Db;
pub use driver::{Driver, ExecResult, Row, Rows, Statement, Transaction};
pub use error::{DbResult, DriverError, ExecError};
pub use rewrite::rewrite_placeholders;
pub use sqlite::SqliteDriver;

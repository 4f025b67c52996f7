//! Backend definitions: the small slice of dialect behavior the query core
//! depends on.
//!
//! A backend supplies:
//!
//! - Placeholder syntax: `?` (SQLite/MySQL) or `$1, $2, ...` (PostgreSQL)
//! - String-literal quote character (doubled to escape)
//! - Identifier quote character (backslash-escaped)
//! - Join keywords
//!
//! Everything else (DDL, functions, pagination quirks) is out of scope.
//!
//! # Usage
//!
//! ```
//! use joinery::backend::{Backend, SqlBackend};
//!
//! let backend = Backend::Postgres;
//! assert_eq!(backend.placeholder(0), "$1");
//! assert_eq!(backend.quote_identifier("user"), "\"user\"");
//! ```

pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use std::borrow::Cow;
use std::fmt;

use crate::join::JoinType;

/// Backend trait - defines placeholder, quoting and join keyword rules.
pub trait SqlBackend: fmt::Debug + Send + Sync {
    /// Backend name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Placeholders
    // =========================================================================

    /// Format the placeholder for the zero-based parameter `index`.
    fn placeholder(&self, index: usize) -> Cow<'static, str>;

    /// Whether driver-agnostic `?` placeholders must be rewritten before the
    /// SQL reaches this backend.
    fn replaces_placeholders(&self) -> bool {
        false
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    /// Character that delimits string literals.
    fn string_quote(&self) -> char {
        '\''
    }

    /// Character that delimits identifiers.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string(s, self.string_quote())
    }

    /// Quote an identifier (table, column).
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_identifier(ident, self.identifier_quote())
    }

    // =========================================================================
    // JOIN Syntax
    // =========================================================================

    /// Keyword emitted for a join of the given type.
    fn join_keyword(&self, join_type: JoinType) -> &'static str {
        join_type.keyword()
    }
}

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Sqlite,
    MySql,
    Postgres,
}

impl Backend {
    /// Get the backend implementation.
    pub fn backend(&self) -> &'static dyn SqlBackend {
        match self {
            Backend::Sqlite => &Sqlite,
            Backend::MySql => &MySql,
            Backend::Postgres => &Postgres,
        }
    }

    /// Parse a backend from its configuration name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Some(Backend::Sqlite),
            "mysql" | "mariadb" => Some(Backend::MySql),
            "postgres" | "postgresql" | "pg" => Some(Backend::Postgres),
            _ => None,
        }
    }
}

// Implement SqlBackend for Backend enum by delegating to concrete types
impl SqlBackend for Backend {
    fn name(&self) -> &'static str {
        self.backend().name()
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        self.backend().placeholder(index)
    }

    fn replaces_placeholders(&self) -> bool {
        self.backend().replaces_placeholders()
    }

    fn string_quote(&self) -> char {
        self.backend().string_quote()
    }

    fn identifier_quote(&self) -> char {
        self.backend().identifier_quote()
    }

    fn quote_string(&self, s: &str) -> String {
        self.backend().quote_string(s)
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.backend().quote_identifier(ident)
    }

    fn join_keyword(&self, join_type: JoinType) -> &'static str {
        self.backend().join_keyword(join_type)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backend().name())
    }
}

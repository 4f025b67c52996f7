//! PostgreSQL backend.
//!
//! - ANSI identifier quoting (`"`)
//! - Numbered placeholders (`$1`, `$2`, ...), so `?` must be rewritten

use std::borrow::Cow;

use super::helpers;
use super::SqlBackend;

/// PostgreSQL backend.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlBackend for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        helpers::placeholder_dollar(index)
    }

    fn replaces_placeholders(&self) -> bool {
        true
    }
}

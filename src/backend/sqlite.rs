//! SQLite backend.
//!
//! - ANSI identifier quoting (`"`)
//! - `?` placeholders, passed through unchanged

use std::borrow::Cow;

use super::helpers;
use super::SqlBackend;

/// SQLite backend.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlBackend for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        helpers::placeholder_question(index)
    }
}

//! MySQL backend.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - `?` placeholders

use std::borrow::Cow;

use super::helpers;
use super::SqlBackend;

/// MySQL backend.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlBackend for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self, index: usize) -> Cow<'static, str> {
        helpers::placeholder_question(index)
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

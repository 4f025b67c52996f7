//! Shared helper functions for backend implementations.
//!
//! Quoting is parameterized only by the quote character so that dialects
//! differ by configuration rather than by branching logic.

use std::borrow::Cow;

// =============================================================================
// Quoting
// =============================================================================

/// Quote a string literal, doubling every occurrence of the quote character.
///
/// `quote_string("it's", '\'')` yields `'it''s'`.
pub fn quote_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

/// Quote an identifier, escaping every occurrence of the quote character
/// with a backslash.
///
/// `quote_identifier("a\"b", '"')` yields `"a\"b"`.
pub fn quote_identifier(ident: &str, quote: char) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push(quote);
    for ch in ident.chars() {
        if ch == quote {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

// =============================================================================
// Placeholders
// =============================================================================

/// Positional question mark, repeated for every parameter.
/// Used by: SQLite, MySQL
pub fn placeholder_question(_index: usize) -> Cow<'static, str> {
    Cow::Borrowed("?")
}

/// Numbered dollar placeholder, one-based (`$1`, `$2`, ...).
/// Used by: PostgreSQL
pub fn placeholder_dollar(index: usize) -> Cow<'static, str> {
    Cow::Owned(format!("${}", index + 1))
}

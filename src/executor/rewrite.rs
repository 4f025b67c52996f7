//! Placeholder rewriting.

use std::borrow::Cow;

use crate::backend::SqlBackend;

/// Replace every bare `?` in `sql` with the backend's placeholder.
///
/// Placeholders are numbered from zero in order of appearance. A `?` inside a
/// single- or double-quoted literal is left alone. Inside a literal, a doubled
/// quote character is an escaped quote and a quote of the other kind is
/// plain text. Returns the input unchanged when there is nothing to replace.
pub fn rewrite_placeholders<'a>(sql: &'a str, backend: &dyn SqlBackend) -> Cow<'a, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut written = 0;
    let mut count = 0;
    let mut quote: Option<u8> = None;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => {
                if bytes.get(i + 1) == Some(&q) {
                    i += 2;
                    continue;
                }
                quote = None;
            }
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'?' => {
                    let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                    buf.push_str(&sql[written..i]);
                    buf.push_str(&backend.placeholder(count));
                    count += 1;
                    written = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[written..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

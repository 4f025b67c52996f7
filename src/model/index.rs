//! Index declarations.

use crate::query::SortDir;

/// An ordered set of `(field, direction)` pairs plus a uniqueness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub fields: Vec<(String, SortDir)>,
    pub unique: bool,
}

impl Index {
    /// Ascending index over the given fields.
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|f| (f.into(), SortDir::Asc))
                .collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the direction of one of the index fields.
    pub fn set(mut self, dir: SortDir, field: &str) -> Self {
        for (name, d) in &mut self.fields {
            if name == field {
                *d = dir;
            }
        }
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(f, _)| f.as_str())
    }
}

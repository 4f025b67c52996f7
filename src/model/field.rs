//! Field descriptors.
//!
//! Fields are declared once, by value, when a model is registered. The
//! catalog turns each [`FieldDef`] into a [`Field`] carrying its resolved
//! column and quoted SQL name.

use std::fmt;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Bool,
    Blob,
    Timestamp,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Bool => "bool",
            FieldType::Blob => "blob",
            FieldType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction(s) of the index a field tag asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexTag {
    #[default]
    Asc,
    Desc,
    Both,
}

impl IndexTag {
    pub fn ascending(&self) -> bool {
        matches!(self, IndexTag::Asc | IndexTag::Both)
    }

    pub fn descending(&self) -> bool {
        matches!(self, IndexTag::Desc | IndexTag::Both)
    }
}

/// Target of a reference tag: `(model, field)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget {
    pub model: String,
    pub field: String,
}

/// Tag flags attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
    pub index: Option<IndexTag>,
    pub references: Option<ReferenceTarget>,
}

/// Field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub column: Option<String>,
    pub field_type: FieldType,
    pub tags: FieldTags,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            field_type,
            tags: FieldTags::default(),
        }
    }

    /// Override the column name (defaults to the snake_cased field name).
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.tags.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.tags.unique = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.tags.nullable = true;
        self
    }

    pub fn index(mut self, tag: IndexTag) -> Self {
        self.tags.index = Some(tag);
        self
    }

    /// Declare that this field references `model.field`.
    pub fn references(mut self, model: impl Into<String>, field: impl Into<String>) -> Self {
        self.tags.references = Some(ReferenceTarget {
            model: model.into(),
            field: field.into(),
        });
        self
    }
}

/// A registered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Qualified name, unique within its model.
    pub name: String,
    /// Unquoted column name.
    pub column: String,
    /// Table-qualified, quoted SQL name.
    pub quoted: String,
    pub field_type: FieldType,
    pub tags: FieldTags,
}

//! Catalog and field-mapping error types.

use thiserror::Error;

/// Errors raised while building or querying the model catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    #[error("model {0:?} is already registered")]
    DuplicateModel(String),

    #[error("field {field:?} is declared twice on model {model:?}")]
    DuplicateField { model: String, field: String },

    #[error("unknown model: {0:?}")]
    UnknownModel(String),

    #[error("unknown field {field:?} on model {model:?}")]
    UnknownField { model: String, field: String },

    #[error("field {model}.{field} references unknown model {target:?}")]
    UnknownReference {
        model: String,
        field: String,
        target: String,
    },

    #[error("cyclic references between models: {}", .0.join(", "))]
    CyclicReference(Vec<String>),
}

/// Result type for catalog operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while resolving a qualified field name to a column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("can't map field {0:?} to a database name")]
    CantMap(String),

    #[error("name {0:?} does not correspond to this model")]
    NotThisModel(String),

    #[error("field name {0:?} is ambiguous, qualify it as Type|Field")]
    Ambiguous(String),
}

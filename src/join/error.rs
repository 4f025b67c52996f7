//! Join resolution errors.

use thiserror::Error;

/// Errors raised while extending a join chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("cannot join `{chain}` with model `{target}`")]
    NoRelationship { chain: String, target: String },

    #[error("joining `{chain}` with model `{target}` is ambiguous using conditions `{conditions}`")]
    Ambiguous {
        chain: String,
        target: String,
        conditions: String,
    },

    #[error("unknown model: {0:?}")]
    UnknownModel(String),
}

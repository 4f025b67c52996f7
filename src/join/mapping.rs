//! Field mapping across a join chain.

use super::JoinChain;
use crate::model::{FieldType, MapError};

impl JoinChain {
    /// Resolve a field name to its quoted column and type.
    ///
    /// Every model in the chain is asked; a `Type|` prefix restricts the
    /// match to the model with that name. Exactly one match is required.
    pub fn map(&self, qname: &str) -> Result<(String, FieldType), MapError> {
        let mut matches = self.models().filter_map(|m| m.map(qname).ok());
        match (matches.next(), matches.next()) {
            (None, _) => Err(MapError::CantMap(qname.to_string())),
            (Some((column, field_type)), None) => Ok((column.to_string(), field_type)),
            (Some(_), Some(_)) => Err(MapError::Ambiguous(qname.to_string())),
        }
    }
}

//! Model catalog.
//!
//! A model is a declared entity type mapped to one table. Models are
//! declared with [`ModelDef`] / [`FieldDef`] descriptor tables and turned
//! into immutable [`Model`]s by [`CatalogBuilder::build`], which also wires
//! up the reference graph used for join inference.
//!
//! The module is organized into submodules:
//! - `field`: field descriptors and tags
//! - `index`: declared and derived indexes
//! - `catalog`: registration, reference graph, dependency ordering
//! - `error`: catalog and mapping errors

mod catalog;
mod error;
mod field;
mod index;

pub use catalog::{Catalog, CatalogBuilder, ReferenceEdge};
pub use error::{MapError, ModelError, ModelResult};
pub use field::{Field, FieldDef, FieldTags, FieldType, IndexTag, ReferenceTarget};
pub use index::Index;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::join::Join;
use crate::query::SortDir;

/// Position of a model inside its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) usize);

impl ModelId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Lifecycle hook a model may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Load,
    Save,
    Delete,
}

/// The hooks declared by one model.
///
/// Collected while joining models for field references so that the caller
/// can run them on fetched rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    pub model: String,
    pub hooks: Vec<Hook>,
}

impl Hooks {
    pub fn has(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Model declaration.
#[derive(Debug, Clone, Default)]
pub struct ModelDef {
    pub name: String,
    pub short_name: Option<String>,
    pub table: Option<String>,
    pub fields: Vec<FieldDef>,
    pub indexes: Vec<Index>,
    pub hooks: Vec<Hook>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn short_name(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    /// Override the table name (defaults to the snake_cased model name).
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }
}

/// Forward reference from one of this model's fields to another model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub field: String,
    pub target: ModelId,
    pub target_field: String,
}

/// A registered model. Immutable once the catalog is built.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) id: ModelId,
    pub(crate) name: String,
    pub(crate) short_name: Option<String>,
    pub(crate) table: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) qname_index: HashMap<String, usize>,
    pub(crate) declared_indexes: Vec<Index>,
    /// Forward references, keyed by field name.
    pub(crate) references: BTreeMap<String, Reference>,
    /// Joins that reach a related model from this one.
    pub(crate) model_references: HashMap<ModelId, Vec<Join>>,
    /// Related models, by logical and short name.
    pub(crate) named_references: HashMap<String, ModelId>,
    pub(crate) hooks: Hooks,
}

impl Model {
    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, qname: &str) -> Option<&Field> {
        self.qname_index.get(qname).map(|&i| &self.fields[i])
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.references.values()
    }

    /// Candidate joins from this model to `target`.
    pub fn joins_to(&self, target: ModelId) -> &[Join] {
        self.model_references
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Related model registered under `name` (logical or short).
    pub fn named_reference(&self, name: &str) -> Option<ModelId> {
        self.named_references.get(name).copied()
    }

    /// Whether `name` is this model's logical or short name.
    pub fn is_named(&self, name: &str) -> bool {
        name == self.name || self.short_name.as_deref() == Some(name)
    }

    /// `Name|qname`.
    pub fn full_name(&self, qname: &str) -> String {
        format!("{}|{}", self.name, qname)
    }

    /// Resolve a field name, optionally prefixed by `Type|`, to its quoted
    /// column and semantic type.
    pub fn map(&self, qname: &str) -> Result<(&str, FieldType), MapError> {
        let qname = match qname.split_once('|') {
            Some((name, rest)) => {
                if !self.is_named(name) {
                    return Err(MapError::NotThisModel(name.to_string()));
                }
                rest
            }
            None => qname,
        };
        match self.field(qname) {
            Some(field) => Ok((&field.quoted, field.field_type)),
            None => Err(MapError::CantMap(qname.to_string())),
        }
    }

    /// Declared indexes followed by those derived from field tags.
    pub fn indexes(&self) -> Vec<Index> {
        let mut indexes = self.declared_indexes.clone();
        for field in &self.fields {
            let Some(tag) = field.tags.index else {
                continue;
            };
            if tag.ascending() {
                let mut idx = Index::new([field.name.as_str()]);
                idx.unique = field.tags.unique;
                indexes.push(idx);
            }
            if tag.descending() {
                let mut idx = Index::new([field.name.as_str()]).set(SortDir::Desc, &field.name);
                idx.unique = field.tags.unique;
                indexes.push(idx);
            }
        }
        indexes
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

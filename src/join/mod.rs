//! Join chains.
//!
//! A [`JoinChain`] is the join plan of one query: the base model followed by
//! every model joined to it, in append order. Entries are stored in a `Vec`
//! and never removed or reordered, so positions returned by
//! [`JoinChain::join_with`] stay valid for the life of the chain.
//!
//! Joins are either explicit (the caller supplies the ON condition) or
//! inferred from the catalog's reference graph. Field and sort references
//! of the form `Type|Field` pull in further, skip-marked joins (see
//! `resolve`), and [`JoinChain::map`] resolves field names against every
//! model in the chain (see `mapping`).

mod error;
mod mapping;
mod resolve;

pub use error::JoinError;

use std::fmt;
use std::sync::Arc;

use crate::model::{Catalog, Model, ModelId};
use crate::query::Condition;

/// SQL join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Outer,
    Left,
    Right,
}

impl JoinType {
    /// Default SQL keyword. Backends may override it.
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Outer => "OUTER JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
            JoinType::Right => "RIGHT OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A join to `model` using `condition` as the ON clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub model: ModelId,
    pub join_type: JoinType,
    pub condition: Condition,
}

impl Join {
    pub fn new(model: ModelId, join_type: JoinType, condition: Condition) -> Self {
        Self {
            model,
            join_type,
            condition,
        }
    }
}

/// One entry of a join chain.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedModel {
    pub model: ModelId,
    /// Joined only to make fields reachable; never projected.
    pub skip: bool,
    /// The join that attached this entry. `None` for the root.
    pub join: Option<Join>,
}

/// The join plan of a single query.
#[derive(Debug, Clone)]
pub struct JoinChain {
    catalog: Arc<Catalog>,
    nodes: Vec<JoinedModel>,
}

impl JoinChain {
    /// An empty chain. The first `join_with` sets the root.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            nodes: Vec::new(),
        }
    }

    /// A chain rooted at the model called `name`.
    pub fn rooted(catalog: Arc<Catalog>, name: &str) -> Result<Self, JoinError> {
        let root = catalog
            .model_by_name(name)
            .ok_or_else(|| JoinError::UnknownModel(name.to_string()))?
            .id();
        Ok(Self {
            catalog,
            nodes: vec![JoinedModel {
                model: root,
                skip: false,
                join: None,
            }],
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn root(&self) -> Option<&Model> {
        self.nodes.first().map(|n| self.catalog.model(n.model))
    }

    pub fn nodes(&self) -> &[JoinedModel] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, model: ModelId) -> bool {
        self.nodes.iter().any(|n| n.model == model)
    }

    /// Models in the chain, in append order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.nodes.iter().map(|n| self.catalog.model(n.model))
    }

    /// Chain entries that are projected in results.
    pub fn projected(&self) -> impl Iterator<Item = &Model> {
        self.nodes
            .iter()
            .filter(|n| !n.skip)
            .map(|n| self.catalog.model(n.model))
    }

    /// Join `target` at the tail of the chain and return its position.
    ///
    /// With an explicit `condition` the join is appended as given. Without
    /// one, candidate joins toward `target` are collected from every model
    /// already in the chain; the join must be unique, except that candidates
    /// which are all equalities against the same value count as one.
    pub fn join_with(
        &mut self,
        target: ModelId,
        condition: Option<Condition>,
        join_type: JoinType,
    ) -> Result<usize, JoinError> {
        let target_name = self
            .catalog
            .get(target)
            .ok_or_else(|| JoinError::UnknownModel(format!("#{}", target.index())))?
            .name()
            .to_string();

        if self.nodes.is_empty() {
            self.nodes.push(JoinedModel {
                model: target,
                skip: false,
                join: None,
            });
            return Ok(0);
        }

        let join = match condition {
            Some(condition) => Join::new(target, join_type, condition),
            None => {
                let mut candidates: Vec<&Join> = self
                    .nodes
                    .iter()
                    .flat_map(|n| self.catalog.model(n.model).joins_to(target))
                    .collect();
                if candidates.len() > 1 && same_equality(&candidates) {
                    candidates.truncate(1);
                }
                match candidates.as_slice() {
                    [] => {
                        return Err(JoinError::NoRelationship {
                            chain: self.to_string(),
                            target: target_name,
                        })
                    }
                    [only] => Join {
                        join_type,
                        ..(*only).clone()
                    },
                    many => {
                        let conditions: Vec<String> =
                            many.iter().map(|j| j.condition.to_string()).collect();
                        return Err(JoinError::Ambiguous {
                            chain: self.to_string(),
                            target: target_name,
                            conditions: conditions.join(", "),
                        });
                    }
                }
            }
        };

        self.nodes.push(JoinedModel {
            model: target,
            skip: false,
            join: Some(join),
        });
        Ok(self.nodes.len() - 1)
    }

    /// Like [`JoinChain::join_with`], naming the target by logical or short name.
    pub fn join_with_name(
        &mut self,
        name: &str,
        condition: Option<Condition>,
        join_type: JoinType,
    ) -> Result<usize, JoinError> {
        let target = self
            .catalog
            .model_by_name(name)
            .ok_or_else(|| JoinError::UnknownModel(name.to_string()))?
            .id();
        self.join_with(target, condition, join_type)
    }
}

/// All candidates are equalities against the first candidate's value.
fn same_equality(candidates: &[&Join]) -> bool {
    let Some((_, first)) = candidates[0].condition.as_eq() else {
        return false;
    };
    candidates[1..].iter().all(|j| {
        j.model == candidates[0].model
            && matches!(j.condition.as_eq(), Some((_, v)) if v == first)
    })
}

impl fmt::Display for JoinChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            let name = self.catalog.model(node.model).name();
            if let Some(join) = &node.join {
                write!(f, " JOIN {}", name)?;
                if node.skip {
                    f.write_str("(Skipped)")?;
                }
                write!(f, " ON {}", join.condition)?;
            } else {
                f.write_str(name)?;
                if node.skip {
                    f.write_str("(Skipped)")?;
                }
            }
        }
        Ok(())
    }
}

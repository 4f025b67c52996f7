//! Implicit joins for field references.
//!
//! Filters and sort keys may name fields of models that are not yet part of
//! the chain (`Customer|name` on an `Order` query). Before rendering, every
//! such reference is resolved by joining the named model, skip-marked so its
//! columns are reachable but not projected.

use std::collections::HashSet;

use super::{JoinChain, JoinError, JoinType};
use crate::model::{Hooks, ModelId};
use crate::query::{Condition, Sort};

impl JoinChain {
    /// Join the model named by a `Type|Field` reference, if needed.
    ///
    /// The chain is walked from the root for a model that has `Type` among
    /// its named references. The first such model decides: if the referenced
    /// model was already visited nothing happens, otherwise it is joined,
    /// marked skipped, recorded in `visited` and its hooks are collected.
    /// Unqualified fields are ignored.
    pub fn join_with_field(
        &mut self,
        field: &str,
        join_type: JoinType,
        visited: &mut HashSet<ModelId>,
        hooks: &mut Vec<Hooks>,
    ) -> Result<(), JoinError> {
        let Some((type_name, _)) = field.split_once('|') else {
            return Ok(());
        };

        let found = self
            .nodes
            .iter()
            .find_map(|n| self.catalog.model(n.model).named_reference(type_name));
        let Some(target) = found else {
            return Ok(());
        };
        if visited.contains(&target) {
            return Ok(());
        }

        let pos = self.join_with(target, None, join_type)?;
        self.nodes[pos].skip = true;
        visited.insert(target);
        hooks.push(self.catalog.model(target).hooks().clone());
        Ok(())
    }

    /// Resolve the field of `condition` and of all its sub-conditions.
    pub fn join_with_condition(
        &mut self,
        condition: &Condition,
        join_type: JoinType,
        visited: &mut HashSet<ModelId>,
        hooks: &mut Vec<Hooks>,
    ) -> Result<(), JoinError> {
        if let Some(field) = condition.field_name() {
            self.join_with_field(field, join_type, visited, hooks)?;
        }
        for sub in condition.sub_conditions() {
            self.join_with_condition(sub, join_type, visited, hooks)?;
        }
        Ok(())
    }

    /// Resolve the field of every sort key.
    pub fn join_with_sort(
        &mut self,
        sort: &[Sort],
        join_type: JoinType,
        visited: &mut HashSet<ModelId>,
        hooks: &mut Vec<Hooks>,
    ) -> Result<(), JoinError> {
        for key in sort {
            self.join_with_field(key.field(), join_type, visited, hooks)?;
        }
        Ok(())
    }

    /// Models already in the chain, as a starting visited set.
    pub fn visited(&self) -> HashSet<ModelId> {
        self.nodes.iter().map(|n| n.model).collect()
    }
}

//! Query builder.
//!
//! A [`Query`] holds the explicit part of a query (base model, explicit
//! joins, filter, sort, paging). [`Query::compile`] resolves the implicit
//! joins needed by the filter and sort keys on a copy of the chain and
//! renders the SELECT, so one `Query` can be compiled any number of times.

use std::sync::Arc;

use super::{Condition, Sort, SortDir, Value};
use crate::error::Result;
use crate::executor::{Db, ExecError, Rows};
use crate::join::{JoinChain, JoinType};
use crate::model::{Catalog, Field, Hooks, Model};
use crate::sql::SelectStatement;

/// A SELECT under construction against one base model.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct Query {
    chain: JoinChain,
    filter: Option<Condition>,
    sort: Vec<Sort>,
    limit: Option<u64>,
    offset: Option<u64>,
    implicit_join: JoinType,
}

impl Query {
    /// Start a query on the model called `model` (logical or short name).
    pub fn new(catalog: Arc<Catalog>, model: &str) -> Result<Self> {
        Ok(Self {
            chain: JoinChain::rooted(catalog, model)?,
            filter: None,
            sort: Vec::new(),
            limit: None,
            offset: None,
            implicit_join: JoinType::Inner,
        })
    }

    /// Explicitly join another model. Its fields are projected.
    ///
    /// Without a condition the join is inferred from references.
    pub fn join(
        mut self,
        model: &str,
        condition: Option<Condition>,
        join_type: JoinType,
    ) -> Result<Self> {
        self.chain.join_with_name(model, condition, join_type)?;
        Ok(self)
    }

    /// Add a filter, AND-combined with any previous one.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and_also(condition),
            None => condition,
        });
        self
    }

    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.sort.push(Sort::new(field, dir));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Join type used for joins pulled in by `Type|Field` references.
    pub fn implicit_join_type(mut self, join_type: JoinType) -> Self {
        self.implicit_join = join_type;
        self
    }

    pub fn chain(&self) -> &JoinChain {
        &self.chain
    }

    /// Resolve implicit joins and render the statement.
    pub fn compile(&self) -> Result<CompiledQuery> {
        let mut chain = self.chain.clone();
        let mut visited = chain.visited();
        let mut hooks = Vec::new();

        if let Some(filter) = &self.filter {
            chain.join_with_condition(filter, self.implicit_join, &mut visited, &mut hooks)?;
        }
        chain.join_with_sort(&self.sort, self.implicit_join, &mut visited, &mut hooks)?;

        let (sql, args) = SelectStatement::new(&chain)
            .filter(self.filter.as_ref())
            .sort(&self.sort)
            .limit(self.limit)
            .offset(self.offset)
            .render()?;

        Ok(CompiledQuery {
            sql,
            args,
            chain,
            hooks,
        })
    }
}

/// A rendered query, ready to run.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<Value>,
    /// The chain after implicit joins were added.
    pub chain: JoinChain,
    /// Hooks of the models joined for field references.
    pub hooks: Vec<Hooks>,
}

impl CompiledQuery {
    /// Projected fields, in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&Model, &Field)> {
        self.chain
            .projected()
            .flat_map(|m| m.fields().iter().map(move |f| (m, f)))
    }

    pub fn fetch(&self, db: &Db) -> std::result::Result<Rows, ExecError> {
        db.query(&self.sql, &self.args)
    }
}

//! Catalog construction and the reference graph.
//!
//! References are stored three ways:
//! - forward, on the source model, keyed by field
//! - as join candidates on both endpoints, so joins can be inferred in
//!   either direction
//! - as edges of a petgraph `DiGraph` (source -> target), used for
//!   dependency ordering

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use inflector::Inflector;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use regex::Regex;

use super::{
    Field, FieldDef, Hooks, Model, ModelDef, ModelError, ModelId, ModelResult, Reference,
};
use crate::backend::{Backend, SqlBackend};
use crate::join::{Join, JoinType};
use crate::query::{Condition, Value};

static MODEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Edge data for a reference in the graph.
#[derive(Debug, Clone)]
pub struct ReferenceEdge {
    pub field: String,
    pub target_field: String,
}

/// Collects model declarations and builds an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    backend: Backend,
    defs: Vec<ModelDef>,
}

impl CatalogBuilder {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            defs: Vec::new(),
        }
    }

    pub fn register(mut self, def: ModelDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Validate every declaration, resolve references and build the graph.
    pub fn build(self) -> ModelResult<Catalog> {
        let backend = self.backend;
        let mut models: Vec<Model> = Vec::with_capacity(self.defs.len());
        let mut by_name: HashMap<String, ModelId> = HashMap::new();

        for (i, def) in self.defs.into_iter().enumerate() {
            let id = ModelId(i);
            check_name("model", &def.name, &MODEL_NAME)?;
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(ModelError::DuplicateModel(def.name));
            }
            if let Some(short) = &def.short_name {
                check_name("model", short, &MODEL_NAME)?;
                if short != &def.name && by_name.insert(short.clone(), id).is_some() {
                    return Err(ModelError::DuplicateModel(short.clone()));
                }
            }
            models.push(build_model(id, def, backend)?);
        }

        let mut graph: DiGraph<ModelId, ReferenceEdge> = DiGraph::new();
        let nodes: Vec<NodeIndex> = models.iter().map(|m| graph.add_node(m.id)).collect();

        // Resolve every reference tag before touching the models, since
        // wiring mutates both endpoints.
        let mut pending = Vec::new();
        for model in &models {
            for field in &model.fields {
                let Some(target) = &field.tags.references else {
                    continue;
                };
                let target_id = *by_name.get(&target.model).ok_or_else(|| {
                    ModelError::UnknownReference {
                        model: model.name.clone(),
                        field: field.name.clone(),
                        target: target.model.clone(),
                    }
                })?;
                let target_model = &models[target_id.0];
                if target_model.field(&target.field).is_none() {
                    return Err(ModelError::UnknownField {
                        model: target_model.name.clone(),
                        field: target.field.clone(),
                    });
                }
                pending.push((model.id, field.name.clone(), target_id, target.field.clone()));
            }
        }

        for (source, field, target, target_field) in pending {
            let condition = Condition::eq(
                models[source.0].full_name(&field),
                Value::field(models[target.0].full_name(&target_field)),
            );
            let (target_name, target_short) = names_of(&models[target.0]);
            let (source_name, source_short) = names_of(&models[source.0]);

            let src = &mut models[source.0];
            src.references.insert(
                field.clone(),
                Reference {
                    field: field.clone(),
                    target,
                    target_field: target_field.clone(),
                },
            );
            src.model_references
                .entry(target)
                .or_default()
                .push(Join::new(target, JoinType::Inner, condition.clone()));
            register_name(src, target_name, target_short, target);

            if source != target {
                let tgt = &mut models[target.0];
                tgt.model_references
                    .entry(source)
                    .or_default()
                    .push(Join::new(source, JoinType::Inner, condition));
                register_name(tgt, source_name, source_short, source);

                graph.add_edge(
                    nodes[source.0],
                    nodes[target.0],
                    ReferenceEdge {
                        field,
                        target_field,
                    },
                );
            }
        }

        Ok(Catalog {
            backend,
            models,
            by_name,
            graph,
            nodes,
        })
    }
}

fn check_name(kind: &'static str, name: &str, pattern: &Regex) -> ModelResult<()> {
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(ModelError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

fn names_of(model: &Model) -> (String, Option<String>) {
    (model.name.clone(), model.short_name.clone())
}

fn register_name(model: &mut Model, name: String, short: Option<String>, id: ModelId) {
    if let Some(short) = short {
        model.named_references.insert(short, id);
    }
    model.named_references.insert(name, id);
}

fn build_model(id: ModelId, def: ModelDef, backend: Backend) -> ModelResult<Model> {
    let table = def.table.unwrap_or_else(|| def.name.to_snake_case());
    let quoted_table = backend.quote_identifier(&table);

    let mut fields = Vec::with_capacity(def.fields.len());
    let mut qname_index = HashMap::new();
    for FieldDef {
        name,
        column,
        field_type,
        tags,
    } in def.fields
    {
        check_name("field", &name, &FIELD_NAME)?;
        if qname_index.insert(name.clone(), fields.len()).is_some() {
            return Err(ModelError::DuplicateField {
                model: def.name,
                field: name,
            });
        }
        let column = column.unwrap_or_else(|| name.replace('.', "_").to_snake_case());
        let quoted = format!("{}.{}", quoted_table, backend.quote_identifier(&column));
        fields.push(Field {
            name,
            column,
            quoted,
            field_type,
            tags,
        });
    }

    for index in &def.indexes {
        for name in index.field_names() {
            if !qname_index.contains_key(name) {
                return Err(ModelError::UnknownField {
                    model: def.name,
                    field: name.to_string(),
                });
            }
        }
    }

    Ok(Model {
        id,
        hooks: Hooks {
            model: def.name.clone(),
            hooks: def.hooks,
        },
        name: def.name,
        short_name: def.short_name,
        table,
        fields,
        qname_index,
        declared_indexes: def.indexes,
        references: Default::default(),
        model_references: HashMap::new(),
        named_references: HashMap::new(),
    })
}

/// Immutable set of registered models plus their reference graph.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
#[derive(Debug)]
pub struct Catalog {
    backend: Backend,
    models: Vec<Model>,
    by_name: HashMap<String, ModelId>,
    graph: DiGraph<ModelId, ReferenceEdge>,
    nodes: Vec<NodeIndex>,
}

impl Catalog {
    pub fn builder(backend: Backend) -> CatalogBuilder {
        CatalogBuilder::new(backend)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Get a model by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from another catalog. Use [`Catalog::get`] for ids
    /// of unknown origin.
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    /// Look up a model by logical or short name.
    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.by_name.get(name).map(|id| &self.models[id.0])
    }

    /// Like [`Catalog::model_by_name`], failing with `UnknownModel`.
    pub fn require(&self, name: &str) -> ModelResult<&Model> {
        self.model_by_name(name)
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The reference graph. Nodes are model ids, edges point from the
    /// referencing model to the referenced one. Self references are omitted.
    pub fn graph(&self) -> &DiGraph<ModelId, ReferenceEdge> {
        &self.graph
    }

    /// Number of references between distinct models.
    pub fn reference_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Strict ordering for dependency-first processing.
    ///
    /// True unless `b` is directly or transitively referenced by `a`.
    pub fn less(&self, a: ModelId, b: ModelId) -> bool {
        if a == b {
            return false;
        }
        let goal = self.nodes[b.0];
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.graph.neighbors(self.nodes[a.0]).collect();
        while let Some(node) = stack.pop() {
            if node == goal {
                return false;
            }
            if visited.insert(node) {
                stack.extend(self.graph.neighbors(node));
            }
        }
        true
    }

    /// All models, referenced models before the models referencing them.
    ///
    /// Ties are broken by registration order.
    pub fn dependency_order(&self) -> ModelResult<Vec<ModelId>> {
        let mut pending: Vec<usize> = self
            .nodes
            .iter()
            .map(|&n| self.graph.edges_directed(n, Direction::Outgoing).count())
            .collect();
        let mut ready: BTreeSet<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, &deps)| deps == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.models.len());
        while let Some(i) = ready.pop_first() {
            order.push(ModelId(i));
            for dependent in self.graph.neighbors_directed(self.nodes[i], Direction::Incoming) {
                let d = self.graph[dependent].0;
                pending[d] -= 1;
                if pending[d] == 0 {
                    ready.insert(d);
                }
            }
        }

        if order.len() < self.models.len() {
            let cycle = pending
                .iter()
                .enumerate()
                .filter(|(_, &deps)| deps > 0)
                .map(|(i, _)| self.models[i].name.clone())
                .collect();
            return Err(ModelError::CyclicReference(cycle));
        }
        Ok(order)
    }
}

//! # Joinery
//!
//! The query-construction and execution core of an object-relational
//! mapping layer.
//!
//! ## Architecture
//!
//! Models are declared once, as static descriptor tables, and every query is
//! planned as a chain of joins over them:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          ModelDef / FieldDef (declarations)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [CatalogBuilder::build]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Catalog (models + reference graph, shared)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [join resolver, field mapper]
//! ┌─────────────────────────────────────────────────────────┐
//! │          JoinChain (per query, append-only)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [SELECT renderer]
//! ┌─────────────────────────────────────────────────────────┐
//! │              SQL text with `?` + bind args               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Db: rewrite, statement cache, tx]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Driver (rusqlite, ...)                  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use joinery::prelude::*;
//!
//! let catalog = CatalogBuilder::new(Backend::Sqlite)
//!     .register(
//!         ModelDef::new("Author")
//!             .field(FieldDef::new("id", FieldType::Integer).primary_key())
//!             .field(FieldDef::new("name", FieldType::Text)),
//!     )
//!     .register(
//!         ModelDef::new("Book")
//!             .field(FieldDef::new("id", FieldType::Integer).primary_key())
//!             .field(FieldDef::new("title", FieldType::Text))
//!             .field(FieldDef::new("author", FieldType::Integer).references("Author", "id")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let compiled = Query::new(Arc::new(catalog), "Book")
//!     .unwrap()
//!     .filter(Condition::eq("Author|name", "Le Guin"))
//!     .compile()
//!     .unwrap();
//!
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT \"book\".\"id\", \"book\".\"title\", \"book\".\"author\" FROM \"book\" \
//!      INNER JOIN \"author\" ON \"book\".\"author\" = \"author\".\"id\" \
//!      WHERE \"author\".\"name\" = ?"
//! );
//! ```

pub mod backend;
pub mod config;
mod error;
pub mod executor;
pub mod join;
pub mod model;
pub mod query;
pub mod sql;

pub use error::{Error, Result};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::backend::{Backend, SqlBackend};
    pub use crate::config::Settings;
    pub use crate::executor::{Db, Driver, ExecError, Row, Rows, SqliteDriver};
    pub use crate::join::{JoinChain, JoinError, JoinType};
    pub use crate::model::{
        Catalog, CatalogBuilder, FieldDef, FieldType, Hook, Index, IndexTag, MapError, ModelDef,
        ModelError,
    };
    pub use crate::query::{CompiledQuery, Condition, Query, Sort, SortDir, Value};
    pub use crate::{Error, Result};
}

//! Query vocabulary and the query builder.
//!
//! - `value`: bind values and field references
//! - `condition`: filter and join conditions
//! - `sort`: sort keys
//! - [`builder`]: [`Query`], compiled against a join chain

pub mod builder;
mod condition;
mod sort;
mod value;

pub use builder::{CompiledQuery, Query};
pub use condition::{CompareOp, Condition};
pub use sort::{Sort, SortDir};
pub use value::Value;

//! SQL generation.
//!
//! - [`select`] - SELECT rendering over a join chain
//! - [`token`] - token types for SQL generation
//!
//! Rendered SQL always uses `?` placeholders; backend-specific placeholder
//! syntax is applied by the executor.

pub mod select;
pub mod token;

pub use select::SelectStatement;
pub use token::{Token, TokenStream};

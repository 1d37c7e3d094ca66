//! oncograph-common: shared types, errors and macros used across all oncograph crates.
//!
//! - `Value`: the scalar stored in a table cell and in node/edge properties
//! - `Table` / `Record`: the in-memory record set handed between pipeline stages
//! - `Node` / `Edge`: the graph tuples emitted for bulk import
//! - `column_enum!`: closed field enumerations carrying their source column names

pub mod error;
pub mod value;
pub mod table;
pub mod graph;
pub mod columns;

// Re-export commonly used types
pub use error::{OncographError, Result};
pub use value::Value;
pub use table::{Record, Table};
pub use graph::{Edge, Node, Properties};

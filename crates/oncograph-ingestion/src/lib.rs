//! oncograph-ingestion: from flat source files to normalised record sets.
//! Covers the table side of the record-to-graph transformation:
//! - Delimited-file loading (TSV / semicolon CSV, with or without a header)
//! - Field projection against a configured allow-list
//! - Multi-value explosion of delimiter-joined cells
//! - Content-hash identifiers for rows without a natural key
//! - Order-preserving deduplication

pub mod loader;
pub mod normalise;
pub mod dedup;
pub mod pipeline;

pub use loader::{load_headerless, load_table, read_headerless, read_table, SourceFormat};
pub use pipeline::NormalisationPipeline;

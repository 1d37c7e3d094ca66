//! oncograph-kg: graph construction from normalised source tables.
//! Covers the graph side of the record-to-graph transformation:
//! - Entity and relationship extraction with deterministic ids
//! - Property rendering for the graph store (numeric nulls as "NaN")
//! - Source adapters (variants, copy number, clinical, OncoKB, oncodash)
//! - Cross-adapter merge under an explicit policy

pub mod labels;
pub mod properties;
pub mod extraction;
pub mod adapters;
pub mod merge;

pub use adapters::{stream_into, GraphAdapter};
pub use extraction::{EdgeIdStrategy, EntityExtractor, RelationshipExtractor};
pub use merge::{GraphSink, GraphSummary, MergePolicy, MergedGraph};
pub use properties::PropertyColumn;

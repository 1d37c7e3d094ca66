//! Graph tuples handed to the graph store.
//! Shapes mirror the store's bulk-import input: `(id, label, properties)` for
//! nodes and `(id?, source, target, label, properties)` for edges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Property map. Ordered so serialized output is stable across runs.
pub type Properties = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub properties: Properties,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, properties: Properties) -> Self {
        Self { id: id.into(), label: label.into(), properties }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// `None` when the store should synthesize its own id.
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    pub label: String,
    pub properties: Properties,
}

impl Edge {
    pub fn new(
        id: Option<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            target: target.into(),
            label: label.into(),
            properties,
        }
    }
}

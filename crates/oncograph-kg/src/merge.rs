//! Cross-adapter merge.
//!
//! Several adapters emit the same entity (a patient from both the variant
//! calls and the clinical export, a gene from copy-number data and as an
//! edge endpoint elsewhere). Nodes are identified by `(label, id)`; their
//! property maps are unioned, and a key present on both sides with different
//! values is resolved by the [`MergePolicy`].
//!
//! Edges are appended as emitted. Endpoints are not checked on insert;
//! [`MergedGraph::dangling_edges`] reports the ones that point nowhere.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use oncograph_common::{Edge, Node, OncographError, Result};

/// Rule for a property key both sides of a node merge define differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The value from the adapter streamed later wins.
    LastWriteWins,
    /// The value already in the graph is kept.
    FirstWriteWins,
    /// Abort with [`OncographError::ConflictingProperty`].
    #[default]
    ErrorOnConflict,
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last_write_wins" => Ok(MergePolicy::LastWriteWins),
            "first_write_wins" => Ok(MergePolicy::FirstWriteWins),
            "error_on_conflict" => Ok(MergePolicy::ErrorOnConflict),
            other => Err(format!(
                "unknown merge policy `{other}` (expected last_write_wins, first_write_wins or error_on_conflict)"
            )),
        }
    }
}

/// Destination of a graph stream.
pub trait GraphSink {
    /// Consume nodes; returns how many were written.
    fn write_nodes(&mut self, nodes: Box<dyn Iterator<Item = Node> + '_>) -> Result<usize>;

    /// Consume edges; returns how many were written.
    fn write_edges(&mut self, edges: Box<dyn Iterator<Item = Edge> + '_>) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// MergedGraph
// ---------------------------------------------------------------------------

/// In-memory sink that merges nodes by `(label, id)`.
#[derive(Debug, Default)]
pub struct MergedGraph {
    policy: MergePolicy,
    nodes: Vec<Node>,
    index: AHashMap<(String, String), usize>,
    edges: Vec<Edge>,
}

impl MergedGraph {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Nodes in first-seen order.
    pub fn nodes(&self) -> &[Node] { &self.nodes }

    pub fn edges(&self) -> &[Edge] { &self.edges }

    pub fn node(&self, label: &str, id: &str) -> Option<&Node> {
        self.index
            .get(&(label.to_string(), id.to_string()))
            .map(|&i| &self.nodes[i])
    }

    /// Insert a node, or merge it into the node with the same label and id.
    pub fn merge_node(&mut self, node: Node) -> Result<()> {
        let key = (node.label.clone(), node.id.clone());
        let Some(&i) = self.index.get(&key) else {
            self.index.insert(key, self.nodes.len());
            self.nodes.push(node);
            return Ok(());
        };

        let existing = &mut self.nodes[i];
        for (k, incoming) in node.properties {
            match existing.properties.get(&k) {
                None => {
                    existing.properties.insert(k, incoming);
                }
                Some(current) if *current == incoming => {}
                Some(_) => match self.policy {
                    MergePolicy::LastWriteWins => {
                        debug!(label = %existing.label, id = %existing.id, key = %k, "Property overwritten on merge");
                        existing.properties.insert(k, incoming);
                    }
                    MergePolicy::FirstWriteWins => {
                        debug!(label = %existing.label, id = %existing.id, key = %k, "Later property value ignored on merge");
                    }
                    MergePolicy::ErrorOnConflict => {
                        return Err(OncographError::ConflictingProperty {
                            label: existing.label.clone(),
                            id: existing.id.clone(),
                            key: k,
                        });
                    }
                },
            }
        }
        Ok(())
    }

    /// Edges whose source or target id is not the id of any node.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids: AHashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut summary = GraphSummary::default();
        for n in &self.nodes {
            *summary.nodes.entry(n.label.clone()).or_default() += 1;
        }
        for e in &self.edges {
            *summary.edges.entry(e.label.clone()).or_default() += 1;
        }
        summary
    }
}

impl GraphSink for MergedGraph {
    fn write_nodes(&mut self, nodes: Box<dyn Iterator<Item = Node> + '_>) -> Result<usize> {
        let before = self.nodes.len();
        let mut seen = 0;
        for node in nodes {
            self.merge_node(node)?;
            seen += 1;
        }
        info!(received = seen, new = self.nodes.len() - before, "Merged nodes");
        Ok(seen)
    }

    fn write_edges(&mut self, edges: Box<dyn Iterator<Item = Edge> + '_>) -> Result<usize> {
        let before = self.edges.len();
        self.edges.extend(edges);
        Ok(self.edges.len() - before)
    }
}

// ---------------------------------------------------------------------------
// GraphSummary
// ---------------------------------------------------------------------------

/// Node and edge counts per label, sorted by label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: BTreeMap<String, usize>,
    pub edges: BTreeMap<String, usize>,
}

impl GraphSummary {
    pub fn node_count(&self) -> usize { self.nodes.values().sum() }

    pub fn edge_count(&self) -> usize { self.edges.values().sum() }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.nodes.keys().chain(self.edges.keys()).map(String::len).max().unwrap_or(0);
        writeln!(f, "nodes ({})", self.node_count())?;
        for (label, n) in &self.nodes {
            writeln!(f, "  {label:<width$}  {n:>8}")?;
        }
        writeln!(f, "edges ({})", self.edge_count())?;
        for (label, n) in &self.edges {
            writeln!(f, "  {label:<width$}  {n:>8}")?;
        }
        Ok(())
    }
}

//! Entity and relationship extraction.
//!
//! Extractors turn a normalised table into lazy node or edge iterators.
//! They hold no per-run state: every call re-walks the table, so a graph
//! stream can be replayed and yields the same tuples in the same order.
//!
//! Entities are deduplicated on their key plus property columns, edges on
//! their full projected row. Endpoint pairs alone are never deduplicated,
//! and endpoints are never checked against emitted nodes.
//!
//! Ids, endpoints, digests and dedup keys all use [`Value::text`], so two
//! rows that derive the same id also collapse into the same node.

use std::borrow::Cow;

use sha2::{Digest, Sha256};
use tracing::warn;

use oncograph_common::{Edge, Node, Result, Table, Value};
use oncograph_ingestion::dedup::unique_by;
use oncograph_ingestion::normalise::md5_hex;

use crate::properties::{PropertyColumn, PropertyRenderer};

// ── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EntityExtractor {
    label: String,
    id_column: String,
    properties: Vec<PropertyColumn>,
    numeric: Vec<String>,
    id_aliases: Vec<String>,
}

impl EntityExtractor {
    pub fn new(label: impl Into<String>, id_column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id_column: id_column.into(),
            properties: Vec::new(),
            numeric: Vec::new(),
            id_aliases: Vec::new(),
        }
    }

    pub fn properties<I, P>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyColumn>,
    {
        self.properties.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Columns rendered as numbers even when the data alone can't tell.
    pub fn numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Also write the key under `key` in the property map (e.g. `name`).
    /// May be called more than once.
    pub fn id_alias(mut self, key: impl Into<String>) -> Self {
        self.id_aliases.push(key.into());
        self
    }

    pub fn validate(&self, table: &Table) -> Result<()> {
        table.require_column(&self.id_column).map(|_| ())
    }

    /// Lazy, deduplicated nodes in source order. Rows with a null key are
    /// skipped.
    pub fn extract<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = Node> + 'a {
        let plan = match table.column_index(&self.id_column) {
            Some(id_idx) => {
                let columns = self.properties.iter().filter(|p| p.column != self.id_column);
                Some((id_idx, PropertyRenderer::new(table, columns, &self.numeric)))
            }
            None => {
                warn!(label = %self.label, column = %self.id_column, "Key column missing; no nodes extracted");
                None
            }
        };

        plan.into_iter().flat_map(move |(id_idx, renderer)| {
            let key: Vec<usize> = std::iter::once(id_idx).chain(renderer.indices()).collect();
            let rows = unique_by(table.raw_rows().iter(), move |row: &&'a Vec<Value>| {
                let row: &'a Vec<Value> = *row;
                project_row(row, &key)
            });
            rows.filter(move |row| !row[id_idx].is_null())
                .map(move |row| self.node(&row[id_idx], row, &renderer))
        })
    }

    fn node(&self, id: &Value, row: &[Value], renderer: &PropertyRenderer) -> Node {
        let mut properties = renderer.render(row);
        for alias in &self.id_aliases {
            properties.insert(alias.clone(), id.clone());
        }
        Node::new(id.text(), self.label.clone(), properties)
    }
}

// ── Relationships ───────────────────────────────────────────────────────────

/// How an edge id is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeIdStrategy {
    /// No id; the store synthesizes one.
    Omitted,
    /// MD5 hex of `source + target`.
    EndpointDigest,
    /// SHA-256 hex of the whole source row.
    RowDigest,
}

#[derive(Debug, Clone)]
pub struct RelationshipExtractor {
    label: String,
    source_column: String,
    target_column: String,
    id_strategy: EdgeIdStrategy,
    properties: Vec<PropertyColumn>,
    numeric: Vec<String>,
    excluded_targets: Vec<String>,
}

impl RelationshipExtractor {
    pub fn new(
        label: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
            id_strategy: EdgeIdStrategy::Omitted,
            properties: Vec::new(),
            numeric: Vec::new(),
            excluded_targets: Vec::new(),
        }
    }

    pub fn id_strategy(mut self, strategy: EdgeIdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn properties<I, P>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyColumn>,
    {
        self.properties.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Drop rows whose target text equals `value`.
    pub fn exclude_target(mut self, value: impl Into<String>) -> Self {
        self.excluded_targets.push(value.into());
        self
    }

    pub fn validate(&self, table: &Table) -> Result<()> {
        table.require_column(&self.source_column)?;
        table.require_column(&self.target_column)?;
        Ok(())
    }

    /// Lazy, deduplicated edges in source order.
    pub fn extract<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = Edge> + 'a {
        let plan = match (table.column_index(&self.source_column), table.column_index(&self.target_column)) {
            (Some(src), Some(tgt)) => Some((src, tgt, PropertyRenderer::new(table, &self.properties, &self.numeric))),
            _ => {
                warn!(
                    label = %self.label,
                    source = %self.source_column,
                    target = %self.target_column,
                    "Endpoint column missing; no edges extracted"
                );
                None
            }
        };

        plan.into_iter().flat_map(move |(src, tgt, renderer)| {
            let key: Vec<usize> = [src, tgt].into_iter().chain(renderer.indices()).collect();
            let rows = unique_by(table.raw_rows().iter(), move |row: &&'a Vec<Value>| {
                let row: &'a Vec<Value> = *row;
                project_row(row, &key)
            });
            rows.filter(move |row| !row[src].is_null() && !row[tgt].is_null())
                .filter(move |row| !self.is_excluded(&row[tgt]))
                .map(move |row| self.edge(table, row, src, tgt, &renderer))
        })
    }

    fn is_excluded(&self, target: &Value) -> bool {
        let text = target.text();
        self.excluded_targets.iter().any(|x| *x == text)
    }

    fn edge(&self, table: &Table, row: &[Value], src: usize, tgt: usize, renderer: &PropertyRenderer) -> Edge {
        let source = row[src].text().into_owned();
        let target = row[tgt].text().into_owned();
        let id = match self.id_strategy {
            EdgeIdStrategy::Omitted => None,
            EdgeIdStrategy::EndpointDigest => Some(md5_hex([&source, &target])),
            EdgeIdStrategy::RowDigest => Some(row_digest(table.columns(), row)),
        };
        Edge::new(id, source, target, self.label.clone(), renderer.render(row))
    }
}

/// SHA-256 hex over `column=value` lines of a row, in table order.
pub fn row_digest(columns: &[String], row: &[Value]) -> String {
    let mut hasher = Sha256::new();
    for (i, (column, value)) in columns.iter().zip(row).enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(column.as_bytes());
        hasher.update(b"=");
        hasher.update(value.text().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn project_row<'r>(row: &'r [Value], indices: &[usize]) -> Vec<Cow<'r, str>> {
    indices.iter().map(|&i| row[i].text()).collect()
}

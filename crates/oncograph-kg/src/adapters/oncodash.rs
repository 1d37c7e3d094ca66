//! Oncodash biological-process adapter.
//!
//! Source: two header-less `;` part files exported from oncodash. The process
//! file has `id;name;preferred_id;label` rows, the gene link file
//! `Gene;BiologicalProcess;Label` rows. Ids carry a type suffix
//! (`:biological_process`, `:gene_hugo`) that is removed, and an id reading
//! `None` after the suffix is gone marks a row with no process.
//!
//! Only the id survives from the process file: the node label is fixed and
//! `name` is the id again. Link edges carry no properties.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use oncograph_common::{column_enum, Edge, Node, Result, Table, Value};
use oncograph_ingestion::{load_headerless, SourceFormat};

use super::GraphAdapter;
use crate::extraction::{EdgeIdStrategy, EntityExtractor, RelationshipExtractor};
use crate::labels;

const PROCESS_SUFFIX: &str = ":biological_process";
const GENE_SUFFIX: &str = ":gene_hugo";

column_enum! {
    pub enum ProcessField {
        Id => "id",
        Name => "name",
        PreferredId => "preferred_id",
        Label => "label",
    }
}

column_enum! {
    pub enum GeneProcessField {
        Gene => "Gene",
        BiologicalProcess => "BiologicalProcess",
        Label => "Label",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OncodashNodeType {
    BiologicalProcess,
}

impl OncodashNodeType {
    pub const ALL: &'static [Self] = &[Self::BiologicalProcess];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OncodashEdgeType {
    GeneToProcess,
}

impl OncodashEdgeType {
    pub const ALL: &'static [Self] = &[Self::GeneToProcess];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OncodashSettings {
    pub node_types: Vec<OncodashNodeType>,
    pub edge_types: Vec<OncodashEdgeType>,
}

impl Default for OncodashSettings {
    fn default() -> Self {
        Self {
            node_types: OncodashNodeType::ALL.to_vec(),
            edge_types: OncodashEdgeType::ALL.to_vec(),
        }
    }
}

pub struct OncodashAdapter {
    processes: Table,
    links: Table,
    process_nodes: Option<EntityExtractor>,
    gene_links: Option<RelationshipExtractor>,
}

impl OncodashAdapter {
    #[instrument(skip(settings))]
    pub fn load(nodes_path: &Path, edges_path: &Path, settings: &OncodashSettings) -> Result<Self> {
        let process_columns: Vec<&str> = ProcessField::ALL.iter().map(ProcessField::column).collect();
        let link_columns: Vec<&str> = GeneProcessField::ALL.iter().map(GeneProcessField::column).collect();
        let processes = load_headerless(nodes_path, SourceFormat::SEMICOLON, &process_columns)?;
        let links = load_headerless(edges_path, SourceFormat::SEMICOLON, &link_columns)?;
        Self::from_tables(&processes, &links, settings)
    }

    pub fn from_tables(processes: &Table, links: &Table, settings: &OncodashSettings) -> Result<Self> {
        let id = ProcessField::Id.column();
        let processes = strip_suffix(processes, id, PROCESS_SUFFIX)?;
        let kept = processes.filter(|r| r.get(id).is_some_and(|v| !v.is_null()));
        debug!(dropped = processes.len() - kept.len(), "Dropped processes without an id");
        let processes = kept.select(&[id])?;

        let gene = GeneProcessField::Gene.column();
        let process = GeneProcessField::BiologicalProcess.column();
        let links = strip_suffix(&strip_suffix(links, gene, GENE_SUFFIX)?, process, PROCESS_SUFFIX)?;
        let kept = links.filter(|r| r.get(process).is_some_and(|v| !v.is_null()));
        debug!(dropped = links.len() - kept.len(), "Dropped gene links without a process");
        let links = kept.select(&[gene, process])?;

        let process_nodes = settings
            .node_types
            .contains(&OncodashNodeType::BiologicalProcess)
            .then(|| EntityExtractor::new(labels::BIOLOGICAL_PROCESS, id).id_alias("name"));
        let gene_links = settings.edge_types.contains(&OncodashEdgeType::GeneToProcess).then(|| {
            RelationshipExtractor::new(labels::GENE_TO_PROCESS, gene, process)
                .id_strategy(EdgeIdStrategy::EndpointDigest)
        });

        info!(processes = processes.len(), links = links.len(), "Oncodash adapter ready");
        Ok(Self { processes, links, process_nodes, gene_links })
    }
}

/// Remove every `suffix` from the text of `column`. A result that reads as a
/// missing marker (`None`, empty) becomes null.
fn strip_suffix(table: &Table, column: &str, suffix: &str) -> Result<Table> {
    let idx = table.require_column(column)?;
    let values = table
        .raw_rows()
        .iter()
        .map(|row| match &row[idx] {
            Value::Null => Value::Null,
            cell => Value::parse(&cell.text().replace(suffix, "")),
        })
        .collect();
    table.with_column(column, values)
}

impl GraphAdapter for OncodashAdapter {
    fn name(&self) -> &'static str { "oncodash" }

    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_> {
        Box::new(self.process_nodes.iter().flat_map(|ex| ex.extract(&self.processes)))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.gene_links.iter().flat_map(|ex| ex.extract(&self.links)))
    }
}

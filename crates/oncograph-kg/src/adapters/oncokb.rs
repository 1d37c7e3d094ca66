//! OncoKB biomarker-drug associations adapter.
//!
//! Source: tab-separated OncoKB export. Drugs, alterations and cancer types
//! are `", "`-joined lists and are exploded independently, so one source row
//! yields every (drug, alteration, cancer type) combination. Rows with an
//! empty drug cell are dropped; any other drug text, numeric-looking or not,
//! names a drug node carrying `id` and `name`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use oncograph_common::{column_enum, Edge, Node, Result, Table};
use oncograph_ingestion::normalise::{ExplodeGroup, ExplodeTarget};
use oncograph_ingestion::{load_table, NormalisationPipeline, SourceFormat};

use super::{chosen, GraphAdapter};
use crate::extraction::{EdgeIdStrategy, EntityExtractor, RelationshipExtractor};
use crate::labels;
use crate::properties::PropertyColumn;

const LIST_DELIMITER: &str = ", ";

column_enum! {
    pub enum OncoKbField {
        Gene => "Gene",
        Alterations => "Alterations",
        CancerTypes => "Cancer Types",
        Level => "Level",
        Drugs => "Drugs (for therapeutic implications only)",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OncoKbNodeType {
    Drug,
}

impl OncoKbNodeType {
    pub const ALL: &'static [Self] = &[Self::Drug];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OncoKbEdgeType {
    PotentiallyDruggable,
}

impl OncoKbEdgeType {
    pub const ALL: &'static [Self] = &[Self::PotentiallyDruggable];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OncoKbSettings {
    pub node_types: Vec<OncoKbNodeType>,
    pub edge_types: Vec<OncoKbEdgeType>,
    pub fields: Vec<OncoKbField>,
}

impl Default for OncoKbSettings {
    fn default() -> Self {
        Self {
            node_types: OncoKbNodeType::ALL.to_vec(),
            edge_types: OncoKbEdgeType::ALL.to_vec(),
            fields: OncoKbField::ALL.to_vec(),
        }
    }
}

pub struct OncoKbAdapter {
    associations: Table,
    drugs: Option<EntityExtractor>,
    druggable: Option<RelationshipExtractor>,
}

impl OncoKbAdapter {
    #[instrument(skip(settings))]
    pub fn load(path: &Path, settings: &OncoKbSettings) -> Result<Self> {
        let raw = load_table(path, SourceFormat::TSV)?;
        Self::from_table(&raw, settings)
    }

    pub fn from_table(raw: &Table, settings: &OncoKbSettings) -> Result<Self> {
        let fields = chosen(OncoKbField::ALL, &settings.fields);
        let split = |field: OncoKbField| ExplodeGroup::single(ExplodeTarget::new(field.column(), LIST_DELIMITER));

        let exploded = NormalisationPipeline::new(fields.iter().map(OncoKbField::column))
            .explode(split(OncoKbField::Drugs))
            .explode(split(OncoKbField::Alterations))
            .explode(split(OncoKbField::CancerTypes))
            .run(raw)?;

        let drug = OncoKbField::Drugs.column();
        let associations = exploded.filter(|r| r.get(drug).is_some_and(|v| !v.is_null()));
        debug!(dropped = exploded.len() - associations.len(), "Dropped rows without a drug name");

        let drugs = settings
            .node_types
            .contains(&OncoKbNodeType::Drug)
            .then(|| EntityExtractor::new(labels::DRUG, drug).id_alias("id").id_alias("name"));
        let druggable = settings.edge_types.contains(&OncoKbEdgeType::PotentiallyDruggable).then(|| {
            RelationshipExtractor::new(labels::POTENTIALLY_DRUGGABLE, OncoKbField::Gene.column(), drug)
                .id_strategy(EdgeIdStrategy::RowDigest)
                .properties([
                    PropertyColumn::renamed(OncoKbField::Level.column(), "level"),
                    PropertyColumn::renamed(OncoKbField::Alterations.column(), "alteration"),
                    PropertyColumn::renamed(OncoKbField::CancerTypes.column(), "cancer_type"),
                ])
        });

        if let Some(ex) = &drugs {
            ex.validate(&associations)?;
        }
        if let Some(ex) = &druggable {
            ex.validate(&associations)?;
        }

        info!(associations = associations.len(), "OncoKB adapter ready");
        Ok(Self { associations, drugs, druggable })
    }
}

impl GraphAdapter for OncoKbAdapter {
    fn name(&self) -> &'static str { "oncokb" }

    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_> {
        Box::new(self.drugs.iter().flat_map(|ex| ex.extract(&self.associations)))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.druggable.iter().flat_map(|ex| ex.extract(&self.associations)))
    }
}

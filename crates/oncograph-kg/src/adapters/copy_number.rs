//! Copy-number adapter.
//!
//! Source: tab-separated copy-number segments, one row per (sample, gene).
//! The segment measurements of one row form a copy-number variant, keyed by
//! the MD5 of its measurements, sample and gene (`VARIANT_ID`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use oncograph_common::{column_enum, Edge, Node, Result, Table};
use oncograph_ingestion::dedup::distinct;
use oncograph_ingestion::normalise::IdentifierDeriver;
use oncograph_ingestion::{load_table, NormalisationPipeline, SourceFormat};

use super::{chosen, GraphAdapter};
use crate::extraction::{EntityExtractor, RelationshipExtractor};
use crate::labels;

/// Derived key column of the copy-number variant table.
pub const VARIANT_ID_COLUMN: &str = "VARIANT_ID";

column_enum! {
    pub enum CnSampleField {
        Id => "sample",
    }
}

column_enum! {
    pub enum CnGeneField {
        EnsemblId => "ID",
        Name => "Gene",
        Chr => "chr",
        Start => "start",
        End => "end",
        Strand => "strand",
        Band => "band",
        Type => "type",
    }
}

column_enum! {
    /// Segment measurements. Declaration order is the hash order for
    /// `VARIANT_ID`.
    pub enum CnEdgeField {
        NProbesCr => "nProbesCr",
        NProbesAf => "nProbesAf",
        LogR => "logR",
        Baf => "baf",
        NARaw => "nAraw",
        NBRaw => "nBraw",
        NMajor => "nMajor",
        NMinor => "nMinor",
        PurifiedLogR => "purifiedLogR",
        PurifiedBaf => "purifiedBaf",
        PurifiedLoh => "purifiedLoh",
        CnStatus => "CNstatus",
        LohStatus => "LOHstatus",
        MinPurifiedLogR => "minPurifiedLogR",
        MaxPurifiedLogR => "maxPurifiedLogR",
        BreaksInGene => "breaksInGene",
    }
}

impl CnEdgeField {
    /// Measurements that are numbers even when a sample has none.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, CnEdgeField::CnStatus | CnEdgeField::LohStatus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CopyNumberNodeField {
    Sample(CnSampleField),
    Gene(CnGeneField),
}

impl CopyNumberNodeField {
    pub fn all() -> Vec<Self> {
        CnSampleField::ALL.iter().copied().map(Self::Sample)
            .chain(CnGeneField::ALL.iter().copied().map(Self::Gene))
            .collect()
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Sample(f) => f.column(),
            Self::Gene(f) => f.column(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyNumberNodeType {
    Sample,
    Gene,
    CopyNumberVariant,
}

impl CopyNumberNodeType {
    pub const ALL: &'static [Self] = &[Self::Sample, Self::Gene, Self::CopyNumberVariant];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sample => labels::SAMPLE,
            Self::Gene => labels::GENE,
            Self::CopyNumberVariant => labels::COPY_NUMBER_VARIANT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyNumberEdgeType {
    PatientHasCopyNumberVariant,
    CopyNumberVariantInGene,
}

impl CopyNumberEdgeType {
    pub const ALL: &'static [Self] = &[Self::PatientHasCopyNumberVariant, Self::CopyNumberVariantInGene];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PatientHasCopyNumberVariant => labels::PATIENT_HAS_COPY_NUMBER_VARIANT,
            Self::CopyNumberVariantInGene => labels::COPY_NUMBER_VARIANT_IN_GENE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyNumberSettings {
    pub node_types: Vec<CopyNumberNodeType>,
    pub node_fields: Vec<CopyNumberNodeField>,
    pub edge_types: Vec<CopyNumberEdgeType>,
    pub edge_fields: Vec<CnEdgeField>,
}

impl Default for CopyNumberSettings {
    fn default() -> Self {
        Self {
            node_types: CopyNumberNodeType::ALL.to_vec(),
            node_fields: CopyNumberNodeField::all(),
            edge_types: CopyNumberEdgeType::ALL.to_vec(),
            edge_fields: CnEdgeField::ALL.to_vec(),
        }
    }
}

/// Hash order for `VARIANT_ID`: measurements, then sample, then gene.
pub fn cn_variant_deriver() -> IdentifierDeriver {
    let order = CnEdgeField::ALL
        .iter()
        .map(|f| f.column())
        .chain([CnSampleField::Id.column(), CnGeneField::Name.column()]);
    IdentifierDeriver::new(order)
}

// ── Adapter ─────────────────────────────────────────────────────────────────

/// Which of the two tables an extractor reads.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Segments,
    Variants,
}

pub struct CopyNumberAdapter {
    segments: Table,
    variants: Table,
    nodes: Vec<(Frame, EntityExtractor)>,
    edges: Vec<(Frame, RelationshipExtractor)>,
}

impl CopyNumberAdapter {
    #[instrument(skip(settings))]
    pub fn load(path: &Path, settings: &CopyNumberSettings) -> Result<Self> {
        let raw = load_table(path, SourceFormat::TSV)?;
        Self::from_table(&raw, settings)
    }

    pub fn from_table(raw: &Table, settings: &CopyNumberSettings) -> Result<Self> {
        let node_types = chosen(CopyNumberNodeType::ALL, &settings.node_types);
        let edge_types = chosen(CopyNumberEdgeType::ALL, &settings.edge_types);
        let node_fields = chosen(&CopyNumberNodeField::all(), &settings.node_fields);
        let edge_fields = chosen(CnEdgeField::ALL, &settings.edge_fields);

        let fields = node_fields
            .iter()
            .map(CopyNumberNodeField::column)
            .chain(edge_fields.iter().map(CnEdgeField::column));
        let segments = NormalisationPipeline::new(fields).run(raw)?;

        let wants_variants = node_types.contains(&CopyNumberNodeType::CopyNumberVariant) || !edge_types.is_empty();
        let variants = if wants_variants {
            variant_table(&segments)?
        } else {
            Table::default()
        };

        let measurements: Vec<&'static str> = edge_fields
            .iter()
            .map(CnEdgeField::column)
            .filter(|c| segments.has_column(c))
            .collect();
        let numeric: Vec<&'static str> = edge_fields
            .iter()
            .filter(|f| f.is_numeric())
            .map(CnEdgeField::column)
            .collect();

        let nodes: Vec<(Frame, EntityExtractor)> = node_types
            .iter()
            .map(|t| match t {
                CopyNumberNodeType::Sample => {
                    (Frame::Segments, EntityExtractor::new(t.label(), CnSampleField::Id.column()))
                }
                CopyNumberNodeType::Gene => {
                    let properties = CnGeneField::ALL
                        .iter()
                        .filter(|f| **f != CnGeneField::Name)
                        .map(|f| f.column())
                        .filter(|c| segments.has_column(c));
                    let gene = EntityExtractor::new(t.label(), CnGeneField::Name.column())
                        .properties(properties)
                        .id_alias("name");
                    (Frame::Segments, gene)
                }
                CopyNumberNodeType::CopyNumberVariant => {
                    let cnv = EntityExtractor::new(t.label(), VARIANT_ID_COLUMN)
                        .properties(measurements.iter().copied())
                        .numeric(numeric.iter().copied());
                    (Frame::Variants, cnv)
                }
            })
            .collect();

        let edges: Vec<(Frame, RelationshipExtractor)> = edge_types
            .iter()
            .map(|t| {
                let (source, target) = match t {
                    CopyNumberEdgeType::PatientHasCopyNumberVariant => (CnSampleField::Id.column(), VARIANT_ID_COLUMN),
                    CopyNumberEdgeType::CopyNumberVariantInGene => (VARIANT_ID_COLUMN, CnGeneField::Name.column()),
                };
                (Frame::Variants, RelationshipExtractor::new(t.label(), source, target))
            })
            .collect();

        let adapter = Self { segments, variants, nodes, edges };
        for (frame, ex) in &adapter.nodes {
            ex.validate(adapter.frame(*frame))?;
        }
        for (frame, ex) in &adapter.edges {
            ex.validate(adapter.frame(*frame))?;
        }

        info!(
            segments = adapter.segments.len(),
            variants = adapter.variants.len(),
            "Copy-number adapter ready"
        );
        Ok(adapter)
    }

    fn frame(&self, frame: Frame) -> &Table {
        match frame {
            Frame::Segments => &self.segments,
            Frame::Variants => &self.variants,
        }
    }

    /// One row per distinct copy-number variant, with `VARIANT_ID`.
    pub fn variants(&self) -> &Table { &self.variants }
}

/// Measurements + sample + gene, deduplicated, keyed by their digest.
fn variant_table(segments: &Table) -> Result<Table> {
    let mut columns: Vec<&str> = CnEdgeField::ALL
        .iter()
        .map(|f| f.column())
        .filter(|c| segments.has_column(c))
        .collect();
    columns.push(CnSampleField::Id.column());
    columns.push(CnGeneField::Name.column());

    let variants = distinct(segments, &columns)?;
    cn_variant_deriver().derive_column(&variants, VARIANT_ID_COLUMN)
}

impl GraphAdapter for CopyNumberAdapter {
    fn name(&self) -> &'static str { "copy_number" }

    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_> {
        Box::new(self.nodes.iter().flat_map(|(frame, ex)| ex.extract(self.frame(*frame))))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.edges.iter().flat_map(|(frame, ex)| ex.extract(self.frame(*frame))))
    }
}

//! Variant calls adapter.
//!
//! Source: tab-separated variant calls, one row per variant with the
//! carrying samples, their read counts and the affected genes packed into
//! `;`-joined cells. Normalisation:
//!   1. Project to the configured node and edge fields
//!   2. Explode `samples` (renamed `sample`) together with `readCounts`
//!   3. Explode `Gene.MANE` into the helper column `Gene`
//!   4. Drop duplicate rows
//!   5. Replace `"."` variant ids with the MD5 of the variant columns
//!
//! Emits patient, sample and variant nodes; patient→sample, sample→variant,
//! patient→variant and variant→gene edges (MD5 endpoint ids).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use oncograph_common::{column_enum, Edge, Node, Result, Table};
use oncograph_ingestion::normalise::{ExplodeGroup, ExplodeTarget, IdentifierDeriver};
use oncograph_ingestion::{load_table, NormalisationPipeline, SourceFormat};

use super::{chosen, GraphAdapter};
use crate::extraction::{EdgeIdStrategy, EntityExtractor, RelationshipExtractor};
use crate::labels;

/// Helper column holding one gene symbol per row, split from `Gene.MANE`.
pub const GENE_COLUMN: &str = "Gene";

const DELIMITER: &str = ";";

// ── Fields ──────────────────────────────────────────────────────────────────

column_enum! {
    pub enum PatientField {
        Id => "patient",
        Samples => "samples",
    }
}

column_enum! {
    /// Columns produced by exploding `samples`.
    pub enum SampleField {
        Id => "sample",
        ReadCounts => "readCounts",
    }
}

column_enum! {
    /// Variant annotation columns. Declaration order is the hash order for
    /// derived variant ids; do not reorder.
    pub enum VariantField {
        Id => "ID",
        Chromosome => "CHROM",
        Position => "POS",
        Ref => "REF",
        Alt => "ALT",
        Filter => "FILTER",
        Cytoband => "cytoBand",
        Function => "Func.MANE",
        Gene => "Gene.MANE",
        GeneDetail => "GeneDetail.MANE",
        ExonicFunction => "ExonicFunc.MANE",
        AaChange => "AAChange.MANE",
        FunctionRef => "Func.refGene",
        GeneRef => "Gene.refGene",
        GeneDetailRef => "GeneDetail.refGene",
        ExonicFunctionRef => "ExonicFunc.refGene",
        AaChangeRef => "AAChange.refGene",
        GenomicSuperDups => "genomicSuperDups",
        DbscSnvAdaScore => "dbscSNV_ADA_SCORE",
        DbscSnvRfScore => "dbscSNV_RF_SCORE",
        CosmicId => "COSMIC_ID",
        CosmicOccurrence => "COSMIC_OCCURRENCE",
        CosmicTotalOccurrence => "COSMIC_TOTAL_OCC",
        CosmicConfSomatic => "COSMIC_CONF_SOMA",
        ClnSig => "CLNSIG",
        ClnSigConf => "CLNSIGCONF",
        ClnDn => "CLNDN",
        ClnRevStat => "CLNREVSTAT",
        ClnAlleleId => "CLNALLELEID",
        ClnDisDb => "CLNDISDB",
        InterproDomain => "Interpro_domain",
        RegulomeDb => "regulomeDB",
        CaddRaw => "CADD_raw",
        CaddPhred => "CADD_phred",
        ThousandGenomesAll => "1000G_ALL",
        ThousandGenomesEur => "1000G_EUR",
        GnomadGenomeAll => "gnomAD_genome_ALL",
        GnomadGenomeNfe => "gnomAD_genome_NFE",
        GnomadGenomeFin => "gnomAD_genome_FIN",
        GnomadGenomeMax => "gnomAD_genome_max",
        GnomadExomeNcAll => "gnomAD_exome_nc_ALL",
        GnomadExomeNcNfe => "gnomAD_exome_nc_NFE",
        GnomadExomeNcNfeSwe => "gnomAD_exome_nc_NFE_SWE",
        GnomadExomeNcFin => "gnomAD_exome_nc_FIN",
        GnomadExomeNcMax => "gnomAD_exome_nc_max",
        Truncal => "Truncal",
    }
}

column_enum! {
    pub enum VariantsEdgeField {
        ReadCounts => "readCounts",
    }
}

/// Any column the adapter can project for its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantsNodeField {
    Patient(PatientField),
    Sample(SampleField),
    Variant(VariantField),
}

impl VariantsNodeField {
    pub fn all() -> Vec<Self> {
        PatientField::ALL.iter().copied().map(Self::Patient)
            .chain(SampleField::ALL.iter().copied().map(Self::Sample))
            .chain(VariantField::ALL.iter().copied().map(Self::Variant))
            .collect()
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Patient(f) => f.column(),
            Self::Sample(f) => f.column(),
            Self::Variant(f) => f.column(),
        }
    }
}

// ── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantsNodeType {
    Patient,
    Sample,
    Variant,
}

impl VariantsNodeType {
    pub const ALL: &'static [Self] = &[Self::Patient, Self::Sample, Self::Variant];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => labels::PATIENT,
            Self::Sample => labels::SAMPLE,
            Self::Variant => labels::VARIANT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantsEdgeType {
    PatientHasSample,
    SampleHasVariant,
    PatientHasVariant,
    VariantInGene,
}

impl VariantsEdgeType {
    pub const ALL: &'static [Self] = &[
        Self::PatientHasSample,
        Self::SampleHasVariant,
        Self::PatientHasVariant,
        Self::VariantInGene,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PatientHasSample => labels::PATIENT_HAS_SAMPLE,
            Self::SampleHasVariant => labels::SAMPLE_HAS_VARIANT,
            Self::PatientHasVariant => labels::PATIENT_HAS_VARIANT,
            Self::VariantInGene => labels::VARIANT_IN_GENE,
        }
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

/// What to materialise. Every list defaults to everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantsSettings {
    pub node_types: Vec<VariantsNodeType>,
    pub node_fields: Vec<VariantsNodeField>,
    pub edge_types: Vec<VariantsEdgeType>,
    pub edge_fields: Vec<VariantsEdgeField>,
}

impl Default for VariantsSettings {
    fn default() -> Self {
        Self {
            node_types: VariantsNodeType::ALL.to_vec(),
            node_fields: VariantsNodeField::all(),
            edge_types: VariantsEdgeType::ALL.to_vec(),
            edge_fields: VariantsEdgeField::ALL.to_vec(),
        }
    }
}

/// Deriver for `"."` variant ids: every variant column in declaration
/// order, minus the id itself and the columns that only multiply rows.
pub fn variant_id_deriver() -> IdentifierDeriver {
    IdentifierDeriver::new(VariantField::ALL.iter().map(|f| f.column())).excluding([
        VariantField::Id.column(),
        PatientField::Id.column(),
        SampleField::Id.column(),
        SampleField::ReadCounts.column(),
        GENE_COLUMN,
    ])
}

// ── Adapter ─────────────────────────────────────────────────────────────────

pub struct VariantsAdapter {
    variants: Table,
    nodes: Vec<EntityExtractor>,
    edges: Vec<RelationshipExtractor>,
}

impl VariantsAdapter {
    #[instrument(skip(settings))]
    pub fn load(path: &Path, settings: &VariantsSettings) -> Result<Self> {
        let raw = load_table(path, SourceFormat::TSV)?;
        Self::from_table(&raw, settings)
    }

    pub fn from_table(raw: &Table, settings: &VariantsSettings) -> Result<Self> {
        let node_fields = chosen(&VariantsNodeField::all(), &settings.node_fields);
        let edge_fields = chosen(VariantsEdgeField::ALL, &settings.edge_fields);
        let fields = node_fields
            .iter()
            .map(VariantsNodeField::column)
            .chain(edge_fields.iter().map(VariantsEdgeField::column));

        let variants = NormalisationPipeline::new(fields)
            .explode(ExplodeGroup::covarying([
                ExplodeTarget::new(PatientField::Samples.column(), DELIMITER)
                    .renamed(SampleField::Id.column()),
                ExplodeTarget::new(SampleField::ReadCounts.column(), DELIMITER),
            ]))
            .explode(ExplodeGroup::single(
                ExplodeTarget::new(VariantField::Gene.column(), DELIMITER).into_helper(GENE_COLUMN),
            ))
            .identifier(VariantField::Id.column(), variant_id_deriver())
            .run(raw)?;

        let nodes: Vec<EntityExtractor> = chosen(VariantsNodeType::ALL, &settings.node_types)
            .into_iter()
            .map(|t| node_extractor(t, &variants))
            .collect();
        let edges: Vec<RelationshipExtractor> = chosen(VariantsEdgeType::ALL, &settings.edge_types)
            .into_iter()
            .map(edge_extractor)
            .collect();

        for ex in &nodes {
            ex.validate(&variants)?;
        }
        for ex in &edges {
            ex.validate(&variants)?;
        }

        info!(
            rows = variants.len(),
            node_types = nodes.len(),
            edge_types = edges.len(),
            "Variants adapter ready"
        );
        Ok(Self { variants, nodes, edges })
    }

    /// The normalised variant table.
    pub fn table(&self) -> &Table { &self.variants }
}

fn node_extractor(node_type: VariantsNodeType, variants: &Table) -> EntityExtractor {
    let id_column = match node_type {
        VariantsNodeType::Patient => PatientField::Id.column(),
        VariantsNodeType::Sample => SampleField::Id.column(),
        VariantsNodeType::Variant => VariantField::Id.column(),
    };
    let extractor = EntityExtractor::new(node_type.label(), id_column);
    if node_type != VariantsNodeType::Variant {
        return extractor;
    }
    // Everything that describes the variant itself; sample, patient and
    // gene-helper columns would split one variant into many nodes.
    let properties = VariantField::ALL
        .iter()
        .filter(|f| **f != VariantField::Id)
        .map(|f| f.column())
        .filter(|c| variants.has_column(c));
    extractor.properties(properties)
}

fn edge_extractor(edge_type: VariantsEdgeType) -> RelationshipExtractor {
    let read_counts = SampleField::ReadCounts.column();
    let (source, target) = match edge_type {
        VariantsEdgeType::PatientHasSample => (PatientField::Id.column(), SampleField::Id.column()),
        VariantsEdgeType::SampleHasVariant => (SampleField::Id.column(), VariantField::Id.column()),
        VariantsEdgeType::PatientHasVariant => (PatientField::Id.column(), VariantField::Id.column()),
        VariantsEdgeType::VariantInGene => (VariantField::Id.column(), GENE_COLUMN),
    };
    let extractor = RelationshipExtractor::new(edge_type.label(), source, target)
        .id_strategy(EdgeIdStrategy::EndpointDigest);
    match edge_type {
        VariantsEdgeType::SampleHasVariant | VariantsEdgeType::PatientHasVariant => {
            extractor.properties([read_counts]).numeric([read_counts])
        }
        VariantsEdgeType::VariantInGene => extractor.exclude_target(labels::NO_GENE),
        VariantsEdgeType::PatientHasSample => extractor,
    }
}

impl GraphAdapter for VariantsAdapter {
    fn name(&self) -> &'static str { "variants" }

    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_> {
        Box::new(self.nodes.iter().flat_map(|ex| ex.extract(&self.variants)))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.edges.iter().flat_map(|ex| ex.extract(&self.variants)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograph_ingestion::read_table;
    use pretty_assertions::assert_eq;

    const TSV: &str = "\
ID\tCHROM\tPOS\tREF\tALT\tpatient\tsamples\treadCounts\tGene.MANE
.\t1\t100\tA\tT\tP1\tsA;sB\t10;20\tBRCA1;NONE
rs9\t2\t200\tG\tC\tP2\tsC\t7\tTP53
";

    fn adapter(settings: &VariantsSettings) -> VariantsAdapter {
        let raw = read_table(TSV.as_bytes(), SourceFormat::TSV).unwrap();
        VariantsAdapter::from_table(&raw, settings).unwrap()
    }

    #[test]
    fn test_variant_field_order_is_hash_order() {
        let a = adapter(&VariantsSettings::default());
        let deriver = variant_id_deriver();
        assert_eq!(
            deriver.hashed_columns(a.table()),
            vec!["CHROM", "POS", "REF", "ALT", "Gene.MANE"]
        );
    }

    #[test]
    fn test_normalised_rows_multiply_per_sample_and_gene() {
        let a = adapter(&VariantsSettings::default());
        // 2 samples × 2 genes + 1 × 1
        assert_eq!(a.table().len(), 5);
        assert!(a.table().has_column(GENE_COLUMN));
        assert!(a.table().has_column("sample"));
    }

    #[test]
    fn test_node_counts_per_label() {
        let a = adapter(&VariantsSettings::default());
        let nodes: Vec<Node> = a.nodes().collect();
        let count = |label: &str| nodes.iter().filter(|n| n.label == label).count();
        assert_eq!(count("patient"), 2);
        assert_eq!(count("sample"), 3);
        assert_eq!(count("variant"), 2);
    }

    #[test]
    fn test_selected_edge_types_only() {
        let settings = VariantsSettings {
            edge_types: vec![VariantsEdgeType::PatientHasSample],
            ..VariantsSettings::default()
        };
        let a = adapter(&settings);
        assert!(a.edges().all(|e| e.label == "patient_has_sample"));
        assert_eq!(a.edges().count(), 3);
    }

    #[test]
    fn test_missing_key_column_is_fatal() {
        let raw = read_table("ID\tCHROM\n.\t1\n".as_bytes(), SourceFormat::TSV).unwrap();
        let err = VariantsAdapter::from_table(&raw, &VariantsSettings::default());
        assert!(err.is_err());

        let variants_only = VariantsSettings {
            node_types: vec![VariantsNodeType::Variant],
            edge_types: vec![],
            ..VariantsSettings::default()
        };
        let a = VariantsAdapter::from_table(&raw, &variants_only).unwrap();
        assert_eq!(a.nodes().count(), 1);
        assert_eq!(a.edges().count(), 0);
    }

    #[test]
    fn test_node_fields_deserialize_from_column_names() {
        let fields: Vec<VariantsNodeField> =
            serde_json::from_str(r#"["patient", "readCounts", "CHROM"]"#).unwrap();
        assert_eq!(
            fields,
            vec![
                VariantsNodeField::Patient(PatientField::Id),
                VariantsNodeField::Sample(SampleField::ReadCounts),
                VariantsNodeField::Variant(VariantField::Chromosome),
            ]
        );
    }
}

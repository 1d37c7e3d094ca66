//! Node and edge labels, as the graph store's schema names them.

// Nodes
pub const PATIENT: &str = "patient";
pub const SAMPLE: &str = "sample";
pub const VARIANT: &str = "variant";
pub const GENE: &str = "gene";
pub const COPY_NUMBER_VARIANT: &str = "copy_number_variant";
pub const DRUG: &str = "drug";
pub const BIOLOGICAL_PROCESS: &str = "biological_process";

// Edges
pub const PATIENT_HAS_SAMPLE: &str = "patient_has_sample";
pub const SAMPLE_HAS_VARIANT: &str = "sample_has_variant";
pub const PATIENT_HAS_VARIANT: &str = "patient_has_variant";
pub const VARIANT_IN_GENE: &str = "variant_in_gene";
/// Runs from a sample id, but keeps the name downstream schemas know it by.
pub const PATIENT_HAS_COPY_NUMBER_VARIANT: &str = "patient_has_copy_number_variant";
pub const COPY_NUMBER_VARIANT_IN_GENE: &str = "copy_number_variant_in_gene";
pub const POTENTIALLY_DRUGGABLE: &str = "potentially_druggable";
pub const GENE_TO_PROCESS: &str = "gene_to_process";

/// Gene symbol placeholder for intergenic calls. Never a gene node.
pub const NO_GENE: &str = "NONE";

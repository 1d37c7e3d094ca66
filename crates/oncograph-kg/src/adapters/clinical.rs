//! Clinical annotations adapter.
//!
//! Source: the semicolon-separated clinical export, one row per patient.
//! Emits patient nodes only; the clinical columns become properties and
//! merge onto the patient nodes the variants adapter emits.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use oncograph_common::{column_enum, Edge, Node, Result, Table};
use oncograph_ingestion::{load_table, NormalisationPipeline, SourceFormat};

use super::{chosen, GraphAdapter};
use crate::extraction::EntityExtractor;
use crate::labels;

column_enum! {
    pub enum ClinicalField {
        Patient => "patient",
        Attention => "Attention",
        AgeAtDiagnosis => "Age at Diagnosis",
        BmiAtDiagnosis => "BMI at Dg",
        Histology => "Histology",
        HistologyReEvaluated => "Histology re_evaluated in DECICER",
        HistologyReEvaluatedNotes => "Histology re_evaluated notes",
        StageFigo2014 => "Stage_FIGO2014",
        TreatmentStrategy => "Treatment strategy",
        ResidualTumorPds => "Residual tumor PDS",
        ResidualTumorIds => "Residual tumor IDS",
        Oper2IdsCancelled => "Oper2_IDS cancelled",
        Oper2LaparoscopicEvaluation => "Oper2_laparoscopic evaluation",
        Oper2ExplorativeLaparotomy => "Oper2_explorative laparotomy",
        Oper2DebulkingSurgery => "Oper2_debulking surgery",
        Oper1OmentalLargestNodule => "Oper1_Omental disease largest nodule_NEW",
        Oper2OmentalLargestNodule => "Oper2_Omental disease largest nodule_NEW",
        PrimaryChemotherapyCycles => "Primary chemotherapy cycles",
        NactCycles => "NACT cycles",
        PostIdsChemotherapyCycles => "Post IDS chemotherapy cycles",
        MaintenanceTherapy => "Maintenance therary after 1st line",
        ParpiTreatment => "PARPi treatment",
        ClinicalTrialParticipation => "Patient card::Participation in clinical trials",
        DrugTrialName => "Patient card::DrugTrial_name",
        DrugTrialUnblinded => "Patient card::Drugtrial unblinded",
        CrsOmental => "CRS Omental",
        CrsOmentalRange => "CRS Omental range",
        Crs3ResidualTumor => "CRS3 residual tumor",
        RecistResponseToNact => "RECIST 1.1 Response to NACT",
        NactRadiologicEvaluation => "Response to NACT radiologic evaluation made",
        PrimaryTherapyOutcome => "Primary therapy outcome",
        CurrentPhaseOfTreatment => "Current phase of treatment",
        Progression => "Progression Yes_No_ND",
        Survival => "Survival",
        CauseOfDeath => "Cause of death",
        OsKaplanMeier => "OS_KaplanM_allHGSC",
        PfsKaplanMeier => "PFS_KaplanM_allHGSC",
        PfiKaplanMeier => "PFI_KaplanM_allHGSC",
        TimeToFirstProgression => "Time from End of 1st line maintenance to 1st prog_Days TFI",
        PostProgressionSurvival => "Time from 1st prog to Death_Days Post progression survival",
        BrcaMutationAny => "BRCA mutation any",
        BrcaMutationClinicalTest => "BRCA mutation status in Clinical test",
        BrcaAnyInDecider => "BRCA any in Decider",
        HrSignatureSbs3Pretreatment => "HR signature SBS3 pretreatment WGS",
        HrSignatureSbs3PerPatient => "HR signature SBS3 per patient",
        HrdClinicalTestResult => "HRD Clinical test result",
        ChronicIllnessesAtDiagnosis => "Chronic illnesses at Dg",
        ChronicIllnessesType => "Chronic illnesses type",
        PreviousCancer => "Previous cancer yes no",
        PreviousCancerDiagnosis => "Previous cancer dg",
        PreviousCancerYear => "Previous cancer_year",
        ExcludedFromPfi => "Excluded from PFI_calculations",
        ExcludedFromPfiReason => "Excluded from PFI calculations_ reason",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalNodeType {
    Patient,
}

impl ClinicalNodeType {
    pub const ALL: &'static [Self] = &[Self::Patient];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalSettings {
    pub node_types: Vec<ClinicalNodeType>,
    pub node_fields: Vec<ClinicalField>,
}

impl Default for ClinicalSettings {
    fn default() -> Self {
        Self {
            node_types: ClinicalNodeType::ALL.to_vec(),
            node_fields: ClinicalField::ALL.to_vec(),
        }
    }
}

pub struct ClinicalAdapter {
    clinical: Table,
    patients: Option<EntityExtractor>,
}

impl ClinicalAdapter {
    #[instrument(skip(settings))]
    pub fn load(path: &Path, settings: &ClinicalSettings) -> Result<Self> {
        let raw = load_table(path, SourceFormat::SEMICOLON)?;
        Self::from_table(&raw, settings)
    }

    pub fn from_table(raw: &Table, settings: &ClinicalSettings) -> Result<Self> {
        let fields = chosen(ClinicalField::ALL, &settings.node_fields);
        let clinical = NormalisationPipeline::new(fields.iter().map(ClinicalField::column)).run(raw)?;

        let patients = settings.node_types.contains(&ClinicalNodeType::Patient).then(|| {
            let properties = fields
                .iter()
                .filter(|f| **f != ClinicalField::Patient)
                .map(ClinicalField::column)
                .filter(|c| clinical.has_column(c));
            EntityExtractor::new(labels::PATIENT, ClinicalField::Patient.column()).properties(properties)
        });
        if let Some(ex) = &patients {
            ex.validate(&clinical)?;
        }

        info!(patients = clinical.len(), columns = clinical.columns().len(), "Clinical adapter ready");
        Ok(Self { clinical, patients })
    }
}

impl GraphAdapter for ClinicalAdapter {
    fn name(&self) -> &'static str { "clinical" }

    fn nodes(&self) -> Box<dyn Iterator<Item = Node> + '_> {
        Box::new(self.patients.iter().flat_map(|ex| ex.extract(&self.clinical)))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograph_common::Value;
    use oncograph_ingestion::read_table;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
patient;Age at Diagnosis;Histology;Survival;Unlisted column
P1;61;HGSC, high grade;;x
P2;;HGSC;Alive;y
";

    fn adapter(settings: &ClinicalSettings) -> ClinicalAdapter {
        let raw = read_table(CSV.as_bytes(), SourceFormat::SEMICOLON).unwrap();
        ClinicalAdapter::from_table(&raw, settings).unwrap()
    }

    #[test]
    fn test_patient_nodes_carry_clinical_columns() {
        let nodes: Vec<Node> = adapter(&ClinicalSettings::default()).nodes().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "P1");
        assert_eq!(nodes[0].properties.get("Age at Diagnosis"), Some(&Value::Int(61)));
        assert_eq!(nodes[0].properties.get("Histology"), Some(&Value::from("HGSC, high grade")));
        // Text column, so a missing value is left out.
        assert!(!nodes[0].properties.contains_key("Survival"));
        assert!(!nodes[0].properties.contains_key("Unlisted column"));
        // Numeric column, so a missing value is a marker.
        assert_eq!(nodes[1].properties.get("Age at Diagnosis"), Some(&Value::from("NaN")));
    }

    #[test]
    fn test_no_edges() {
        assert_eq!(adapter(&ClinicalSettings::default()).edges().count(), 0);
    }

    #[test]
    fn test_field_selection() {
        let settings = ClinicalSettings {
            node_fields: vec![ClinicalField::Histology, ClinicalField::Patient],
            ..ClinicalSettings::default()
        };
        let nodes: Vec<Node> = adapter(&settings).nodes().collect();
        assert_eq!(nodes[1].properties.keys().collect::<Vec<_>>(), vec!["Histology"]);
    }

    #[test]
    fn test_missing_patient_column_is_fatal() {
        let raw = read_table("Histology\nHGSC\n".as_bytes(), SourceFormat::SEMICOLON).unwrap();
        assert!(ClinicalAdapter::from_table(&raw, &ClinicalSettings::default()).is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Level of detail requested from list endpoints
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Projection {
    Id,
    #[default]
    Summary,
    Detailed,
    Meta,
}

impl Projection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Summary => "SUMMARY",
            Self::Detailed => "DETAILED",
            Self::Meta => "META",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscreteCopyNumberEventType {
    #[default]
    HomdelAndAmp,
    Homdel,
    Amp,
    Gain,
    Hetloss,
    Diploid,
    All,
}

impl DiscreteCopyNumberEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HomdelAndAmp => "HOMDEL_AND_AMP",
            Self::Homdel => "HOMDEL",
            Self::Amp => "AMP",
            Self::Gain => "GAIN",
            Self::Hetloss => "HETLOSS",
            Self::Diploid => "DIPLOID",
            Self::All => "ALL",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClinicalDataType {
    #[default]
    Sample,
    Patient,
}

impl ClinicalDataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sample => "SAMPLE",
            Self::Patient => "PATIENT",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentLevel {
    #[default]
    Patient,
    Sample,
}

impl TreatmentLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Sample => "SAMPLE",
        }
    }

    /// Endpoint segment under `/treatments`
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Sample => "sample",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentTier {
    #[default]
    Agent,
    AgentClass,
    AgentTarget,
}

impl TreatmentTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::AgentClass => "AgentClass",
            Self::AgentTarget => "AgentTarget",
        }
    }
}

/// Body for the per-profile `mutations`, `discrete-copy-number`
/// and `molecular-data` fetch endpoints
///
/// Exactly one of `sample_ids` or `sample_list_id` should be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularDataFilter {
    pub entrez_gene_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_list_id: Option<String>,
}

impl MolecularDataFilter {
    /// Filter on explicit samples, or on the study's `<study>_all` list
    pub fn for_study(
        study_id: &str,
        entrez_gene_ids: Vec<i64>,
        sample_ids: Option<Vec<String>>,
    ) -> Self {
        match sample_ids {
            Some(ids) if !ids.is_empty() => Self {
                entrez_gene_ids,
                sample_ids: Some(ids),
                sample_list_id: None,
            },
            _ => Self {
                entrez_gene_ids,
                sample_ids: None,
                sample_list_id: Some(format!("{study_id}_all")),
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentifier {
    pub patient_id: String,
    pub study_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalRequest {
    pub patient_identifiers: Vec<PatientIdentifier>,
    /// e.g. `OS` for overall survival, `DFS` for disease-free
    pub attribute_id_prefix: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyViewFilter {
    pub study_ids: Vec<String>,
}

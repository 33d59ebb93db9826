use serde::{Deserialize, Serialize};

/// A cancer study (one cohort of patients and samples)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancerStudy {
    pub study_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cancer_type_id: Option<String>,
    #[serde(default)]
    pub all_sample_count: Option<i64>,
    #[serde(default)]
    pub sequenced_sample_count: Option<i64>,
    #[serde(default)]
    pub cna_sample_count: Option<i64>,
    #[serde(default)]
    pub mrna_rna_seq_sample_count: Option<i64>,
    #[serde(default)]
    pub public_study: Option<bool>,
    #[serde(default)]
    pub citation: Option<String>,
    #[serde(default)]
    pub pmid: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub sample_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(default)]
    pub sample_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(alias = "stableId")]
    pub patient_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
}

/// A predefined cohort of samples within a study
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleList {
    #[serde(alias = "stableId")]
    pub sample_list_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sample_count: Option<i64>,
    #[serde(default)]
    pub study_id: Option<String>,
}

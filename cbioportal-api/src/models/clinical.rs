use serde::{Deserialize, Serialize};

/// One attribute value for a sample or patient
///
/// Survival endpoints return the same shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalData {
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub study_id: Option<String>,
    #[serde(alias = "attrId")]
    pub clinical_attribute_id: String,
    #[serde(default, alias = "attrValue")]
    pub value: Option<String>,
}

impl ClinicalData {
    /// Sample id when present, otherwise the patient id
    pub fn owner_id(&self) -> &str {
        self.sample_id
            .as_deref()
            .or(self.patient_id.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalAttribute {
    #[serde(alias = "attrId")]
    pub clinical_attribute_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub patient_attribute: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Aggregated treatment count at patient or sample level
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRow {
    pub treatment: String,
    #[serde(default)]
    pub count: Option<i64>,
    /// `Pre`/`Post` for sample-level rows
    #[serde(default)]
    pub time: Option<String>,
}

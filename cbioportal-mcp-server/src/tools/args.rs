use cbioportal_api::models::{
    ClinicalDataType, DiscreteCopyNumberEventType, TreatmentLevel, TreatmentTier,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::Tool;
use crate::error::{ServerError, ServerResult};

const DEFAULT_STUDY_PAGE_SIZE: u32 = 20;
const DEFAULT_MEMBER_PAGE_SIZE: u32 = 100;
const DEFAULT_GENE_PAGE_SIZE: u32 = 20;
const DEFAULT_SURVIVAL_PREFIX: &str = "OS";

fn default_study_page_size() -> u32 {
    DEFAULT_STUDY_PAGE_SIZE
}

fn default_member_page_size() -> u32 {
    DEFAULT_MEMBER_PAGE_SIZE
}

fn default_gene_page_size() -> u32 {
    DEFAULT_GENE_PAGE_SIZE
}

fn default_survival_prefix() -> String {
    DEFAULT_SURVIVAL_PREFIX.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudiesArgs {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_study_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyArgs {
    pub study_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedStudyArgs {
    pub study_id: String,
    #[serde(default = "default_member_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationsArgs {
    pub study_id: String,
    pub gene_symbols: Vec<String>,
    #[serde(default)]
    pub sample_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyNumberArgs {
    pub study_id: String,
    pub gene_symbols: Vec<String>,
    #[serde(default)]
    pub alteration_type: DiscreteCopyNumberEventType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularDataArgs {
    pub study_id: String,
    pub gene_symbols: Vec<String>,
    #[serde(default)]
    pub molecular_profile_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalDataArgs {
    pub study_id: String,
    #[serde(default)]
    pub clinical_data_type: ClinicalDataType,
    #[serde(default)]
    pub attribute_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGenesArgs {
    pub keyword: String,
    #[serde(default = "default_gene_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanelsArgs {
    #[serde(default)]
    pub study_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalArgs {
    pub study_id: String,
    #[serde(default = "default_survival_prefix")]
    pub attribute_id_prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentArgs {
    pub study_id: String,
    #[serde(default)]
    pub level: TreatmentLevel,
    #[serde(default)]
    pub tier: TreatmentTier,
}

/// Typed arguments for one tool call, defaults applied
#[derive(Debug)]
pub enum ToolArgs {
    Studies(StudiesArgs),
    StudyDetails(StudyArgs),
    Samples(PagedStudyArgs),
    Patients(PagedStudyArgs),
    SampleLists(StudyArgs),
    MolecularProfiles(StudyArgs),
    Mutations(MutationsArgs),
    CopyNumberAlterations(CopyNumberArgs),
    MolecularData(MolecularDataArgs),
    ClinicalData(ClinicalDataArgs),
    ClinicalAttributes(StudyArgs),
    SearchGenes(SearchGenesArgs),
    GenePanels(GenePanelsArgs),
    CancerTypes,
    SignificantlyMutatedGenes(StudyArgs),
    SurvivalData(SurvivalArgs),
    TreatmentData(TreatmentArgs),
}

impl ToolArgs {
    /// Decode the raw `arguments` object for `tool`.
    ///
    /// Absent or `null` arguments are treated as an empty object so that
    /// tools without required fields can be called bare.
    pub fn parse(tool: Tool, arguments: Option<Value>) -> ServerResult<Self> {
        let value = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };

        let args = match tool {
            Tool::GetStudies => Self::Studies(decode(tool, value)?),
            Tool::GetStudyDetails => Self::StudyDetails(decode(tool, value)?),
            Tool::GetSamples => Self::Samples(decode(tool, value)?),
            Tool::GetPatients => Self::Patients(decode(tool, value)?),
            Tool::GetSampleLists => Self::SampleLists(decode(tool, value)?),
            Tool::GetMolecularProfiles => Self::MolecularProfiles(decode(tool, value)?),
            Tool::GetMutations => Self::Mutations(decode(tool, value)?),
            Tool::GetCopyNumberAlterations => Self::CopyNumberAlterations(decode(tool, value)?),
            Tool::GetMolecularData => Self::MolecularData(decode(tool, value)?),
            Tool::GetClinicalData => Self::ClinicalData(decode(tool, value)?),
            Tool::GetClinicalAttributes => Self::ClinicalAttributes(decode(tool, value)?),
            Tool::SearchGenes => Self::SearchGenes(decode(tool, value)?),
            Tool::GetGenePanels => Self::GenePanels(decode(tool, value)?),
            Tool::GetCancerTypes => Self::CancerTypes,
            Tool::GetSignificantlyMutatedGenes => {
                Self::SignificantlyMutatedGenes(decode(tool, value)?)
            }
            Tool::GetSurvivalData => Self::SurvivalData(decode(tool, value)?),
            Tool::GetTreatmentData => Self::TreatmentData(decode(tool, value)?),
        };
        Ok(args)
    }

    /// Sentence answered instead of an error by substituting tools
    pub fn unavailable_message(&self) -> Option<String> {
        match self {
            Self::SignificantlyMutatedGenes(args) => Some(format!(
                "No MutSig results available for study {}. This analysis may not have been performed for this dataset.",
                args.study_id
            )),
            Self::SurvivalData(args) => Some(format!(
                "No survival data available for study {} with prefix {}.",
                args.study_id, args.attribute_id_prefix
            )),
            Self::TreatmentData(args) => Some(format!(
                "No treatment data available for study {} at {} level.",
                args.study_id,
                args.level.as_str()
            )),
            _ => None,
        }
    }
}

fn decode<T>(tool: Tool, value: Value) -> ServerResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|err| ServerError::InvalidParams(format!("{}: {err}", tool.name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FailurePolicy;
    use serde_json::json;

    #[test]
    fn defaults_are_applied() {
        match ToolArgs::parse(Tool::GetStudies, None).unwrap() {
            ToolArgs::Studies(args) => {
                assert_eq!(args.page_size, 20);
                assert!(args.keyword.is_none());
            }
            other => panic!("unexpected args: {other:?}"),
        }

        let cna = json!({"studyId": "s", "geneSymbols": ["ERBB2"]});
        match ToolArgs::parse(Tool::GetCopyNumberAlterations, Some(cna)).unwrap() {
            ToolArgs::CopyNumberAlterations(args) => {
                assert_eq!(args.alteration_type, DiscreteCopyNumberEventType::HomdelAndAmp);
            }
            other => panic!("unexpected args: {other:?}"),
        }

        match ToolArgs::parse(Tool::GetTreatmentData, Some(json!({"studyId": "s"}))).unwrap() {
            ToolArgs::TreatmentData(args) => {
                assert_eq!(args.level, TreatmentLevel::Patient);
                assert_eq!(args.tier, TreatmentTier::Agent);
            }
            other => panic!("unexpected args: {other:?}"),
        }

        match ToolArgs::parse(Tool::GetSamples, Some(json!({"studyId": "s"}))).unwrap() {
            ToolArgs::Samples(args) => assert_eq!(args.page_size, 100),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn null_arguments_behave_like_empty_object() {
        assert!(matches!(
            ToolArgs::parse(Tool::GetCancerTypes, Some(Value::Null)).unwrap(),
            ToolArgs::CancerTypes
        ));
        assert!(matches!(
            ToolArgs::parse(Tool::GetGenePanels, Some(Value::Null)).unwrap(),
            ToolArgs::GenePanels(GenePanelsArgs { study_id: None })
        ));
    }

    #[test]
    fn enum_arguments_are_enforced() {
        let err = ToolArgs::parse(
            Tool::GetClinicalData,
            Some(json!({"studyId": "s", "clinicalDataType": "ORGANISM"})),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidParams(_)));
    }

    #[test]
    fn every_substituting_tool_has_a_fallback_sentence() {
        let study_only = json!({"studyId": "brca_tcga"});
        for tool in Tool::ALL {
            let Ok(args) = ToolArgs::parse(tool, Some(study_only.clone())) else {
                continue;
            };
            let substitutes = tool.failure_policy() == FailurePolicy::Substitute;
            assert_eq!(args.unavailable_message().is_some(), substitutes, "{}", tool.name());
        }
    }

    #[test]
    fn fallback_sentences_name_study_and_level() {
        let args = ToolArgs::parse(
            Tool::GetTreatmentData,
            Some(json!({"studyId": "lgg_ucsf_2014", "level": "SAMPLE"})),
        )
        .unwrap();
        assert_eq!(
            args.unavailable_message().unwrap(),
            "No treatment data available for study lgg_ucsf_2014 at SAMPLE level."
        );

        let args =
            ToolArgs::parse(Tool::GetSurvivalData, Some(json!({"studyId": "acc_tcga"}))).unwrap();
        assert_eq!(
            args.unavailable_message().unwrap(),
            "No survival data available for study acc_tcga with prefix OS."
        );
    }
}

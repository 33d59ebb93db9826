//! Tool catalog and dispatcher.
//!
//! Every tool is a [`Tool`] variant. Name, description, input schema and
//! failure policy are all exhaustive matches, so a tool cannot be listed
//! without a handler or dispatched without a catalog entry.

mod args;
mod handlers;

use cbioportal_api::{CbioPortalClient, PortalError};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::{ServerError, ServerResult};

pub use args::ToolArgs;

/// What the dispatcher does when a handler fails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the failure as a `Tool execution failed` error
    Propagate,
    /// Answer successfully with the tool's "not available" sentence
    Substitute,
}

/// Handler-level failure, before the failure policy is applied
#[derive(Debug, Error)]
pub enum ToolError {
    /// The study lacks the data the tool needs
    #[error("{0}")]
    MissingData(String),
    #[error(transparent)]
    Portal(#[from] PortalError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    GetStudies,
    GetStudyDetails,
    GetSamples,
    GetPatients,
    GetSampleLists,
    GetMolecularProfiles,
    GetMutations,
    GetCopyNumberAlterations,
    GetMolecularData,
    GetClinicalData,
    GetClinicalAttributes,
    SearchGenes,
    GetGenePanels,
    GetCancerTypes,
    GetSignificantlyMutatedGenes,
    GetSurvivalData,
    GetTreatmentData,
}

impl Tool {
    pub const ALL: [Tool; 17] = [
        Tool::GetStudies,
        Tool::GetStudyDetails,
        Tool::GetSamples,
        Tool::GetPatients,
        Tool::GetSampleLists,
        Tool::GetMolecularProfiles,
        Tool::GetMutations,
        Tool::GetCopyNumberAlterations,
        Tool::GetMolecularData,
        Tool::GetClinicalData,
        Tool::GetClinicalAttributes,
        Tool::SearchGenes,
        Tool::GetGenePanels,
        Tool::GetCancerTypes,
        Tool::GetSignificantlyMutatedGenes,
        Tool::GetSurvivalData,
        Tool::GetTreatmentData,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::GetStudies => "get_studies",
            Tool::GetStudyDetails => "get_study_details",
            Tool::GetSamples => "get_samples",
            Tool::GetPatients => "get_patients",
            Tool::GetSampleLists => "get_sample_lists",
            Tool::GetMolecularProfiles => "get_molecular_profiles",
            Tool::GetMutations => "get_mutations",
            Tool::GetCopyNumberAlterations => "get_copy_number_alterations",
            Tool::GetMolecularData => "get_molecular_data",
            Tool::GetClinicalData => "get_clinical_data",
            Tool::GetClinicalAttributes => "get_clinical_attributes",
            Tool::SearchGenes => "search_genes",
            Tool::GetGenePanels => "get_gene_panels",
            Tool::GetCancerTypes => "get_cancer_types",
            Tool::GetSignificantlyMutatedGenes => "get_significantly_mutated_genes",
            Tool::GetSurvivalData => "get_survival_data",
            Tool::GetTreatmentData => "get_treatment_data",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::GetStudies => "Get all cancer studies available in cBioPortal",
            Tool::GetStudyDetails => "Get detailed information about a specific study",
            Tool::GetSamples => "Get samples from a study",
            Tool::GetPatients => "Get patients from a study",
            Tool::GetSampleLists => "Get pre-defined sample lists (cohorts) for a study",
            Tool::GetMolecularProfiles => "Get molecular profiles available for a study",
            Tool::GetMutations => "Get mutation data for genes in a study",
            Tool::GetCopyNumberAlterations => "Get copy number alteration data for genes",
            Tool::GetMolecularData => "Get expression or other molecular data for genes",
            Tool::GetClinicalData => "Get clinical data for patients or samples",
            Tool::GetClinicalAttributes => "Get available clinical attributes for a study",
            Tool::SearchGenes => "Search for genes by symbol or keyword",
            Tool::GetGenePanels => "Get gene panels available for a study",
            Tool::GetCancerTypes => "Get all cancer types available in cBioPortal",
            Tool::GetSignificantlyMutatedGenes => {
                "Get significantly mutated genes (MutSig results) for a study"
            }
            Tool::GetSurvivalData => "Get survival data for patients in a study",
            Tool::GetTreatmentData => "Get treatment data for patients or samples",
        }
    }

    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            Tool::GetSignificantlyMutatedGenes | Tool::GetSurvivalData | Tool::GetTreatmentData => {
                FailurePolicy::Substitute
            }
            _ => FailurePolicy::Propagate,
        }
    }

    pub fn input_schema(self) -> Value {
        let study_id = json!({"type": "string", "description": "Study ID (e.g., 'acc_tcga')"});
        let gene_symbols = json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "List of Hugo gene symbols (e.g., ['TP53', 'KRAS'])"
        });

        match self {
            Tool::GetStudies => json!({
                "type": "object",
                "properties": {
                    "keyword": {"type": "string", "description": "Search keyword for study name or cancer type"},
                    "pageSize": {"type": "integer", "minimum": 0, "description": "Number of studies to return (default: 20)", "default": 20}
                }
            }),
            Tool::GetSamples => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "pageSize": {"type": "integer", "minimum": 0, "description": "Number of samples to return (default: 100)", "default": 100}
                },
                "required": ["studyId"]
            }),
            Tool::GetPatients => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "pageSize": {"type": "integer", "minimum": 0, "description": "Number of patients to return (default: 100)", "default": 100}
                },
                "required": ["studyId"]
            }),
            Tool::GetStudyDetails
            | Tool::GetSampleLists
            | Tool::GetMolecularProfiles
            | Tool::GetClinicalAttributes
            | Tool::GetSignificantlyMutatedGenes => json!({
                "type": "object",
                "properties": {"studyId": study_id},
                "required": ["studyId"]
            }),
            Tool::GetMutations => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "geneSymbols": gene_symbols,
                    "sampleIds": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional: specific sample IDs to query"
                    }
                },
                "required": ["studyId", "geneSymbols"]
            }),
            Tool::GetCopyNumberAlterations => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "geneSymbols": gene_symbols,
                    "alterationType": {
                        "type": "string",
                        "enum": ["HOMDEL_AND_AMP", "HOMDEL", "AMP", "GAIN", "HETLOSS", "DIPLOID", "ALL"],
                        "description": "Type of copy number events to include",
                        "default": "HOMDEL_AND_AMP"
                    }
                },
                "required": ["studyId", "geneSymbols"]
            }),
            Tool::GetMolecularData => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "geneSymbols": gene_symbols,
                    "molecularProfileType": {
                        "type": "string",
                        "description": "Type of molecular profile (e.g., 'rna_seq_v2_mrna', 'protein_level'). Matched case-insensitively; a datatype match on any profile beats an earlier profile ID match. Falls back to the first profile when nothing matches"
                    }
                },
                "required": ["studyId", "geneSymbols"]
            }),
            Tool::GetClinicalData => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "clinicalDataType": {
                        "type": "string",
                        "enum": ["SAMPLE", "PATIENT"],
                        "description": "Type of clinical data",
                        "default": "SAMPLE"
                    },
                    "attributeId": {"type": "string", "description": "Optional: specific clinical attribute ID"}
                },
                "required": ["studyId"]
            }),
            Tool::SearchGenes => json!({
                "type": "object",
                "properties": {
                    "keyword": {"type": "string", "description": "Gene symbol or keyword to search"},
                    "pageSize": {"type": "integer", "minimum": 0, "description": "Number of results to return (default: 20)", "default": 20}
                },
                "required": ["keyword"]
            }),
            Tool::GetGenePanels => json!({
                "type": "object",
                "properties": {
                    "studyId": {"type": "string", "description": "Study ID (optional - if not provided, gets all panels)"}
                }
            }),
            Tool::GetCancerTypes => json!({
                "type": "object",
                "properties": {}
            }),
            Tool::GetSurvivalData => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "attributeIdPrefix": {
                        "type": "string",
                        "description": "Prefix for survival attributes (e.g., 'OS' for overall survival)",
                        "default": "OS"
                    }
                },
                "required": ["studyId"]
            }),
            Tool::GetTreatmentData => json!({
                "type": "object",
                "properties": {
                    "studyId": study_id,
                    "level": {
                        "type": "string",
                        "enum": ["PATIENT", "SAMPLE"],
                        "description": "Level of treatment data",
                        "default": "PATIENT"
                    },
                    "tier": {
                        "type": "string",
                        "enum": ["Agent", "AgentClass", "AgentTarget"],
                        "description": "Treatment tier level",
                        "default": "Agent"
                    }
                },
                "required": ["studyId"]
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    Tool::ALL
        .into_iter()
        .map(|tool| ToolDescriptor {
            name: tool.name(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

/// Resolve, run, and apply the failure policy for one `tools/call`.
///
/// Unknown names and malformed arguments fail before any upstream call.
pub async fn call_tool(
    portal: &CbioPortalClient,
    name: &str,
    arguments: Option<Value>,
) -> ServerResult<String> {
    let tool = Tool::from_name(name).ok_or_else(|| ServerError::UnknownTool(name.to_string()))?;
    let args = ToolArgs::parse(tool, arguments)?;

    match handlers::execute(portal, &args).await {
        Ok(text) => Ok(text),
        Err(err) => match (tool.failure_policy(), args.unavailable_message()) {
            (FailurePolicy::Substitute, Some(message)) => {
                tracing::warn!(
                    tool = tool.name(),
                    error = %err,
                    "data unavailable, answering with fallback"
                );
                Ok(message)
            }
            _ => Err(ServerError::ToolExecution(err.to_string())),
        },
    }
}

//! Response and request shapes for the cBioPortal API.
//!
//! Fields are optional wherever the upstream omits them under the
//! `SUMMARY` projection; legacy field names are accepted as aliases.

pub mod clinical;
pub mod filters;
pub mod molecular;
pub mod reference;
pub mod study;

pub use clinical::{ClinicalAttribute, ClinicalData, TreatmentRow};
pub use filters::{
    ClinicalDataType, DiscreteCopyNumberEventType, MolecularDataFilter, PatientIdentifier,
    Projection, StudyViewFilter, SurvivalRequest, TreatmentLevel, TreatmentTier,
};
pub use molecular::{
    DiscreteCopyNumberData, GeneMolecularData, MolecularAlterationType, MolecularProfile,
    Mutation, MutSigResult,
};
pub use reference::{CancerType, Gene, GenePanel, GenePanelGene};
pub use study::{CancerStudy, Patient, Sample, SampleList};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reference::Gene;

/// Assay family of a molecular profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MolecularAlterationType {
    MutationExtended,
    MutationUncalled,
    StructuralVariant,
    CopyNumberAlteration,
    MrnaExpression,
    MrnaExpressionNormals,
    RnaExpression,
    MicroRnaExpression,
    Methylation,
    MethylationBinary,
    ProteinLevel,
    ProteinArrayProteinLevel,
    ProteinArrayPhosphorylation,
    Phosphorylation,
    GenesetScore,
    GenericAssay,
}

impl MolecularAlterationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MutationExtended => "MUTATION_EXTENDED",
            Self::MutationUncalled => "MUTATION_UNCALLED",
            Self::StructuralVariant => "STRUCTURAL_VARIANT",
            Self::CopyNumberAlteration => "COPY_NUMBER_ALTERATION",
            Self::MrnaExpression => "MRNA_EXPRESSION",
            Self::MrnaExpressionNormals => "MRNA_EXPRESSION_NORMALS",
            Self::RnaExpression => "RNA_EXPRESSION",
            Self::MicroRnaExpression => "MICRO_RNA_EXPRESSION",
            Self::Methylation => "METHYLATION",
            Self::MethylationBinary => "METHYLATION_BINARY",
            Self::ProteinLevel => "PROTEIN_LEVEL",
            Self::ProteinArrayProteinLevel => "PROTEIN_ARRAY_PROTEIN_LEVEL",
            Self::ProteinArrayPhosphorylation => "PROTEIN_ARRAY_PHOSPHORYLATION",
            Self::Phosphorylation => "PHOSPHORYLATION",
            Self::GenesetScore => "GENESET_SCORE",
            Self::GenericAssay => "GENERIC_ASSAY",
        }
    }

    /// Parse an upstream tag; unknown tags yield `None`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "MUTATION_EXTENDED" => Self::MutationExtended,
            "MUTATION_UNCALLED" => Self::MutationUncalled,
            "STRUCTURAL_VARIANT" => Self::StructuralVariant,
            "COPY_NUMBER_ALTERATION" => Self::CopyNumberAlteration,
            "MRNA_EXPRESSION" => Self::MrnaExpression,
            "MRNA_EXPRESSION_NORMALS" => Self::MrnaExpressionNormals,
            "RNA_EXPRESSION" => Self::RnaExpression,
            "MICRO_RNA_EXPRESSION" => Self::MicroRnaExpression,
            "METHYLATION" => Self::Methylation,
            "METHYLATION_BINARY" => Self::MethylationBinary,
            "PROTEIN_LEVEL" => Self::ProteinLevel,
            "PROTEIN_ARRAY_PROTEIN_LEVEL" => Self::ProteinArrayProteinLevel,
            "PROTEIN_ARRAY_PHOSPHORYLATION" => Self::ProteinArrayPhosphorylation,
            "PHOSPHORYLATION" => Self::Phosphorylation,
            "GENESET_SCORE" => Self::GenesetScore,
            "GENERIC_ASSAY" => Self::GenericAssay,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for MolecularAlterationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named dataset of one assay type within a study
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularProfile {
    #[serde(alias = "stableId")]
    pub molecular_profile_id: String,
    #[serde(default)]
    pub study_id: Option<String>,
    /// Raw upstream tag; see [`MolecularProfile::alteration_type`]
    #[serde(default)]
    pub molecular_alteration_type: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MolecularProfile {
    pub fn alteration_type(&self) -> Option<MolecularAlterationType> {
        self.molecular_alteration_type
            .as_deref()
            .and_then(MolecularAlterationType::from_tag)
    }

    pub fn is_alteration(&self, kind: MolecularAlterationType) -> bool {
        self.alteration_type() == Some(kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub hugo_gene_symbol: Option<String>,
    #[serde(default)]
    pub gene: Option<Gene>,
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub mutation_type: Option<String>,
    #[serde(default)]
    pub protein_change: Option<String>,
    #[serde(default)]
    pub amino_acid_change: Option<String>,
}

impl Mutation {
    /// Symbol carried by the record itself, if any
    pub fn gene_symbol(&self) -> Option<&str> {
        self.hugo_gene_symbol
            .as_deref()
            .or_else(|| self.gene.as_ref().map(|g| g.hugo_gene_symbol.as_str()))
    }

    /// Protein change, falling back to the amino-acid change
    pub fn change(&self) -> Option<&str> {
        self.protein_change
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.amino_acid_change.as_deref().filter(|c| !c.is_empty()))
    }
}

/// Discrete (GISTIC-style) copy-number call for one gene in one sample
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscreteCopyNumberData {
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub gene: Option<Gene>,
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub alteration: i32,
}

impl DiscreteCopyNumberData {
    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene.as_ref().map(|g| g.hugo_gene_symbol.as_str())
    }
}

/// Expression or other per-gene value from a molecular profile
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneMolecularData {
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub gene: Option<Gene>,
    #[serde(default)]
    pub sample_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl GeneMolecularData {
    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene.as_ref().map(|g| g.hugo_gene_symbol.as_str())
    }

    /// Value rendered without JSON quoting
    pub fn display_value(&self) -> String {
        match &self.value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "N/A".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// One row of MutSig significance analysis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutSigResult {
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub hugo_gene_symbol: Option<String>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub p_value: Option<f64>,
    #[serde(default)]
    pub q_value: Option<f64>,
    #[serde(default, rename = "numberOfMutations", alias = "nummutations")]
    pub num_mutations: Option<i64>,
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub entrez_gene_id: i64,
    pub hugo_gene_symbol: String,
    #[serde(default, rename = "type")]
    pub gene_type: Option<String>,
}

/// A targeted sequencing panel
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanel {
    #[serde(alias = "stableId")]
    pub gene_panel_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genes: Option<Vec<GenePanelGene>>,
}

impl GenePanel {
    pub fn gene_count(&self) -> usize {
        self.genes.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenePanelGene {
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub hugo_gene_symbol: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancerType {
    pub type_of_cancer_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub dedicated_color: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::models::{
    CancerStudy, CancerType, ClinicalAttribute, ClinicalData, ClinicalDataType,
    DiscreteCopyNumberData, DiscreteCopyNumberEventType, Gene, GeneMolecularData, GenePanel,
    MolecularDataFilter, MolecularProfile, MutSigResult, Mutation, Patient, Projection, Sample,
    SampleList, StudyViewFilter, SurvivalRequest, TreatmentLevel, TreatmentRow, TreatmentTier,
};

/// # cBioPortal Client
///
/// Thin async wrapper over the cBioPortal REST API. One instance owns a
/// single `reqwest::Client` bound to the configured base URL, JSON headers,
/// and a fixed per-request timeout. There is no retry or caching layer:
/// every method issues exactly one HTTP request.
///
/// ## Usage
///
/// ```rust,no_run
/// use cbioportal_api::{CbioPortalClient, PortalConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CbioPortalClient::with_config(PortalConfig::new().with_timeout_secs(10))?;
///
///     let studies = client.list_studies(Some("breast"), 5).await?;
///     for study in studies {
///         println!("{}: {}", study.study_id, study.name.unwrap_or_default());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CbioPortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for CbioPortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbioPortalClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CbioPortalClient {
    /// Create a client for the public cBioPortal instance
    pub fn new() -> Result<Self> {
        Self::with_config(PortalConfig::new())
    }

    /// Create a client with custom configuration
    ///
    /// Fails when the base URL is not an absolute `http`/`https` URL or the
    /// underlying HTTP client cannot be built.
    pub fn with_config(config: PortalConfig) -> Result<Self> {
        let parsed = Url::parse(&config.base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortalError::config_error(format!(
                "unsupported scheme in base URL: {}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root every request is relative to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // === Raw access ===

    /// GET `path` relative to the base URL and decode the JSON body
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "GET");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body to `path` and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, query: &[(&str, String)], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "POST");

        let mut request = self.http.post(&url).json(body);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(PortalError::Parse)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(PortalError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    // === Studies, samples and patients ===

    /// List studies, optionally filtered by keyword
    ///
    /// # Arguments
    /// * `keyword` - Matches study name, description and cancer type
    /// * `page_size` - Maximum number of studies the upstream should return
    pub async fn list_studies(
        &self,
        keyword: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<CancerStudy>> {
        let mut query = vec![
            ("pageSize", page_size.to_string()),
            ("projection", Projection::Summary.as_str().to_string()),
        ];
        if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }
        self.get_json("/studies", &query).await
    }

    /// Get detailed information about one study
    pub async fn study(&self, study_id: &str) -> Result<CancerStudy> {
        self.get_json(&format!("/studies/{}", urlencoding::encode(study_id)), &[])
            .await
    }

    pub async fn study_samples(&self, study_id: &str, page_size: u32) -> Result<Vec<Sample>> {
        let query = [
            ("pageSize", page_size.to_string()),
            ("projection", Projection::Summary.as_str().to_string()),
        ];
        self.get_json(
            &format!("/studies/{}/samples", urlencoding::encode(study_id)),
            &query,
        )
        .await
    }

    /// List patients of a study; `None` leaves the page size to the upstream
    pub async fn study_patients(
        &self,
        study_id: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<Patient>> {
        let query: Vec<(&str, String)> = match page_size {
            Some(size) => vec![
                ("pageSize", size.to_string()),
                ("projection", Projection::Summary.as_str().to_string()),
            ],
            None => Vec::new(),
        };
        self.get_json(
            &format!("/studies/{}/patients", urlencoding::encode(study_id)),
            &query,
        )
        .await
    }

    pub async fn sample_lists(&self, study_id: &str) -> Result<Vec<SampleList>> {
        self.get_json(
            &format!("/studies/{}/sample-lists", urlencoding::encode(study_id)),
            &[],
        )
        .await
    }

    // === Molecular data ===

    pub async fn molecular_profiles(&self, study_id: &str) -> Result<Vec<MolecularProfile>> {
        self.get_json(
            &format!("/studies/{}/molecular-profiles", urlencoding::encode(study_id)),
            &[],
        )
        .await
    }

    /// Resolve Hugo symbols to genes (and their Entrez ids) in one call
    ///
    /// Unknown symbols are silently absent from the result.
    pub async fn fetch_genes_by_symbol(&self, symbols: &[String]) -> Result<Vec<Gene>> {
        let query = [("geneIdType", "HUGO_GENE_SYMBOL".to_string())];
        self.post_json("/genes/fetch", &query, symbols).await
    }

    pub async fn fetch_mutations(
        &self,
        molecular_profile_id: &str,
        filter: &MolecularDataFilter,
    ) -> Result<Vec<Mutation>> {
        self.post_json(
            &format!(
                "/molecular-profiles/{}/mutations/fetch",
                urlencoding::encode(molecular_profile_id)
            ),
            &[],
            filter,
        )
        .await
    }

    pub async fn fetch_discrete_copy_number(
        &self,
        molecular_profile_id: &str,
        event_type: DiscreteCopyNumberEventType,
        filter: &MolecularDataFilter,
    ) -> Result<Vec<DiscreteCopyNumberData>> {
        let query = [("discreteCopyNumberEventType", event_type.as_str().to_string())];
        self.post_json(
            &format!(
                "/molecular-profiles/{}/discrete-copy-number/fetch",
                urlencoding::encode(molecular_profile_id)
            ),
            &query,
            filter,
        )
        .await
    }

    pub async fn fetch_molecular_data(
        &self,
        molecular_profile_id: &str,
        filter: &MolecularDataFilter,
    ) -> Result<Vec<GeneMolecularData>> {
        self.post_json(
            &format!(
                "/molecular-profiles/{}/molecular-data/fetch",
                urlencoding::encode(molecular_profile_id)
            ),
            &[],
            filter,
        )
        .await
    }

    /// MutSig results; studies without the analysis answer with an error status
    pub async fn significantly_mutated_genes(&self, study_id: &str) -> Result<Vec<MutSigResult>> {
        self.get_json(
            &format!(
                "/studies/{}/significantly-mutated-genes",
                urlencoding::encode(study_id)
            ),
            &[],
        )
        .await
    }

    // === Clinical data ===

    pub async fn clinical_data(
        &self,
        study_id: &str,
        data_type: ClinicalDataType,
        attribute_id: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<ClinicalData>> {
        let mut query = vec![
            ("clinicalDataType", data_type.as_str().to_string()),
            ("projection", Projection::Summary.as_str().to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(attribute_id) = attribute_id.filter(|a| !a.is_empty()) {
            query.push(("attributeId", attribute_id.to_string()));
        }
        self.get_json(
            &format!("/studies/{}/clinical-data", urlencoding::encode(study_id)),
            &query,
        )
        .await
    }

    pub async fn clinical_attributes(&self, study_id: &str) -> Result<Vec<ClinicalAttribute>> {
        self.get_json(
            &format!("/studies/{}/clinical-attributes", urlencoding::encode(study_id)),
            &[],
        )
        .await
    }

    pub async fn fetch_survival_data(
        &self,
        request: &SurvivalRequest,
    ) -> Result<Vec<ClinicalData>> {
        self.post_json("/survival-data/fetch", &[], request).await
    }

    pub async fn treatments(
        &self,
        level: TreatmentLevel,
        tier: TreatmentTier,
        filter: &StudyViewFilter,
    ) -> Result<Vec<TreatmentRow>> {
        let query = [("tier", tier.as_str().to_string())];
        self.post_json(
            &format!("/treatments/{}", level.path_segment()),
            &query,
            filter,
        )
        .await
    }

    // === Reference data ===

    pub async fn search_genes(&self, keyword: &str, page_size: u32) -> Result<Vec<Gene>> {
        let query = [
            ("keyword", keyword.to_string()),
            ("pageSize", page_size.to_string()),
            ("projection", Projection::Summary.as_str().to_string()),
        ];
        self.get_json("/genes", &query).await
    }

    pub async fn gene_panels(&self, page_size: u32) -> Result<Vec<GenePanel>> {
        let query = [("pageSize", page_size.to_string())];
        self.get_json("/gene-panels", &query).await
    }

    pub async fn cancer_types(&self) -> Result<Vec<CancerType>> {
        self.get_json("/cancer-types", &[]).await
    }

    // === Server status ===

    /// Portal version and build information
    pub async fn info(&self) -> Result<Value> {
        self.get_json("/info", &[]).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get_json("/health", &[]).await
    }
}

//! Read-only JSON resources.
//!
//! Each resource is one upstream GET whose body is handed back verbatim,
//! pretty-printed, except `server-info` which combines two calls.

use cbioportal_api::CbioPortalClient;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ServerError, ServerResult};

pub const MIME_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Studies,
    CancerTypes,
    Genes,
    GenePanels,
    MolecularProfiles,
    ServerInfo,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Studies,
        Resource::CancerTypes,
        Resource::Genes,
        Resource::GenePanels,
        Resource::MolecularProfiles,
        Resource::ServerInfo,
    ];

    pub fn uri(self) -> &'static str {
        match self {
            Resource::Studies => "cbioportal://studies",
            Resource::CancerTypes => "cbioportal://cancer-types",
            Resource::Genes => "cbioportal://genes",
            Resource::GenePanels => "cbioportal://gene-panels",
            Resource::MolecularProfiles => "cbioportal://molecular-profiles",
            Resource::ServerInfo => "cbioportal://server-info",
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|resource| resource.uri() == uri)
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::Studies => "Cancer Studies",
            Resource::CancerTypes => "Cancer Types",
            Resource::Genes => "Genes",
            Resource::GenePanels => "Gene Panels",
            Resource::MolecularProfiles => "Molecular Profiles",
            Resource::ServerInfo => "Server Information",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Resource::Studies => "List of all cancer studies available in cBioPortal",
            Resource::CancerTypes => "List of all cancer types in cBioPortal",
            Resource::Genes => "Gene information and metadata",
            Resource::GenePanels => "Available gene panels for targeted sequencing",
            Resource::MolecularProfiles => "Available molecular profiles across all studies",
            Resource::ServerInfo => "cBioPortal server information and status",
        }
    }

    /// Upstream route and query for the single-call resources
    fn route(self) -> Option<(&'static str, Vec<(&'static str, String)>)> {
        let summary = |page_size: u32| {
            vec![
                ("pageSize", page_size.to_string()),
                ("projection", "SUMMARY".to_string()),
            ]
        };
        match self {
            Resource::Studies => Some(("/studies", Vec::new())),
            Resource::CancerTypes => Some(("/cancer-types", Vec::new())),
            Resource::Genes => Some(("/genes", summary(100))),
            Resource::GenePanels => Some(("/gene-panels", summary(50))),
            Resource::MolecularProfiles => Some(("/molecular-profiles", summary(100))),
            Resource::ServerInfo => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn resource_descriptors() -> Vec<ResourceDescriptor> {
    Resource::ALL
        .into_iter()
        .map(|resource| ResourceDescriptor {
            uri: resource.uri(),
            mime_type: MIME_TYPE,
            name: resource.name(),
            description: resource.description(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

pub async fn read_resource(
    portal: &CbioPortalClient,
    uri: &str,
) -> ServerResult<ReadResourceResult> {
    let resource =
        Resource::from_uri(uri).ok_or_else(|| ServerError::UnknownResource(uri.to_string()))?;

    let value = match resource.route() {
        Some((path, query)) => portal
            .get_json::<Value>(path, &query)
            .await
            .map_err(|err| ServerError::ResourceRead {
                uri: uri.to_string(),
                message: err.to_string(),
            })?,
        None => server_info(portal).await,
    };

    let text = serde_json::to_string_pretty(&value).map_err(ServerError::Serialization)?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents {
            uri: uri.to_string(),
            mime_type: MIME_TYPE,
            text,
        }],
    })
}

/// Info and health fetched together; a failure of either is reported inline
async fn server_info(portal: &CbioPortalClient) -> Value {
    match futures::future::try_join(portal.info(), portal.health()).await {
        Ok((info, health)) => json!({
            "info": info,
            "health": health,
            "apiUrl": portal.base_url(),
        }),
        Err(err) => {
            tracing::warn!(error = %err, "server information unavailable");
            json!({
                "error": "Unable to fetch server information",
                "apiUrl": portal.base_url(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbioportal_api::PortalConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn portal_for(server: &MockServer) -> CbioPortalClient {
        CbioPortalClient::with_config(PortalConfig::new().with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn uris_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_uri(resource.uri()), Some(resource));
        }
        assert_eq!(Resource::from_uri("cbioportal://unknown"), None);
        assert_eq!(resource_descriptors().len(), 6);
    }

    #[tokio::test]
    async fn studies_body_is_passed_through_pretty_printed() {
        let server = MockServer::start().await;
        let body = json!([{"studyId": "acc_tcga", "extraField": {"nested": [1, 2]}}]);
        Mock::given(method("GET"))
            .and(path("/studies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let result = read_resource(&portal_for(&server), "cbioportal://studies")
            .await
            .unwrap();

        let contents = &result.contents[0];
        assert_eq!(contents.uri, "cbioportal://studies");
        assert_eq!(contents.mime_type, "application/json");
        assert_eq!(contents.text, serde_json::to_string_pretty(&body).unwrap());
    }

    #[tokio::test]
    async fn gene_panels_use_summary_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gene-panels"))
            .and(query_param("pageSize", "50"))
            .and(query_param("projection", "SUMMARY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let result = read_resource(&portal_for(&server), "cbioportal://gene-panels")
            .await
            .unwrap();
        assert_eq!(result.contents[0].text, "[]");
    }

    #[tokio::test]
    async fn unknown_uri_is_rejected_without_http() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = read_resource(&portal_for(&server), "cbioportal://unknown")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource: cbioportal://unknown");
    }

    #[tokio::test]
    async fn fetch_failure_names_the_uri() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cancer-types"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = read_resource(&portal_for(&server), "cbioportal://cancer-types")
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::ResourceRead { .. }));
        assert!(err.to_string().starts_with("Failed to read resource cbioportal://cancer-types:"));
    }

    #[tokio::test]
    async fn server_info_combines_info_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"portalVersion": "v6.0.0"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UP"})))
            .mount(&server)
            .await;

        let portal = portal_for(&server);
        let result = read_resource(&portal, "cbioportal://server-info").await.unwrap();
        let value: Value = serde_json::from_str(&result.contents[0].text).unwrap();

        assert_eq!(value["info"]["portalVersion"], "v6.0.0");
        assert_eq!(value["health"]["status"], "UP");
        assert_eq!(value["apiUrl"], portal.base_url());
    }

    #[tokio::test]
    async fn server_info_failure_is_reported_inline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"portalVersion": "v6.0.0"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let portal = portal_for(&server);
        let result = read_resource(&portal, "cbioportal://server-info").await.unwrap();
        let value: Value = serde_json::from_str(&result.contents[0].text).unwrap();

        assert_eq!(
            value,
            json!({"error": "Unable to fetch server information", "apiUrl": portal.base_url()})
        );
    }
}

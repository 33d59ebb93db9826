use cbioportal_api::{CbioPortalClient, PortalConfig};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::env;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};

use crate::error::{ServerError, ServerResult};
use crate::resources::{ResourceDescriptor, read_resource, resource_descriptors};
use crate::tools::{ToolDescriptor, call_tool, tool_descriptors};

const SERVER_NAME: &str = "cbioportal-mcp-server";
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub struct CbioPortalMcpServer {
    portal: CbioPortalClient,
}

impl CbioPortalMcpServer {
    pub async fn bootstrap() -> ServerResult<()> {
        let portal = CbioPortalClient::with_config(config_from_env())?;
        let server = Self::new(portal);
        tracing::info!(
            api_url = server.portal.base_url(),
            "cBioPortal MCP server running on stdio"
        );
        server.run().await
    }

    pub fn new(portal: CbioPortalClient) -> Self {
        Self { portal }
    }

    async fn run(&self) -> ServerResult<()> {
        self.serve(BufReader::new(io::stdin()), io::stdout()).await
    }

    /// Answer one JSON-RPC request per input line until EOF
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> ServerResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut writer = BufWriter::new(writer);
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request = match serde_json::from_str::<Request>(trimmed) {
                Ok(request) => request,
                Err(err) => {
                    tracing::warn!("invalid request: {err}");
                    let response =
                        Response::error(None, ServerError::InvalidRequest(err.to_string()));
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            if let Some(response) = self.handle_request(request).await {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }

    async fn handle_request(&self, request: Request) -> Option<Response> {
        if request.id.is_none() && request.method.starts_with("notifications/") {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }

        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(request.id, result),
            Err(err) => {
                tracing::debug!(method = %request.method, error = %err, "request failed");
                Response::error(request.id, err)
            }
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> ServerResult<Value> {
        match method {
            "initialize" => {
                let params: InitializeParams = parse_optional_params(method, params)?;
                if let Some(client) = &params.client_info {
                    tracing::info!(
                        client = %client.name,
                        version = client.version.as_deref().unwrap_or("unknown"),
                        "client connected"
                    );
                }
                to_result(InitializeResult::new(params.protocol_version))
            }
            "ping" => Ok(json!({})),
            "shutdown" => Ok(Value::Null),
            "tools/list" => {
                let params: ListParams = parse_optional_params(method, params)?;
                let _ = params.cursor;
                to_result(ListToolsResult {
                    tools: tool_descriptors(),
                })
            }
            "tools/call" => {
                let params: CallToolParams = parse_required_params(method, params)?;
                let text = call_tool(&self.portal, &params.name, params.arguments).await?;
                to_result(ToolResponse::text(text))
            }
            "resources/list" => {
                let params: ListParams = parse_optional_params(method, params)?;
                let _ = params.cursor;
                to_result(ListResourcesResult {
                    resources: resource_descriptors(),
                })
            }
            "resources/read" => {
                let params: ReadResourceParams = parse_required_params(method, params)?;
                to_result(read_resource(&self.portal, &params.uri).await?)
            }
            other => Err(ServerError::InvalidMethod(other.to_string())),
        }
    }
}

/// Portal settings with `CBIOPORTAL_*` overrides applied
fn config_from_env() -> PortalConfig {
    let mut config = PortalConfig::new();
    if let Ok(base_url) = env::var("CBIOPORTAL_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(user_agent) = env::var("CBIOPORTAL_USER_AGENT") {
        config = config.with_user_agent(user_agent);
    }
    if let Ok(raw) = env::var("CBIOPORTAL_TIMEOUT_SECS") {
        match raw.trim().parse::<u64>() {
            Ok(secs) => config = config.with_timeout_secs(secs),
            Err(err) => tracing::warn!(value = %raw, "ignoring CBIOPORTAL_TIMEOUT_SECS: {err}"),
        }
    }
    config
}

async fn write_response<W>(writer: &mut BufWriter<W>, response: &Response) -> ServerResult<()>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_string(response).map_err(ServerError::Serialization)?;
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

fn to_result<T: Serialize>(value: T) -> ServerResult<Value> {
    serde_json::to_value(value).map_err(ServerError::Serialization)
}

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default, rename = "jsonrpc")]
    _jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
}

impl Response {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, error: ServerError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(ResponseError::from(error)),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ResponseError {
    fn new(code: i32, message: String) -> Self {
        Self {
            code,
            message,
            data: None,
        }
    }
}

fn error_code(err: &ServerError) -> i32 {
    match err {
        ServerError::InvalidRequest(_) | ServerError::UnknownResource(_) => -32600,
        ServerError::InvalidMethod(_) | ServerError::UnknownTool(_) => -32601,
        ServerError::InvalidParams(_) => -32602,
        ServerError::ToolExecution(_)
        | ServerError::ResourceRead { .. }
        | ServerError::Serialization(_) => -32603,
        ServerError::Io(_) => -32020,
        ServerError::Portal(_) => -32010,
    }
}

impl From<ServerError> for ResponseError {
    fn from(err: ServerError) -> Self {
        let code = error_code(&err);
        let message = match err {
            ServerError::InvalidRequest(message) | ServerError::InvalidParams(message) => message,
            other => other.to_string(),
        };
        Self::new(code, message)
    }
}

fn parse_required_params<T>(method: &str, params: Option<Value>) -> ServerResult<T>
where
    T: DeserializeOwned,
{
    match params {
        Some(value) => serde_json::from_value(value)
            .map_err(|err| ServerError::InvalidParams(format!("{method}: {err}"))),
        None => Err(ServerError::InvalidParams(format!(
            "{method}: missing parameters"
        ))),
    }
}

fn parse_optional_params<T>(method: &str, params: Option<Value>) -> ServerResult<T>
where
    T: DeserializeOwned + Default,
{
    match params {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|err| ServerError::InvalidParams(format!("{method}: {err}"))),
    }
}

#[derive(Debug, Default, Deserialize)]
struct InitializeParams {
    #[serde(default, rename = "protocolVersion")]
    protocol_version: Option<String>,
    #[serde(default, rename = "clientInfo")]
    client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    capabilities: Value,
    #[serde(rename = "serverInfo")]
    server_info: ServerInfo,
}

impl InitializeResult {
    fn new(protocol_version: Option<String>) -> Self {
        Self {
            protocol_version: protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: json!({
                "tools": {},
                "resources": {}
            }),
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Serialize)]
struct ListToolsResult {
    tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Serialize)]
struct ListResourcesResult {
    resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Serialize)]
struct ToolResponse {
    content: Vec<ToolContent>,
}

impl ToolResponse {
    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_for(mock: &MockServer) -> CbioPortalMcpServer {
        let portal =
            CbioPortalClient::with_config(PortalConfig::new().with_base_url(mock.uri())).unwrap();
        CbioPortalMcpServer::new(portal)
    }

    /// Server whose upstream must never be contacted
    async fn offline_server() -> (MockServer, CbioPortalMcpServer) {
        let mock = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock)
            .await;
        let server = server_for(&mock).await;
        (mock, server)
    }

    async fn exchange(server: &CbioPortalMcpServer, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn initialize_echoes_protocol_version() {
        let (_mock, server) = offline_server().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","clientInfo":{"name":"inspector"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"initialize"}"#,
            "\n"
        );

        let responses = exchange(&server, input).await;
        assert_eq!(responses.len(), 2);

        let first = &responses[0]["result"];
        assert_eq!(first["protocolVersion"], "2025-03-26");
        assert_eq!(first["serverInfo"]["name"], "cbioportal-mcp-server");
        assert!(first["capabilities"]["tools"].is_object());
        assert!(first["capabilities"]["resources"].is_object());

        assert_eq!(responses[1]["result"]["protocolVersion"], "2024-11-05");
    }

    #[tokio::test]
    async fn catalogs_are_listed_without_upstream_calls() {
        let (_mock, server) = offline_server().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":"t","method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":"r","method":"resources/list","params":{}}"#,
            "\n"
        );

        let responses = exchange(&server, input).await;
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 17);
        assert!(tools.iter().all(|tool| tool["inputSchema"]["type"] == "object"));
        assert_eq!(responses[0]["id"], "t");

        let resources = responses[1]["result"]["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 6);
        assert!(resources.iter().all(|r| r["mimeType"] == "application/json"));
    }

    #[tokio::test]
    async fn notifications_and_blank_lines_get_no_reply() {
        let (_mock, server) = offline_server().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n   \n",
            r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#,
            "\n"
        );

        let responses = exchange(&server, input).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn malformed_line_is_answered_and_loop_continues() {
        let (_mock, server) = offline_server().await;
        let input = "{not json\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n";

        let responses = exchange(&server, input).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], -32600);
        assert_eq!(responses[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn protocol_errors_carry_json_rpc_codes() {
        let (_mock, server) = offline_server().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"prompts/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_everything"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_study_details","arguments":{}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":4,"method":"resources/read","params":{"uri":"cbioportal://nothing"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call"}"#,
            "\n"
        );

        let responses = exchange(&server, input).await;
        assert_eq!(responses.len(), 5);

        assert_eq!(responses[0]["error"]["code"], -32601);
        assert_eq!(responses[0]["error"]["message"], "Unknown method: prompts/list");

        assert_eq!(responses[1]["error"]["code"], -32601);
        assert_eq!(responses[1]["error"]["message"], "Unknown tool: get_everything");

        assert_eq!(responses[2]["error"]["code"], -32602);
        assert!(
            responses[2]["error"]["message"]
                .as_str()
                .unwrap()
                .contains("studyId")
        );

        assert_eq!(responses[3]["error"]["code"], -32600);
        assert_eq!(responses[3]["error"]["message"], "Unknown resource: cbioportal://nothing");

        assert_eq!(responses[4]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn tool_call_returns_text_content() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cancer-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "typeOfCancerId": "brca",
                    "name": "Invasive Breast Carcinoma",
                    "shortName": "BRCA",
                    "dedicatedColor": "HotPink"
                }
            ])))
            .expect(1)
            .mount(&mock)
            .await;
        let server = server_for(&mock).await;

        let input = r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"get_cancer_types"}}"#;
        let responses = exchange(&server, input).await;

        let content = &responses[0]["result"]["content"][0];
        assert_eq!(content["type"], "text");
        assert_eq!(
            content["text"],
            "Cancer types available in cBioPortal:\n\n\
             • **Invasive Breast Carcinoma** (brca)\n  Short Name: BRCA\n  Color: HotPink"
        );
    }

    #[tokio::test]
    async fn failed_tool_is_an_internal_error() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/studies/acc_tcga"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&mock)
            .await;
        let server = server_for(&mock).await;

        let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_study_details","arguments":{"studyId":"acc_tcga"}}}"#;
        let responses = exchange(&server, input).await;

        assert_eq!(responses[0]["error"]["code"], -32603);
        let message = responses[0]["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Tool execution failed:"));
        assert!(message.contains("database down"));
    }

    #[tokio::test]
    async fn resource_read_wraps_contents() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cancer-types"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"typeOfCancerId": "acc"}])),
            )
            .mount(&mock)
            .await;
        let server = server_for(&mock).await;

        let input = r#"{"jsonrpc":"2.0","id":1,"method":"resources/read","params":{"uri":"cbioportal://cancer-types"}}"#;
        let responses = exchange(&server, input).await;

        let contents = &responses[0]["result"]["contents"][0];
        assert_eq!(contents["uri"], "cbioportal://cancer-types");
        assert_eq!(contents["mimeType"], "application/json");
        let text: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
        assert_eq!(text, json!([{"typeOfCancerId": "acc"}]));
    }

    #[test]
    fn error_codes_follow_json_rpc() {
        let code = |err: ServerError| ResponseError::from(err).code;
        assert_eq!(code(ServerError::InvalidRequest("x".into())), -32600);
        assert_eq!(code(ServerError::UnknownResource("x".into())), -32600);
        assert_eq!(code(ServerError::InvalidMethod("x".into())), -32601);
        assert_eq!(code(ServerError::UnknownTool("x".into())), -32601);
        assert_eq!(code(ServerError::InvalidParams("x".into())), -32602);
        assert_eq!(code(ServerError::ToolExecution("x".into())), -32603);
        assert_eq!(
            code(ServerError::ResourceRead {
                uri: "u".into(),
                message: "m".into()
            }),
            -32603
        );
        assert_eq!(code(ServerError::Io(std::io::Error::other("x"))), -32020);
    }
}

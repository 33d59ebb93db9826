use cbioportal_api::PortalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unknown method: {0}")]
    InvalidMethod(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),
    #[error("Failed to read resource {uri}: {message}")]
    ResourceRead { uri: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

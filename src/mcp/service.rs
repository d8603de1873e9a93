//! MCP Service - Core JSON-RPC 2.0 request handler shared by both transports.

use crate::db::AppState;
use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::tools::{ToolDescriptor, ToolRegistry};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const SCHEMA_RESOURCE_URI: &str = "stats://schema";

const SCHEMA_TEXT: &str = include_str!("../../migrations/20250101000000_statistics.sql");

/// Core MCP request handler.
#[derive(Clone)]
pub struct McpService {
    registry: Arc<ToolRegistry>,
    state: AppState,
}

impl McpService {
    pub fn new(registry: ToolRegistry, state: AppState) -> Self {
        Self {
            registry: Arc::new(registry),
            state,
        }
    }

    /// Handles one raw JSON-RPC message (a stdio line or an HTTP body).
    ///
    /// Malformed JSON is a parse error; well-formed JSON that is not a
    /// request object is an invalid request.
    pub async fn handle_line(&self, line: &str) -> Option<OutboundResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to parse JSON-RPC message: {}", err);
                return Some(OutboundResponse::parse_error(format!("Parse error: {err}")));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => {
                warn!("invalid JSON-RPC request: {}", err);
                return Some(OutboundResponse::invalid_request(
                    id,
                    format!("Invalid request: {err}"),
                ));
            }
        };
        self.handle_request(request).await
    }

    /// Returns `None` for notifications (requests without an id).
    pub async fn handle_request(&self, request: RpcRequest) -> Option<OutboundResponse> {
        if request.id.is_none() {
            debug!("received notification: {}", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            warn!("received unsupported jsonrpc version: {}", request.jsonrpc);
            return Some(OutboundResponse::invalid_request(
                request.id.clone(),
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let RpcRequest {
            method, params, id, ..
        } = request;

        match method.as_str() {
            "initialize" => Some(self.handle_initialize(id, params)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => Some(self.handle_call_tool(id, params).await),
            "resources/list" => Some(self.handle_resources_list(id)),
            "resources/read" => Some(self.handle_resources_read(id, params)),
            "resources/templates/list" => Some(self.handle_resource_templates_list(id)),
            "prompts/list" => Some(self.handle_prompts_list(id)),
            "prompts/get" => Some(self.handle_prompts_get(id, params)),
            "ping" => Some(OutboundResponse::success(id, json!({}))),
            other => {
                warn!("unknown method: {}", other);
                Some(OutboundResponse::method_not_found(id, other))
            }
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: InitializeParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!(
            "client requested initialization: {} v{} (protocol {})",
            parsed.client_info.name,
            parsed
                .client_info
                .version
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            parsed.protocol_version
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ImplementationInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("소상공인 상권 통계 MCP 서버".to_string()),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
        };

        to_response(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> OutboundResponse {
        let payload = ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
        };
        to_response(id, &payload)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: CallToolParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        let result = self
            .registry
            .call_tool(&parsed.name, parsed.arguments, &self.state)
            .await;
        to_response(id, &result)
    }

    fn handle_resources_list(&self, id: Option<Value>) -> OutboundResponse {
        let payload = ListResourcesResult {
            resources: vec![ResourceDescriptor {
                uri: SCHEMA_RESOURCE_URI.to_string(),
                name: Some("statistics-schema".to_string()),
                description: Some(
                    "execute_sql에서 사용할 수 있는 테이블 정의 (population_statistics, income_distribution)"
                        .to_string(),
                ),
                mime_type: Some("application/sql".to_string()),
            }],
            next_cursor: None,
        };
        to_response(id, &payload)
    }

    fn handle_resources_read(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: ResourceReadParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        if parsed.uri != SCHEMA_RESOURCE_URI {
            let message = format!("Resource '{}'을(를) 찾을 수 없습니다.", parsed.uri);
            return OutboundResponse::error(id, -32002, message);
        }

        let payload = ResourceReadResult {
            contents: vec![ResourceContents {
                uri: SCHEMA_RESOURCE_URI.to_string(),
                mime_type: "application/sql".to_string(),
                text: SCHEMA_TEXT.to_string(),
            }],
        };
        to_response(id, &payload)
    }

    fn handle_resource_templates_list(&self, id: Option<Value>) -> OutboundResponse {
        let payload = ResourceTemplateListResult {
            resource_templates: Vec::new(),
            next_cursor: None,
        };
        to_response(id, &payload)
    }

    fn handle_prompts_list(&self, id: Option<Value>) -> OutboundResponse {
        let payload = PromptListResult {
            prompts: Vec::new(),
            next_cursor: None,
        };
        to_response(id, &payload)
    }

    fn handle_prompts_get(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: PromptGetParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        let message = format!("Prompt '{}'은(는) 제공되지 않습니다.", parsed.name);
        OutboundResponse::invalid_params(id, message)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "clientInfo")]
    client_info: ClientInfo,
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
    #[serde(rename = "serverInfo")]
    server_info: ImplementationInfo,
    capabilities: ServerCapabilities,
}

#[derive(Debug, Serialize)]
struct ImplementationInfo {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
    resources: ResourcesCapability,
}

#[derive(Debug, Serialize)]
struct ToolsCapability {
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ResourcesCapability {
    subscribe: bool,
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ListToolsResult {
    tools: Vec<ToolDescriptor>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ListResourcesResult {
    resources: Vec<ResourceDescriptor>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResourceDescriptor {
    uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "mimeType")]
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    uri: String,
}

#[derive(Debug, Serialize)]
struct ResourceReadResult {
    contents: Vec<ResourceContents>,
}

#[derive(Debug, Serialize)]
struct ResourceContents {
    uri: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct ResourceTemplateListResult {
    #[serde(rename = "resourceTemplates")]
    resource_templates: Vec<Value>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct PromptListResult {
    prompts: Vec<Value>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptGetParams {
    name: String,
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| err.to_string())
}

fn to_response<T: Serialize>(id: Option<Value>, payload: &T) -> OutboundResponse {
    match serde_json::to_value(payload) {
        Ok(value) => OutboundResponse::success(id, value),
        Err(err) => OutboundResponse::internal_error(id, err.to_string()),
    }
}

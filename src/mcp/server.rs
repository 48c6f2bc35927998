use crate::app::App;
use crate::errors::{ApiError, ErrorCode, McpError};
use crate::mcp::catalog::{tool_catalog, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "timely-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn map_api_error(tool: &str, error: &ApiError) -> McpError {
    let message = [
        "TimelyError".to_string(),
        format!("tool: {}", tool),
        format!("kind: {}", error.kind()),
        format!("message: {}", error),
    ]
    .join("\n");

    let code = match error.root() {
        ApiError::Auth(_) | ApiError::Forbidden(_) | ApiError::NotFound(_) => {
            ErrorCode::InvalidRequest
        }
        ApiError::Validation { .. }
        | ApiError::InvalidArguments(_)
        | ApiError::UnsupportedMethod(_) => ErrorCode::InvalidParams,
        ApiError::UnknownTool(_) => ErrorCode::MethodNotFound,
        _ => ErrorCode::InternalError,
    };
    McpError::new(code, message)
}

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new() -> Result<Self, ApiError> {
        let app = App::initialize()?;
        Ok(Self { app: Arc::new(app) })
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"list": true, "call": true}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, name: &str, args: Value) -> Result<Value, McpError> {
        let args = if args.is_null() {
            serde_json::json!({})
        } else {
            args
        };
        validate_tool_args(name, &args)?;

        let result = self
            .app
            .tool_executor
            .execute(name, args)
            .await
            .map_err(|err| map_api_error(name, &err))?;

        let text = serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string());
        Ok(serde_json::json!({
            "content": [ { "type": "text", "text": text } ]
        }))
    }

    pub async fn run_stdio(&self) -> Result<(), ApiError> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();
        let mut writer = BufWriter::new(stdout);

        while let Some(line) = reader.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        ErrorCode::ParseError.as_i32(),
                        "Parse error".to_string(),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let request: JsonRpcRequest = match serde_json::from_value(parsed) {
                Ok(req) => req,
                Err(_) => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        ErrorCode::InvalidRequest.as_i32(),
                        "Invalid request".to_string(),
                    );
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let response = match request.method.as_str() {
                _ if request.method.starts_with("notifications/") && request.id.is_none() => None,
                "notifications/initialized" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, serde_json::json!({}))),
                "initialize" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, self.handle_initialize())),
                "tools/list" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, self.handle_tools_list())),
                "tools/call" => match request.id.clone() {
                    Some(id) => {
                        let params = request.params.as_object().cloned().unwrap_or_default();
                        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                        if name.is_empty() {
                            Some(JsonRpcResponse::failure(
                                id,
                                ErrorCode::InvalidParams.as_i32(),
                                "Missing tool name".to_string(),
                            ))
                        } else {
                            let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                            let call = match self.handle_tools_call(name, args).await {
                                Ok(result) => JsonRpcResponse::success(id, result),
                                Err(err) => {
                                    JsonRpcResponse::failure(id, err.code.as_i32(), err.message)
                                }
                            };
                            Some(call)
                        }
                    }
                    None => None,
                },
                _ => request.id.clone().map(|id| {
                    JsonRpcResponse::failure(
                        id,
                        ErrorCode::MethodNotFound.as_i32(),
                        "Method not found".to_string(),
                    )
                }),
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }
}

async fn write_response<W>(writer: &mut BufWriter<W>, response: &JsonRpcResponse) -> Result<(), ApiError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let payload = serde_json::to_string(response).unwrap_or_default();
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn run_stdio() -> Result<(), ApiError> {
    let server = McpServer::new()?;
    server.run_stdio().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_invalid_request() {
        let err = ApiError::Auth("Invalid access token".to_string())
            .context("Failed to get client 7");
        let mapped = map_api_error("get_client", &err);
        assert_eq!(mapped.code.as_i32(), ErrorCode::InvalidRequest.as_i32());
        assert!(mapped.message.contains("tool: get_client"));
        assert!(mapped.message.contains("kind: authentication"));
    }

    #[test]
    fn unknown_tools_map_to_method_not_found() {
        let err = ApiError::UnknownTool("frobnicate".to_string());
        let mapped = map_api_error("frobnicate", &err);
        assert_eq!(mapped.code.as_i32(), ErrorCode::MethodNotFound.as_i32());
    }

    #[test]
    fn transport_failures_map_to_internal_error() {
        let err = ApiError::Transport("Request timed out".to_string());
        let mapped = map_api_error("list_projects", &err);
        assert_eq!(mapped.code.as_i32(), ErrorCode::InternalError.as_i32());
    }
}

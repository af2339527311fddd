//! Newline-delimited JSON-RPC 2.0 over a reader/writer pair (stdin/stdout in
//! production). Implements the subset of MCP needed to list and call tools.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::tools::ToolService;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "pokemon-mcp";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn encode(response: RpcResponse) -> Option<String> {
    match serde_json::to_string(&response) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(error = %err, "failed to encode response");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct Server {
    tools: ToolService,
}

impl Server {
    pub fn new(tools: ToolService) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolService {
        &self.tools
    }

    /// Reads requests until EOF, answering each one before reading the next.
    ///
    /// Only transport IO errors end the loop. A line that is not UTF-8 gets a
    /// parse error reply like any other malformed message.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let reply = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\r', '\n'])).await,
                Err(err) => {
                    warn!(error = %err, "message is not valid UTF-8");
                    encode(RpcResponse::err(
                        Value::Null,
                        PARSE_ERROR,
                        format!("parse error: {err}"),
                    ))
                }
            };
            if let Some(reply) = reply {
                writer.write_all(reply.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        info!("input closed, shutting down");
        Ok(())
    }

    /// Handles one raw message. Notifications produce no reply.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(err) => {
                warn!(error = %err, "unparseable message");
                Some(RpcResponse::err(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {err}"),
                ))
            }
            Ok(value) => self.handle_value(value).await,
        }?;
        encode(response)
    }

    async fn handle_value(&self, value: Value) -> Option<RpcResponse> {
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => {
                return Some(RpcResponse::err(
                    id_hint,
                    INVALID_REQUEST,
                    format!("invalid request: {err}"),
                ))
            }
        };
        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };
        debug!(method = %request.method, %id, "request");
        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => RpcResponse::ok(id, result),
            Err((code, message)) => RpcResponse::err(id, code, message),
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, (i64, String)> {
        match method {
            "initialize" => {
                let version = params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION)
                    .to_string();
                Ok(json!({
                    "protocolVersion": version,
                    "capabilities": { "tools": { "listChanged": false } },
                    "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
                }))
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": ToolService::definitions() })),
            "tools/call" => {
                let call: CallParams = serde_json::from_value(params)
                    .map_err(|err| (INVALID_PARAMS, format!("invalid tools/call params: {err}")))?;
                info!(tool = %call.name, "tool call");
                let text = self.tools.call(&call.name, call.arguments).await;
                Ok(json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }))
            }
            other => Err((METHOD_NOT_FOUND, format!("method not found: {other}"))),
        }
    }
}

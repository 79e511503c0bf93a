//! Newline-delimited JSON-RPC serve loop.
//!
//! Generic over the reader/writer pair so tests drive it with in-memory
//! buffers; the binary plugs in stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    tools::ToolRouter,
    types::{
        InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, ServerCapabilities,
        ServerInfo, ToolsCallParams, ToolsCapability, ToolsListResult, codes,
    },
};

pub struct McpServer {
    router: ToolRouter,
}

impl McpServer {
    #[must_use]
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }

    /// Serve on stdin/stdout until EOF.
    pub async fn run_stdio(self) -> Result<()> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve on an arbitrary transport until EOF.
    pub async fn run<R, W>(self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                debug!("client closed the transport");
                return Ok(());
            }

            let frame = line.trim();
            if frame.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(frame) {
                Ok(req) => req,
                Err(e) => {
                    warn!(error = %e, "unparseable frame");
                    let resp = JsonRpcResponse::failure(
                        serde_json::Value::Null,
                        codes::PARSE_ERROR,
                        format!("parse error: {e}"),
                    );
                    write_frame(&mut writer, &resp).await?;
                    continue;
                },
            };

            let Some(id) = request.id else {
                // Notifications expect no response line.
                debug!(method = %request.method, "notification");
                continue;
            };

            debug!(method = %request.method, "client -> server");
            let response = self.handle(id, &request.method, request.params).await;
            write_frame(&mut writer, &response).await?;
        }
    }

    async fn handle(
        &self,
        id: serde_json::Value,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        match method {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.into(),
                    capabilities: ServerCapabilities {
                        tools: Some(ToolsCapability {
                            list_changed: false,
                        }),
                    },
                    server_info: ServerInfo {
                        name: "slack-mcp".into(),
                        version: env!("CARGO_PKG_VERSION").into(),
                    },
                };
                json_success(id, &result)
            },
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => {
                let result = ToolsListResult {
                    tools: self.router.definitions(),
                };
                json_success(id, &result)
            },
            "tools/call" => {
                let params: ToolsCallParams =
                    match serde_json::from_value(params.unwrap_or_default()) {
                        Ok(p) => p,
                        Err(e) => {
                            return JsonRpcResponse::failure(
                                id,
                                codes::INVALID_PARAMS,
                                format!("invalid params: {e}"),
                            );
                        },
                    };

                match self.router.dispatch(&params.name, params.arguments).await {
                    Ok(result) => json_success(id, &result),
                    Err(e @ (Error::UnknownTool(_) | Error::InvalidParams(_))) => {
                        JsonRpcResponse::failure(id, codes::INVALID_PARAMS, e.to_string())
                    },
                    Err(e) => {
                        JsonRpcResponse::failure(id, codes::INTERNAL_ERROR, e.to_string())
                    },
                }
            },
            _ => JsonRpcResponse::failure(
                id,
                codes::METHOD_NOT_FOUND,
                format!("method not found: {method}"),
            ),
        }
    }
}

fn json_success(id: serde_json::Value, result: &impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::failure(id, codes::INTERNAL_ERROR, e.to_string()),
    }
}

async fn write_frame<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_string(response)?;
    payload.push('\n');
    writer.write_all(payload.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

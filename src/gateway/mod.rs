//! Request gateway: MCP-style JSON-RPC over stdio.
//!
//! Exposes tools: analyze_content, list_analyses, get_analysis,
//! delete_analysis, analysis_stats. The gateway validates input and maps
//! results to payloads; scoring rules live in the engine only.

use crate::analyzer::ScoringEngine;
use crate::history::{HistoryStore, DEFAULT_LIST_LIMIT};
use crate::{ScoringInput, ScoringResult, Verdict};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};

/// MCP JSON-RPC request
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Option<String>,
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i32 = -32601;

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Tool definition for MCP tools/list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDef {
    name: &'static str,
    description: &'static str,
    input_schema: InputSchema,
}

#[derive(Debug, Serialize)]
struct InputSchema {
    #[serde(rename = "type")]
    typ: &'static str,
    properties: serde_json::Value,
    required: Vec<&'static str>,
}

/// Response payload for one analysis
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload<'a> {
    pub credibility_score: u8,
    pub verdict: Verdict,
    pub analysis: &'a str,
    pub indicators: &'a [String],
    pub sources: &'a [String],
    pub content_length: usize,
    pub source_url: &'a str,
    /// Set only when the result was persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<&'a str>,
}

impl<'a> AnalyzePayload<'a> {
    pub fn new(result: &'a ScoringResult, analysis_id: Option<&'a str>) -> Self {
        Self {
            credibility_score: result.credibility_score,
            verdict: result.verdict,
            analysis: &result.analysis,
            indicators: &result.indicators,
            sources: &result.sources,
            content_length: result.content_length,
            source_url: &result.source_url,
            analysis_id,
        }
    }
}

type Args = serde_json::Map<String, serde_json::Value>;

fn arg<'a>(args: &'a Args, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn required<'a>(args: &'a Args, key: &str) -> anyhow::Result<&'a str> {
    arg(args, key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("missing required argument '{}'", key))
}

/// Gateway state: one engine plus an optional history store
pub struct Gateway {
    engine: ScoringEngine,
    history: Option<HistoryStore>,
}

impl Gateway {
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            engine,
            history: None,
        }
    }

    /// Attach a history store; without one, nothing is persisted
    pub fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = Some(store);
        self
    }

    /// Handle a single JSON-RPC request and return a response.
    pub fn handle_request(&mut self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let result = match req.method.as_str() {
            "initialize" => Some(serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "credence", "version": env!("CARGO_PKG_VERSION") }
            })),
            "tools/list" => Some(serde_json::json!({ "tools": tool_defs() })),
            "tools/call" => {
                let (name, args) = req
                    .params
                    .as_ref()
                    .and_then(|p| p.get("params").or(Some(p)))
                    .map(|p| {
                        let name = p.get("name").and_then(|n| n.as_str()).unwrap_or("");
                        let args = p
                            .get("arguments")
                            .and_then(|a| a.as_object())
                            .cloned()
                            .unwrap_or_default();
                        (name, args)
                    })
                    .unwrap_or(("", Args::new()));

                match self.call_tool(name, &args) {
                    Ok(val) => Some(serde_json::json!({
                        "content": [{ "type": "text", "text": serde_json::to_string(&val).unwrap_or_else(|_| "{}".to_string()) }]
                    })),
                    Err(e) => {
                        log::debug!("tool {} failed: {:#}", name, e);
                        Some(serde_json::json!({
                            "content": [{ "type": "text", "text": format!("Error: {:#}", e) }],
                            "isError": true
                        }))
                    }
                }
            }
            other => {
                return JsonRpcResponse {
                    jsonrpc: "2.0",
                    id,
                    result: None,
                    error: Some(JsonRpcError {
                        code: METHOD_NOT_FOUND,
                        message: format!("Method not found: {}", other),
                    }),
                }
            }
        };

        JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result,
            error: None,
        }
    }

    /// Like [`Gateway::handle_request`], but notifications (no `id`) get no reply.
    pub fn respond(&mut self, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let response = self.handle_request(req);
        req.id.as_ref().map(|_| response)
    }

    fn call_tool(&mut self, name: &str, args: &Args) -> anyhow::Result<serde_json::Value> {
        match name {
            "analyze_content" => self.run_analyze(args),
            "list_analyses" => {
                let owner = required(args, "owner")?;
                let limit = args
                    .get("limit")
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize)
                    .unwrap_or(DEFAULT_LIST_LIMIT);
                let records = self.store()?.list(owner, limit);
                Ok(serde_json::to_value(records)?)
            }
            "get_analysis" => {
                let owner = required(args, "owner")?;
                let id = required(args, "id")?;
                let record = self.store()?.get(owner, id)?;
                Ok(serde_json::to_value(record)?)
            }
            "delete_analysis" => {
                let owner = required(args, "owner")?.to_string();
                let id = required(args, "id")?.to_string();
                let removed = self.store_mut()?.delete(&owner, &id)?;
                Ok(serde_json::json!({
                    "message": "Analysis deleted successfully",
                    "id": removed.id
                }))
            }
            "analysis_stats" => {
                let owner = required(args, "owner")?;
                Ok(serde_json::to_value(self.store()?.stats(owner))?)
            }
            _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
        }
    }

    fn run_analyze(&mut self, args: &Args) -> anyhow::Result<serde_json::Value> {
        let mut input = ScoringInput::new(arg(args, "text").unwrap_or(""));
        if let Some(url) = arg(args, "sourceUrl") {
            input = input.with_source_url(url);
        }
        let result = self.engine.analyze(&input)?;

        // Anonymous calls are never persisted.
        let owner = arg(args, "owner").filter(|o| !o.trim().is_empty());
        let saved = match (owner, self.history.as_mut()) {
            (Some(owner), Some(store)) => {
                let title = arg(args, "title").map(str::to_string);
                Some(store.save(owner, title, &input.text, result.clone())?)
            }
            _ => None,
        };

        let payload = AnalyzePayload::new(&result, saved.as_ref().map(|r| r.id.as_str()));
        Ok(serde_json::to_value(payload)?)
    }

    fn store(&self) -> anyhow::Result<&HistoryStore> {
        self.history
            .as_ref()
            .context("history store not configured")
    }

    fn store_mut(&mut self) -> anyhow::Result<&mut HistoryStore> {
        self.history
            .as_mut()
            .context("history store not configured")
    }

    /// Run the gateway loop (stdin / stdout).
    pub fn serve(&mut self) -> anyhow::Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let req: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("skipping malformed request: {}", e);
                    continue;
                }
            };

            let Some(response) = self.respond(&req) else {
                continue;
            };
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }
        Ok(())
    }
}

fn tool_defs() -> Vec<ToolDef> {
    let owner = serde_json::json!({ "type": "string", "description": "Verified caller id" });
    let id = serde_json::json!({ "type": "string", "description": "Analysis id" });
    vec![
        ToolDef {
            name: "analyze_content",
            description: "Score text for credibility and explain the verdict",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "text": { "type": "string", "description": "Content to analyze" },
                    "sourceUrl": { "type": "string", "description": "Where the content came from" },
                    "owner": owner,
                    "title": { "type": "string", "description": "Label stored with the analysis" }
                }),
                required: vec!["text"],
            },
        },
        ToolDef {
            name: "list_analyses",
            description: "List saved analyses for an owner, newest first",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({
                    "owner": owner,
                    "limit": { "type": "number", "description": "Max records (default 50)" }
                }),
                required: vec!["owner"],
            },
        },
        ToolDef {
            name: "get_analysis",
            description: "Fetch one saved analysis",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({ "owner": owner, "id": id }),
                required: vec!["owner", "id"],
            },
        },
        ToolDef {
            name: "delete_analysis",
            description: "Delete one saved analysis",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({ "owner": owner, "id": id }),
                required: vec!["owner", "id"],
            },
        },
        ToolDef {
            name: "analysis_stats",
            description: "Verdict counts and average score for an owner",
            input_schema: InputSchema {
                typ: "object",
                properties: serde_json::json!({ "owner": owner }),
                required: vec!["owner"],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: Some("2.0".to_string()),
            id: Some(serde_json::json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn call(gateway: &mut Gateway, name: &str, args: serde_json::Value) -> serde_json::Value {
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({ "name": name, "arguments": args })),
        );
        gateway.handle_request(&req).result.unwrap()
    }

    fn payload(result: &serde_json::Value) -> serde_json::Value {
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_initialize_returns_protocol_version_and_server_info() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let resp = gateway.handle_request(&make_request("initialize", None));

        assert_eq!(resp.jsonrpc, "2.0");
        assert_eq!(resp.id, Some(serde_json::json!(1)));
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "credence");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[test]
    fn test_tools_list_declares_required_args() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let result = gateway
            .handle_request(&make_request("tools/list", None))
            .result
            .unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 5);
        for tool in tools {
            let schema = &tool["inputSchema"];
            assert_eq!(schema["type"], "object");
            assert!(!schema["required"].as_array().unwrap().is_empty());
        }
    }

    #[test]
    fn test_analyze_returns_gateway_payload_fields() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let result = call(
            &mut gateway,
            "analyze_content",
            serde_json::json!({ "text": "Neutral text.", "sourceUrl": "https://reuters.com/story" }),
        );
        assert!(result.get("isError").is_none());
        let body = payload(&result);
        assert_eq!(body["credibilityScore"], 65);
        assert_eq!(body["verdict"], "UNCERTAIN");
        assert_eq!(body["contentLength"], 13);
        assert_eq!(body["sourceUrl"], "https://reuters.com/story");
        assert!(body["indicators"].as_array().unwrap().is_empty());
        assert!(body.get("analysisId").is_none());
        assert!(body.get("hits").is_none());
    }

    #[test]
    fn test_analyze_blank_text_is_invalid_input() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        for args in [serde_json::json!({ "text": "   " }), serde_json::json!({})] {
            let result = call(&mut gateway, "analyze_content", args);
            assert_eq!(result["isError"], true);
            let text = result["content"][0]["text"].as_str().unwrap();
            assert!(text.starts_with("Error:"));
            assert!(text.contains("invalid input"));
        }
    }

    #[test]
    fn test_owner_call_is_persisted_anonymous_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway =
            Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));

        let anon = payload(&call(
            &mut gateway,
            "analyze_content",
            serde_json::json!({ "text": "anonymous call" }),
        ));
        assert!(anon.get("analysisId").is_none());

        let saved = payload(&call(
            &mut gateway,
            "analyze_content",
            serde_json::json!({ "text": "owned call", "owner": "alice", "title": "mine" }),
        ));
        let id = saved["analysisId"].as_str().unwrap().to_string();

        let listed = payload(&call(
            &mut gateway,
            "list_analyses",
            serde_json::json!({ "owner": "alice" }),
        ));
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], id.as_str());
        assert_eq!(listed[0]["title"], "mine");

        let forbidden = call(
            &mut gateway,
            "get_analysis",
            serde_json::json!({ "owner": "bob", "id": id }),
        );
        assert_eq!(forbidden["isError"], true);

        let stats = payload(&call(
            &mut gateway,
            "analysis_stats",
            serde_json::json!({ "owner": "alice" }),
        ));
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["uncertain"], 1);

        let deleted = payload(&call(
            &mut gateway,
            "delete_analysis",
            serde_json::json!({ "owner": "alice", "id": id }),
        ));
        assert_eq!(deleted["message"], "Analysis deleted successfully");

        let missing = call(
            &mut gateway,
            "get_analysis",
            serde_json::json!({ "owner": "alice", "id": id }),
        );
        assert_eq!(missing["isError"], true);
        assert!(missing["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("not found"));
    }

    #[test]
    fn test_history_tools_require_a_store() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let result = call(
            &mut gateway,
            "list_analyses",
            serde_json::json!({ "owner": "alice" }),
        );
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("history store not configured"));
    }

    #[test]
    fn test_tools_call_unknown_tool_returns_error() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let result = call(&mut gateway, "nonexistent_tool", serde_json::json!({}));
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Unknown tool"));
    }

    #[test]
    fn test_unknown_method_returns_method_not_found() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let resp = gateway.handle_request(&make_request("nonexistent/method", None));
        assert!(resp.result.is_none());
        let error = resp.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("nonexistent/method"));

        let json = serde_json::to_value(
            gateway.handle_request(&make_request("nonexistent/method", None)),
        )
        .unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32601);
    }

    #[test]
    fn test_notifications_get_no_reply() {
        let mut gateway = Gateway::new(ScoringEngine::new());
        let json = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let notification: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(gateway.respond(&notification).is_none());

        let request = make_request("tools/list", None);
        assert!(gateway.respond(&request).is_some());
    }

    #[test]
    fn test_jsonrpc_request_with_string_id() {
        let json = r#"{"jsonrpc":"2.0","id":"abc-123","method":"tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        let resp = Gateway::new(ScoringEngine::new()).handle_request(&req);
        assert_eq!(resp.id, Some(serde_json::json!("abc-123")));
    }

    #[test]
    fn test_tools_call_with_nested_params() {
        // Some MCP clients wrap params inside a "params" key
        let req = make_request(
            "tools/call",
            Some(serde_json::json!({
                "params": {
                    "name": "analyze_content",
                    "arguments": { "text": "According to NPR, data indicates a rise." }
                }
            })),
        );
        let result = Gateway::new(ScoringEngine::new())
            .handle_request(&req)
            .result
            .unwrap();
        let body = payload(&result);
        assert_eq!(body["credibilityScore"], 70);
        assert_eq!(body["verdict"], "LIKELY REAL");
    }
}

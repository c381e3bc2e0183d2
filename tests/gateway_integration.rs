//! Integration tests for the gateway's public API.

use credence::gateway::{Gateway, JsonRpcRequest};
use credence::history::{HistoryStore, HISTORY_FILENAME};
use credence::{RuleCategory, RuleSet, ScoringEngine};
use serde_json::json;

fn make_request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: Some("2.0".to_string()),
        id: Some(json!(7)),
        method: method.to_string(),
        params,
    }
}

fn call(gateway: &mut Gateway, name: &str, args: serde_json::Value) -> serde_json::Value {
    let req = make_request("tools/call", Some(json!({ "name": name, "arguments": args })));
    gateway.handle_request(&req).result.expect("expected result")
}

fn body(result: &serde_json::Value) -> serde_json::Value {
    let text = result["content"][0]["text"].as_str().expect("text content");
    serde_json::from_str(text).expect("JSON payload")
}

#[test]
fn tools_list_names_every_tool() {
    let mut gateway = Gateway::new(ScoringEngine::new());
    let result = gateway
        .handle_request(&make_request("tools/list", None))
        .result
        .expect("expected result");
    let names: Vec<&str> = result["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "analyze_content",
            "list_analyses",
            "get_analysis",
            "delete_analysis",
            "analysis_stats"
        ]
    );
}

#[test]
fn analyze_payload_has_exactly_the_public_fields() {
    let mut gateway = Gateway::new(ScoringEngine::new());
    let payload = body(&call(
        &mut gateway,
        "analyze_content",
        json!({ "text": "This is SHOCKING and UNBELIEVABLE!!! You won't believe what happened!!" }),
    ));
    let mut keys: Vec<&str> = payload
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "analysis",
            "contentLength",
            "credibilityScore",
            "indicators",
            "sourceUrl",
            "sources",
            "verdict"
        ]
    );
    assert_eq!(payload["verdict"], "LIKELY FAKE");
    assert_eq!(payload["sourceUrl"], "");
}

#[test]
fn gateway_uses_the_engine_it_was_given() {
    let engine = ScoringEngine::with_rules(RuleSet::default().without(RuleCategory::TrustedDomain));
    let mut gateway = Gateway::new(engine);
    let payload = body(&call(
        &mut gateway,
        "analyze_content",
        json!({ "text": "Neutral text.", "sourceUrl": "https://reuters.com/story" }),
    ));
    assert_eq!(payload["credibilityScore"], 50);
}

#[test]
fn persisted_analysis_survives_a_new_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let mut gateway =
            Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));
        let payload = body(&call(
            &mut gateway,
            "analyze_content",
            json!({ "text": "According to NPR, data indicates a rise.", "owner": "u1" }),
        ));
        payload["analysisId"].as_str().expect("analysis id").to_string()
    };
    assert!(dir.path().join(HISTORY_FILENAME).exists());

    let mut gateway =
        Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));
    let record = body(&call(&mut gateway, "get_analysis", json!({ "owner": "u1", "id": id })));
    assert_eq!(record["ownerId"], "u1");
    assert_eq!(record["text"], "According to NPR, data indicates a rise.");
    assert_eq!(record["result"]["credibilityScore"], 70);
    assert!(record["createdAt"].as_str().is_some());
}

#[test]
fn missing_owner_argument_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway =
        Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));
    let result = call(&mut gateway, "analysis_stats", json!({}));
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("missing required argument 'owner'"));
}

#[test]
fn delete_by_other_owner_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway =
        Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));
    let saved = body(&call(
        &mut gateway,
        "analyze_content",
        json!({ "text": "plain words", "owner": "alice" }),
    ));
    let id = saved["analysisId"].as_str().unwrap();

    let result = call(&mut gateway, "delete_analysis", json!({ "owner": "mallory", "id": id }));
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("not authorized"));

    let listed = body(&call(&mut gateway, "list_analyses", json!({ "owner": "alice" })));
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn list_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway =
        Gateway::new(ScoringEngine::new()).with_history(HistoryStore::in_dir(dir.path()));
    for text in ["one", "two", "three"] {
        call(&mut gateway, "analyze_content", json!({ "text": text, "owner": "alice" }));
    }
    let listed = body(&call(
        &mut gateway,
        "list_analyses",
        json!({ "owner": "alice", "limit": 2 }),
    ));
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

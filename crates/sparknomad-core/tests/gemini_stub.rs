//! Client tests against a local stub of the generateContent endpoint

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use serde_json::{json, Value};
use sparknomad_core::{GeminiClient, GenerationError};

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    api_key: Option<String>,
    body: Value,
}

async fn generate_content(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let seen = Seen {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    };
    stub.seen.lock().unwrap().push(seen);
    (stub.status, stub.body.clone())
}

/// Start a stub server, returning its base URL and the request log
async fn start_stub(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body: body.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new().fallback(generate_content).with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn candidate_with_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_fintech_three_pairs_accepted() {
    let names = json!({
        "names": [
            { "name": "Coinlet", "tagline": "Small change, big moves." },
            { "name": "Vaultwise", "tagline": "Saving, but smarter." },
            { "name": "Ledgerly", "tagline": "Books that balance themselves." }
        ]
    });
    let (base_url, seen) = start_stub(StatusCode::OK, candidate_with_text(&names.to_string())).await;

    let client = GeminiClient::with_base_url(Some("test-key"), "gemini-3-flash-preview", &base_url);
    let response = client.generate_startup_names("Fintech").await.unwrap();

    let got: Vec<&str> = response.names.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(got, vec!["Coinlet", "Vaultwise", "Ledgerly"]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert_eq!(request.path, "/v1beta/models/gemini-3-flash-preview:generateContent");
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let prompt = request.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Generate 10 creative"));
    assert!(prompt.contains("\"Fintech\" industry"));

    let config = &request.body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["responseSchema"]["required"], json!(["names"]));
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let (base_url, _) = start_stub(
        StatusCode::FORBIDDEN,
        json!({ "error": { "code": 403, "status": "PERMISSION_DENIED" } }),
    )
    .await;

    let client = GeminiClient::with_base_url(Some("bad-key"), "gemini-3-flash-preview", &base_url);
    let err = client.generate_startup_names("SaaS").await.unwrap_err();

    match err {
        GenerationError::Api { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("PERMISSION_DENIED"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_text_is_empty_response() {
    let (base_url, _) = start_stub(
        StatusCode::OK,
        json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
    )
    .await;

    let client = GeminiClient::with_base_url(Some("k"), "gemini-3-flash-preview", &base_url);
    let err = client.generate_startup_names("Web3").await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_schema_violation_is_parse_error() {
    let (base_url, _) = start_stub(
        StatusCode::OK,
        candidate_with_text(r#"{"names":[{"name":"Coinlet"}]}"#),
    )
    .await;

    let client = GeminiClient::with_base_url(Some("k"), "gemini-3-flash-preview", &base_url);
    let err = client.generate_startup_names("Fintech").await.unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::with_base_url(Some("k"), "gemini-3-flash-preview", &format!("http://{}", addr));
    let err = client.generate_startup_names("Healthtech").await.unwrap_err();
    assert!(matches!(err, GenerationError::Http(_)));
}

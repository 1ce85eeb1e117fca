//! HTTP-level tests of the remote mirror client against a mock server.

use chrono::Utc;
use habits_client_api::{RemoteMirror, RemoteMirrorError};
use habits_rest_api_contract::{DocumentId, HabitDocument};
use habits_rest_client::{AuthConfig, RestClient, RestClientConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTS_PATH: &str = "/v1/databases/main/collections/habits/documents";

fn document() -> HabitDocument {
    let now = Utc::now();
    HabitDocument {
        title: "Run".to_string(),
        description: "5k".to_string(),
        frequency: "Daily".to_string(),
        streak_count: 0,
        last_completed: now,
        created_at: now,
        user_id: "user-1".to_string(),
    }
}

fn client_for(server: &MockServer) -> RestClient {
    let config = RestClientConfig::new(&format!("{}/v1", server.uri()), "main", "habits")
        .unwrap()
        .with_auth(AuthConfig::with_api_key("secret").with_project_id("habit-app"))
        .with_timeout(Duration::from_millis(300));
    RestClient::new(config).unwrap()
}

#[tokio::test]
async fn test_create_document_returns_server_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .and(header("x-appwrite-key", "secret"))
        .and(header("x-appwrite-project", "habit-app"))
        .and(body_partial_json(json!({
            "data": { "title": "Run", "frequency": "Daily", "user_id": "user-1" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "doc-42",
            "$databaseId": "main",
            "$collectionId": "habits",
            "title": "Run"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = RemoteMirror::create_document(&client, &document()).await.unwrap();

    assert_eq!(id, DocumentId::new("doc-42"));
}

#[tokio::test]
async fn test_create_document_rejects_invalid_document_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut doc = document();
    doc.title = String::new();

    let err = RemoteMirror::create_document(&client_for(&server), &doc)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteMirrorError::Validation(_)));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid API key",
            "code": 401,
            "type": "user_unauthorized"
        })))
        .mount(&server)
        .await;

    let err = RemoteMirror::create_document(&client_for(&server), &document())
        .await
        .unwrap_err();
    match err {
        RemoteMirrorError::Auth(message) => assert_eq!(message, "Invalid API key"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_document_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/doc-42", DOCUMENTS_PATH)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    RemoteMirror::delete_document(&client_for(&server), &DocumentId::new("doc-42"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_document_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/v1/databases/main/collections/habits/documents/.+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found"
        })))
        .mount(&server)
        .await;

    let err = RemoteMirror::delete_document(&client_for(&server), &DocumentId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteMirrorError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_slow_server_times_out_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "$id": "late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = RemoteMirror::create_document(&client_for(&server), &document())
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteMirrorError::Unavailable(_)));
}

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use relay_service::error::RelayError;
use relay_service::models::{GenerationRequest, GenerationResult};
use relay_service::services::GenerationClient;
use relay_service::startup::build_router;
use relay_service::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Scripted stand-in for the upstream HTTP client.
struct MockGeneration {
    response: MockResponse,
    probe_healthy: bool,
}

enum MockResponse {
    Reply(&'static str),
    Timeout,
    Status(u16, &'static str),
    MissingField,
}

#[async_trait]
impl GenerationClient for MockGeneration {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResult, RelayError> {
        match &self.response {
            MockResponse::Reply(text) => Ok(GenerationResult {
                generated_text: text.to_string(),
                response_time: Some(0.01),
            }),
            MockResponse::Timeout => Err(RelayError::Transport(
                "request timed out: deadline elapsed".to_string(),
            )),
            MockResponse::Status(code, body) => Err(RelayError::UpstreamStatus {
                status: *code,
                body: body.to_string(),
            }),
            MockResponse::MissingField => Err(RelayError::Application(
                "upstream response did not include 'generated_text'".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        if self.probe_healthy {
            Ok(())
        } else {
            Err(RelayError::Transport(
                "connection failed: connection refused".to_string(),
            ))
        }
    }
}

fn app(mock: MockGeneration) -> Router {
    relay_service::services::metrics::init_metrics();
    build_router(AppState::new(Arc::new(mock), "us-east-1".to_string()))
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let parsed = serde_json::from_slice(&bytes).unwrap();
    (status, parsed)
}

#[tokio::test]
async fn successful_reply_extends_history() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("hello"),
        probe_healthy: true,
    });

    let submitted_history = json!([
        {"role": "user", "content": "Hi"},
        {"role": "assistant", "content": "Hello!"}
    ]);
    let (status, body) = post_chat(
        app,
        json!({
            "message": "Tell me more",
            "conversationHistory": submitted_history.clone(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["response"], json!("hello"));

    let history = body["conversationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    // The submitted turns come back untouched, in order.
    assert_eq!(history[0], submitted_history[0]);
    assert_eq!(history[1], submitted_history[1]);
    assert_eq!(
        history[2],
        json!({"role": "assistant", "content": "hello"})
    );
}

#[tokio::test]
async fn history_defaults_to_empty() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("hi there"),
        probe_healthy: true,
    });

    let (status, body) = post_chat(app, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::OK);
    let history = body["conversationHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["role"], json!("assistant"));
}

#[tokio::test]
async fn missing_generated_text_is_reported() {
    let app = app(MockGeneration {
        response: MockResponse::MissingField,
        probe_healthy: true,
    });

    let (status, body) = post_chat(app, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("generated_text"));
    assert!(body.get("conversationHistory").is_none());
}

#[tokio::test]
async fn transport_timeout_is_reported() {
    let app = app(MockGeneration {
        response: MockResponse::Timeout,
        probe_healthy: true,
    });

    let (status, body) = post_chat(app, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Transport"));
    assert!(error.contains("timed out"));
}

#[tokio::test]
async fn upstream_status_and_body_appear_in_error() {
    let app = app(MockGeneration {
        response: MockResponse::Status(503, "service overloaded"),
        probe_healthy: true,
    });

    let (status, body) = post_chat(app, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("503"));
    assert!(error.contains("service overloaded"));
}

#[tokio::test]
async fn failed_probe_does_not_block_success() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("still works"),
        probe_healthy: false,
    });

    let (status, body) = post_chat(app, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["response"], json!("still works"));
}

#[tokio::test]
async fn missing_message_field_is_input_error() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("unused"),
        probe_healthy: true,
    });

    let (status, body) = post_chat(app, json!({"conversationHistory": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("message"));
}

#[tokio::test]
async fn non_json_body_is_input_error() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("unused"),
        probe_healthy: true,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn cors_allowances_are_present() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("hello"),
        probe_healthy: true,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::ORIGIN, "http://example.com")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"message": "Hello"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn health_check_works() {
    let app = app(MockGeneration {
        response: MockResponse::Reply("unused"),
        probe_healthy: true,
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

//! HTTP contract of /chatbot

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use async_trait::async_trait;
use axum::Router;
use floodzy_chat::ConversationOrchestrator;
use floodzy_core::config::RunMode;
use floodzy_core::{FunctionCallRequest, GeocodeCandidate, Settings};
use floodzy_llm::{GenerateRequest, LlmProvider, MockProvider, ModelTurn, ProviderType};
use floodzy_tools::mock::{MockSources, SourceCall};
use floodzy_tools::ToolDispatcher;
use floodzy_web::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    provider: Arc<MockProvider>,
    sources: MockSources,
}

fn app_with(sources: MockSources, run_mode: RunMode) -> TestApp {
    let provider = Arc::new(MockProvider::new());
    let dispatcher = Arc::new(ToolDispatcher::new(sources.data_sources()));
    let orchestrator =
        ConversationOrchestrator::new(provider.clone(), "gemini-1.5-flash", dispatcher);
    let settings = Settings {
        gemini_api_key: Some("test-key".to_string()),
        run_mode,
        ..Settings::default()
    };
    let state = Arc::new(AppState::from_parts(settings, Some(Arc::new(orchestrator))));
    TestApp {
        router: create_router(state),
        provider,
        sources,
    }
}

fn app() -> TestApp {
    app_with(MockSources::new(), RunMode::Development)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn answers_a_weather_question() {
    let app = app_with(
        MockSources::new().with_place(
            "Bandung",
            vec![GeocodeCandidate::new(-6.9175, 107.6191, "Bandung").unwrap()],
        ),
        RunMode::Development,
    );
    app.provider
        .queue_function_call(
            FunctionCallRequest::new("fetchWeatherData").with_arg("locationName", "Bandung"),
        )
        .queue_text("Bandung sedang hujan ringan.");

    let (status, body) = send(
        app.router,
        post_json("/chatbot", json!({"question": "cuaca di Bandung"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"answer": "Bandung sedang hujan ringan."}));
    assert!(app.sources.calls().contains(&SourceCall::Weather {
        latitude: -6.9175,
        longitude: 107.6191
    }));
}

#[tokio::test]
async fn history_in_either_shape_is_accepted() {
    let app = app();
    app.provider.queue_text("Sama-sama.");

    let (status, _) = send(
        app.router,
        post_json(
            "/api/chatbot",
            json!({
                "question": "terima kasih",
                "history": [
                    {"role": "user", "parts": [{"text": "status pompa?"}]},
                    {"role": "model", "content": "Semua pompa beroperasi."}
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.provider.recorded_calls()[0].contents.len(), 3);
}

#[tokio::test]
async fn missing_or_blank_question_is_rejected_without_calls() {
    for body in [json!({}), json!({"question": ""}), json!({"question": "   "}), json!({"question": null})] {
        let app = app();
        let (status, response) = send(app.router, post_json("/chatbot", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Question is required."}));
        assert_eq!(app.provider.call_count(), 0);
        assert!(app.sources.calls().is_empty());
    }
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chatbot")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, response) = send(app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Question is required.");
}

#[tokio::test]
async fn missing_credentials_is_a_server_error() {
    let state = Arc::new(AppState::from_parts(Settings::default(), None));
    let (status, response) = send(
        create_router(state),
        post_json("/chatbot", json!({"question": "halo"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "GEMINI_API_KEY is missing in environment.");
}

#[tokio::test]
async fn model_failure_is_a_generic_server_error() {
    let app = app();
    app.provider.queue_error("API key not valid");

    let (status, response) = send(
        app.router,
        post_json("/chatbot", json!({"question": "halo"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response["message"],
        "Terjadi kesalahan internal server yang tidak terduga. Mohon coba lagi nanti."
    );
    assert_eq!(response["error"], response["message"]);
    assert!(response["stack"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn production_hides_the_stack() {
    let app = app_with(MockSources::new(), RunMode::Production);
    app.provider.queue_error("API key not valid");

    let (status, response) = send(
        app.router,
        post_json("/chatbot", json!({"question": "halo"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.get("stack").is_none());
}

#[tokio::test]
async fn get_reports_liveness() {
    for uri in ["/chatbot", "/api/chatbot"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app().router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Chatbot API (Flash) is running OK"}));
    }
}

/// A model that never answers in time
struct StalledProvider;

#[async_trait]
impl LlmProvider for StalledProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Mock
    }

    async fn generate(&self, _request: GenerateRequest) -> anyhow::Result<ModelTurn> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(ModelTurn::from_text("terlambat"))
    }
}

#[tokio::test]
async fn slow_model_gets_json_server_error_not_bare_timeout() {
    let dispatcher = Arc::new(ToolDispatcher::new(MockSources::new().data_sources()));
    let orchestrator =
        ConversationOrchestrator::new(Arc::new(StalledProvider), "gemini-1.5-flash", dispatcher);
    let settings = Settings {
        gemini_api_key: Some("test-key".to_string()),
        request_timeout: Duration::from_millis(200),
        ..Settings::default()
    };
    let state = Arc::new(AppState::from_parts(settings, Some(Arc::new(orchestrator))));

    let (status, response) = send(
        create_router(state),
        post_json("/chatbot", json!({"question": "cuaca di Bandung"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response["message"],
        "Terjadi kesalahan internal server yang tidak terduga. Mohon coba lagi nanti."
    );
    assert!(response["stack"].as_str().unwrap().contains("no answer within"));
}

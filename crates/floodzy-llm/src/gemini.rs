//! Google Gemini API Client
//!
//! Uses API key authentication against the Google AI Studio endpoint
//! (`generativelanguage.googleapis.com`). Function calling follows the
//! `functionDeclarations` / `functionCall` / `functionResponse` wire shape.
//!
//! ## Endpoint URLs
//!
//! | Mode | Base URL |
//! |------|----------|
//! | API Key | `https://generativelanguage.googleapis.com/v1beta/models` |

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use floodzy_core::config::endpoints;
use floodzy_core::{FunctionCallRequest, Role, Settings};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::provider::{
    Content, GenerateRequest, LlmProvider, ModelTurn, Part, ProviderType, TokenUsage,
};

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    // Gemini rejects OBJECT schemas with no properties
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

impl From<&Content> for GeminiContent {
    fn from(content: &Content) -> Self {
        let role = if content.is_function_response() {
            "function".to_string()
        } else {
            match content.role {
                Role::User => "user".to_string(),
                Role::Model => "model".to_string(),
            }
        };
        let parts = content
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => GeminiPart {
                    text: Some(text.clone()),
                    ..Default::default()
                },
                Part::FunctionCall(call) => GeminiPart {
                    function_call: Some(GeminiFunctionCall {
                        name: call.name.clone(),
                        args: serde_json::Value::Object(call.arguments.clone()),
                    }),
                    ..Default::default()
                },
                Part::FunctionResponse { name, response } => GeminiPart {
                    function_response: Some(GeminiFunctionResponse {
                        name: name.clone(),
                        response: response.clone(),
                    }),
                    ..Default::default()
                },
            })
            .collect();
        Self { role, parts }
    }
}

fn into_parts(parts: Vec<GeminiPart>) -> Vec<Part> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        if let Some(text) = part.text {
            out.push(Part::Text(text));
        }
        if let Some(fc) = part.function_call {
            out.push(Part::FunctionCall(FunctionCallRequest::from_value(fc.name, fc.args)));
        }
    }
    out
}

// =============================================================================
// CLIENT IMPLEMENTATION
// =============================================================================

const ERROR_PREVIEW_CHARS: usize = 1000;

/// Google Gemini Client (API key mode)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    /// Base API URL
    api_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with API key
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_endpoint(api_key, endpoints::GEMINI_BASE_URL, timeout)
    }

    /// Create with custom endpoint; `timeout` bounds each generateContent call
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from settings; fails when `GEMINI_API_KEY` is absent
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings
            .gemini_api_key
            .clone()
            .context("GEMINI_API_KEY is missing in environment.")?;
        info!(
            "Gemini API key mode ({}, timeout {:?})",
            settings.gemini_base_url, settings.http_timeout
        );
        Self::with_endpoint(api_key, &settings.gemini_base_url, settings.http_timeout)
    }

    /// Get the current API URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_url(&self, model: &str, action: &str) -> String {
        format!("{}/models/{}:{}?key={}", self.api_url, model, action, self.api_key)
    }

    fn build_request(request: &GenerateRequest) -> GeminiRequest {
        let system_instruction = request.system_instruction.as_ref().map(|text| GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            }],
        });

        let tools = if request.tools.is_empty() {
            None
        } else {
            let function_declarations = request
                .tools
                .iter()
                .map(|t| GeminiFunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: (!t.parameters.is_empty()).then(|| t.parameter_schema()),
                })
                .collect();
            Some(vec![GeminiTool {
                function_declarations,
            }])
        };

        GeminiRequest {
            contents: request.contents.iter().map(GeminiContent::from).collect(),
            system_instruction,
            tools,
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Gemini
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelTurn> {
        let url = self.build_url(&request.model, "generateContent");
        let body = Self::build_request(&request);

        info!(
            "Gemini generateContent: model={}, tools={}, contents={}",
            request.model,
            request.tools.len(),
            request.contents.len()
        );
        debug!("Gemini request to: {}", url.split('?').next().unwrap_or(&url));

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the API key
                let e = e.without_url();
                tracing::error!("Gemini HTTP request failed: {}", e);
                anyhow!("Failed to send Gemini request: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // the body goes to the log only; callers may show the error to users
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_PREVIEW_CHARS).collect();
            tracing::error!("Gemini API error {}: {}", status, preview);
            return Err(anyhow!("Gemini API error {}", status));
        }

        let raw_body = response
            .text()
            .await
            .context("Failed to read Gemini response body")?;

        let result: GeminiResponse = serde_json::from_str(&raw_body).map_err(|e| {
            let preview: String = raw_body.chars().take(1000).collect();
            tracing::error!("Failed to parse Gemini response: {}", e);
            tracing::error!("Raw response: {}", preview);
            anyhow!("Failed to parse Gemini response: {}", e)
        })?;

        let usage = result.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        });

        let Some(candidate) = result.candidates.into_iter().next() else {
            warn!("Gemini returned no candidates");
            return Ok(ModelTurn {
                usage,
                ..ModelTurn::from_parts(Vec::new())
            });
        };

        let parts = into_parts(candidate.content.unwrap_or_default().parts);
        let turn = ModelTurn {
            content: Content::model(parts),
            finish_reason: candidate.finish_reason,
            usage,
        };

        if let Some(call) = turn.function_call() {
            info!("Gemini returned function call: {}", call.name);
            debug!("  Function call args: {:?}", call.arguments);
        }

        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodzy_core::{Parameter, ToolDeclaration};
    use mockito::Matcher;
    use serde_json::json;

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn request_with_tools() -> GenerateRequest {
        GenerateRequest {
            model: "gemini-1.5-flash".into(),
            system_instruction: Some("Anda adalah asisten.".into()),
            tools: vec![
                ToolDeclaration {
                    name: "fetchWaterLevelData".into(),
                    description: "tinggi muka air".into(),
                    parameters: vec![],
                },
                ToolDeclaration {
                    name: "geocodeLocation".into(),
                    description: "geocode".into(),
                    parameters: vec![Parameter::string("query", "nama").required()],
                },
            ],
            contents: vec![
                Content::user(vec![Part::text("cuaca di Bandung")]),
                Content::model(vec![Part::FunctionCall(
                    FunctionCallRequest::new("fetchWeatherData").with_arg("locationName", "Bandung"),
                )]),
                Content::user(vec![Part::function_response("fetchWeatherData", json!({"temp": 24}))]),
            ],
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let wire = serde_json::to_value(GeminiClient::build_request(&request_with_tools())).unwrap();

        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "Anda adalah asisten.");
        let decls = &wire["tools"][0]["functionDeclarations"];
        assert!(decls[0].get("parameters").is_none());
        assert_eq!(decls[1]["parameters"]["required"], json!(["query"]));

        let contents = wire["contents"].as_array().unwrap();
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["args"]["locationName"], "Bandung");
        assert_eq!(contents[2]["role"], "function");
        assert_eq!(contents[2]["parts"][0]["functionResponse"]["response"]["temp"], 24);
    }

    #[tokio::test]
    async fn test_generate_parses_function_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [
                            {"functionCall": {"name": "fetchWeatherData", "args": {"locationName": "Bandung"}}}
                        ]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 3, "totalTokenCount": 13}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint("test-key", server.url(), TEST_TIMEOUT).unwrap();
        let turn = client.generate(request_with_tools()).await.unwrap();

        mock.assert_async().await;
        let call = turn.function_call().unwrap();
        assert_eq!(call.name, "fetchWeatherData");
        assert_eq!(call.str_arg("locationName"), Some("Bandung"));
        assert_eq!(turn.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(turn.usage.unwrap().total_tokens, 13);
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty_turn() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint("k", server.url(), TEST_TIMEOUT).unwrap();
        let turn = client.generate(request_with_tools()).await.unwrap();
        assert!(turn.text().is_empty());
        assert!(turn.function_call().is_none());
    }

    #[tokio::test]
    async fn test_generate_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = GeminiClient::with_endpoint("k", server.url(), TEST_TIMEOUT).unwrap();
        let err = client.generate(request_with_tools()).await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error 503 Service Unavailable");
        assert!(!format!("{:#}", err).contains("overloaded"));
    }

    #[tokio::test]
    async fn test_generate_times_out_on_silent_upstream() {
        // accepts connections and never writes a byte
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let settings = Settings {
            gemini_api_key: Some("k".into()),
            gemini_base_url: format!("http://{}", addr),
            http_timeout: Duration::from_millis(300),
            ..Settings::default()
        };
        let client = GeminiClient::from_settings(&settings).unwrap();

        let started = std::time::Instant::now();
        let outcome =
            tokio::time::timeout(Duration::from_secs(5), client.generate(request_with_tools()))
                .await
                .expect("client timeout should fire before the guard");
        assert!(outcome.is_err());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = Settings::default();
        let err = GeminiClient::from_settings(&settings).err().unwrap();
        assert_eq!(err.to_string(), "GEMINI_API_KEY is missing in environment.");
    }
}

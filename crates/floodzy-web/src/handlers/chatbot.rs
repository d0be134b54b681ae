//! Chatbot Handlers

use anyhow::anyhow;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use floodzy_core::ConversationTurn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const STATUS_MESSAGE: &str = "Chatbot API (Flash) is running OK";

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

/// POST /chatbot - answer one question
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatbotRequest>, JsonRejection>,
) -> Result<Json<ChatbotResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    answer(state, body)
        .instrument(info_span!("chatbot", %request_id))
        .await
}

async fn answer(
    state: Arc<AppState>,
    body: Result<Json<ChatbotRequest>, JsonRejection>,
) -> Result<Json<ChatbotResponse>, ApiError> {
    // credentials are checked before the body is looked at
    let orchestrator = state
        .orchestrator
        .clone()
        .ok_or(ApiError::MissingCredentials)?;

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return Err(ApiError::QuestionRequired);
        }
    };

    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::QuestionRequired)?;

    info!(
        "Question: {} chars, {} history turn(s)",
        question.chars().count(),
        request.history.len()
    );

    let expose_stack = !state.settings.is_production();
    let deadline = state.settings.request_timeout;
    let answer = tokio::time::timeout(deadline, orchestrator.handle(question, request.history))
        .await
        .map_err(|_| {
            ApiError::internal(anyhow!("no answer within {:?}", deadline), expose_stack)
        })?
        .map_err(|e| ApiError::internal(e, expose_stack))?;

    info!("Answered with {} chars", answer.chars().count());
    Ok(Json(ChatbotResponse { answer }))
}

/// GET /chatbot - liveness check
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
    })
}

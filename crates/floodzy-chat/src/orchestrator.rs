//! Conversation Orchestrator
//!
//! One request is one run of a small state machine:
//!
//! ```text
//! AwaitingTurn1 ──text──────────────────────────────▶ Done
//!       │
//!       └─call──▶ Dispatching ──▶ AwaitingTurn2 ──▶ Done
//! ```
//!
//! Transitions are plain functions on [`ConversationState`] so each guard
//! can be tested without a provider.

use floodzy_core::{ConversationTurn, FunctionCallRequest, ToolResult};
use floodzy_llm::{BoxedProvider, ChatSession, ModelTurn, Part};
use floodzy_tools::{ToolDispatcher, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::composer::{technical_difficulty, ResponseComposer};
use crate::error::{ChatError, Result};
use crate::prompt::system_instruction;

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    AwaitingTurn1,
    Dispatching(FunctionCallRequest),
    AwaitingTurn2 {
        call: FunctionCallRequest,
        result: ToolResult,
    },
    Done(String),
}

impl ConversationState {
    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::AwaitingTurn1 => "awaiting_turn_1",
            ConversationState::Dispatching(_) => "dispatching",
            ConversationState::AwaitingTurn2 { .. } => "awaiting_turn_2",
            ConversationState::Done(_) => "done",
        }
    }

    /// A named function call wins over any text in the same reply
    pub fn after_first_turn(turn: &ModelTurn) -> Self {
        match turn.function_call() {
            Some(call) if !call.name.trim().is_empty() => {
                ConversationState::Dispatching(call.clone())
            }
            _ => ConversationState::Done(turn.text()),
        }
    }

    pub fn after_dispatch(call: FunctionCallRequest, result: ToolResult) -> Self {
        ConversationState::AwaitingTurn2 { call, result }
    }

    /// A failed second turn is answered from the tool's own error when there
    /// was one, otherwise from the outermost line of the model failure.
    pub fn after_second_turn(result: &ToolResult, outcome: anyhow::Result<ModelTurn>) -> Self {
        match outcome {
            Ok(turn) => ConversationState::Done(turn.text()),
            Err(e) => {
                let detail = match result.error_message() {
                    Some(message) => message.to_string(),
                    None => e.to_string(),
                };
                warn!("Second model turn failed: {:#}", e);
                ConversationState::Done(technical_difficulty(&detail))
            }
        }
    }
}

pub struct ConversationOrchestrator {
    provider: BoxedProvider,
    model: String,
    system_instruction: String,
    dispatcher: Arc<ToolDispatcher>,
    composer: ResponseComposer,
}

impl ConversationOrchestrator {
    pub fn new(
        provider: BoxedProvider,
        model: impl Into<String>,
        dispatcher: Arc<ToolDispatcher>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_instruction: system_instruction(),
            dispatcher,
            composer: ResponseComposer::default(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_composer(mut self, composer: ResponseComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer one question. The returned text is never empty.
    pub async fn handle(&self, question: &str, history: Vec<ConversationTurn>) -> Result<String> {
        let mut session = ChatSession::start(
            self.provider.clone(),
            self.model.clone(),
            self.system_instruction.clone(),
            ToolRegistry::list().to_vec(),
            history,
        );

        let mut state = ConversationState::AwaitingTurn1;
        loop {
            debug!("Conversation state: {}", state.name());
            state = match state {
                ConversationState::AwaitingTurn1 => {
                    let turn = session
                        .send(vec![Part::text(question)])
                        .await
                        .map_err(ChatError::Model)?;
                    ConversationState::after_first_turn(&turn)
                }
                ConversationState::Dispatching(call) => {
                    info!("Model requested {}", call.name);
                    let result = self.dispatcher.invoke(&call).await;
                    ConversationState::after_dispatch(call, result)
                }
                ConversationState::AwaitingTurn2 { call, result } => {
                    let response = Part::function_response(
                        call.name.clone(),
                        result.to_response_payload(),
                    );
                    let outcome = session.send(vec![response]).await;
                    ConversationState::after_second_turn(&result, outcome)
                }
                ConversationState::Done(text) => return Ok(self.composer.finalize(&text)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    fn weather_call() -> FunctionCallRequest {
        FunctionCallRequest::new("fetchWeatherData").with_arg("locationName", "Bandung")
    }

    #[test]
    fn test_text_reply_is_final() {
        let state = ConversationState::after_first_turn(&ModelTurn::from_text("Halo!"));
        assert_eq!(state, ConversationState::Done("Halo!".into()));
    }

    #[test]
    fn test_call_takes_priority_over_text() {
        let turn = ModelTurn::from_parts(vec![
            Part::text("Sebentar, saya cek dulu."),
            Part::FunctionCall(weather_call()),
        ]);
        assert_eq!(
            ConversationState::after_first_turn(&turn),
            ConversationState::Dispatching(weather_call())
        );
    }

    #[test]
    fn test_unnamed_call_is_a_direct_answer() {
        let turn = ModelTurn::from_parts(vec![
            Part::text("Jawaban langsung."),
            Part::FunctionCall(FunctionCallRequest::new("  ")),
        ]);
        assert_eq!(
            ConversationState::after_first_turn(&turn),
            ConversationState::Done("Jawaban langsung.".into())
        );
    }

    #[test]
    fn test_second_turn_failure_prefers_tool_error() {
        let result = ToolResult::err("Data status pompa mengembalikan status 502");
        let state = ConversationState::after_second_turn(&result, Err(anyhow!("quota exceeded")));
        assert_eq!(
            state,
            ConversationState::Done(
                "Maaf, saya mengalami kesulitan teknis saat memproses data. \
                 (Data status pompa mengembalikan status 502)"
                    .into()
            )
        );
    }

    #[test]
    fn test_second_turn_failure_after_success_uses_model_error() {
        let result = ToolResult::Ok(json!({"main": {"temp": 27}}));
        let state = ConversationState::after_second_turn(&result, Err(anyhow!("quota exceeded")));
        match state {
            ConversationState::Done(text) => assert!(text.ends_with("(quota exceeded)")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_second_turn_failure_omits_upstream_detail() {
        let result = ToolResult::Ok(json!({"main": {"temp": 27}}));
        let failure = anyhow!("{{\"error\": {{\"message\": \"API key expired\"}}}}")
            .context("Gemini API error 400 Bad Request");
        let state = ConversationState::after_second_turn(&result, Err(failure));
        assert_eq!(
            state,
            ConversationState::Done(
                "Maaf, saya mengalami kesulitan teknis saat memproses data. \
                 (Gemini API error 400 Bad Request)"
                    .into()
            )
        );
    }

    #[test]
    fn test_dispatch_moves_to_second_turn() {
        let result = ToolResult::Ok(json!({}));
        let state = ConversationState::after_dispatch(weather_call(), result.clone());
        assert_eq!(state.name(), "awaiting_turn_2");
        assert_eq!(
            state,
            ConversationState::AwaitingTurn2 {
                call: weather_call(),
                result
            }
        );
    }
}

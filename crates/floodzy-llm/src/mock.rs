//! Mock provider for testing.
//!
//! [`MockProvider`] is a queue-based fake: every `generate` call pops the
//! next queued reply (or error) and records the request it was given, so
//! tests can assert on call counts and on exactly what the model saw.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use floodzy_core::FunctionCallRequest;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::provider::{GenerateRequest, LlmProvider, ModelTurn, ProviderType};

#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<VecDeque<std::result::Result<ModelTurn, String>>>,
    calls: Mutex<Vec<GenerateRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_response(&self, turn: ModelTurn) -> &Self {
        self.lock_responses().push_back(Ok(turn));
        self
    }

    pub fn queue_text(&self, text: impl Into<String>) -> &Self {
        self.queue_response(ModelTurn::from_text(text))
    }

    pub fn queue_function_call(&self, call: FunctionCallRequest) -> &Self {
        self.queue_response(ModelTurn::from_function_call(call))
    }

    /// Queue a transport-level failure
    pub fn queue_error(&self, message: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Err(message.into()));
        self
    }

    pub fn recorded_calls(&self) -> Vec<GenerateRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<std::result::Result<ModelTurn, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Mock
    }

    async fn generate(&self, request: GenerateRequest) -> Result<ModelTurn> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        match self.lock_responses().pop_front() {
            Some(Ok(turn)) => Ok(turn),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("MockProvider: no queued responses")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "m".into(),
            system_instruction: None,
            tools: vec![],
            contents: vec![],
        }
    }

    #[tokio::test]
    async fn test_pops_in_order_and_records() {
        let mock = MockProvider::new();
        mock.queue_text("satu").queue_error("dua");

        assert_eq!(mock.generate(request()).await.unwrap().text(), "satu");
        assert_eq!(mock.generate(request()).await.unwrap_err().to_string(), "dua");
        assert!(mock.generate(request()).await.is_err());
        assert_eq!(mock.call_count(), 3);
    }
}

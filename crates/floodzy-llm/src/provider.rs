//! LLM Provider Traits and Types
//!
//! This module defines the common interface for function-calling providers.
//! A provider receives the full conversation on every call and answers with
//! one model turn, which may carry text, a function call, or both.

use anyhow::Result;
use async_trait::async_trait;
use floodzy_core::{ConversationTurn, FunctionCallRequest, Role, ToolDeclaration};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Gemini,
    Mock,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::Mock => write!(f, "mock"),
        }
    }
}

/// One piece of a conversation turn
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCallRequest),
    FunctionResponse { name: String, response: Value },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        Part::FunctionResponse {
            name: name.into(),
            response,
        }
    }
}

/// A turn in provider-native shape
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Model,
            parts,
        }
    }

    /// Whether this turn carries a function result back to the model
    pub fn is_function_response(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::FunctionResponse { .. }))
    }
}

impl From<ConversationTurn> for Content {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            role: turn.role,
            parts: vec![Part::Text(turn.content)],
        }
    }
}

/// Full generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub tools: Vec<ToolDeclaration>,
    pub contents: Vec<Content>,
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One reply from the model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTurn {
    pub content: Content,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ModelTurn {
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            content: Content::model(parts),
            finish_reason: None,
            usage: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::Text(text.into())])
    }

    pub fn from_function_call(call: FunctionCallRequest) -> Self {
        Self::from_parts(vec![Part::FunctionCall(call)])
    }

    /// Concatenated text parts (may be empty)
    pub fn text(&self) -> String {
        self.content
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First function-call part, if any
    pub fn function_call(&self) -> Option<&FunctionCallRequest> {
        self.content.parts.iter().find_map(|p| match p {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }
}

/// Shared provider handle, owned by the caller for the process lifetime
pub type BoxedProvider = Arc<dyn LlmProvider>;

/// LLM Provider trait
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get provider type
    fn provider_type(&self) -> ProviderType;

    /// Generate one model turn for the given conversation.
    ///
    /// Implementations MUST:
    /// 1. Pass the tool declarations to the API
    /// 2. Parse function calls from the response into `Part::FunctionCall`
    /// 3. Make a single attempt (no retries)
    async fn generate(&self, request: GenerateRequest) -> Result<ModelTurn>;
}

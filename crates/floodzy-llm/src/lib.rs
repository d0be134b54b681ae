//! floodzy-llm: LLM Integration
//!
//! ## Supported Providers & Endpoints
//!
//! | Provider | Base URL | Auth Method |
//! |----------|----------|-------------|
//! | Gemini | `https://generativelanguage.googleapis.com/v1beta` | `?key={API_KEY}` |
//!
//! ## Environment Variables
//!
//! ```bash
//! GEMINI_API_KEY=xxx           # Google Gemini
//! GEMINI_MODEL=gemini-1.5-flash
//! ```
//!
//! A conversation is driven through [`ChatSession`], which plays the role of
//! `startConversation(...)` / `send(...)` on top of any [`LlmProvider`].

pub mod chat;
pub mod gemini;
pub mod mock;
pub mod provider;

pub use chat::ChatSession;
pub use gemini::GeminiClient;
pub use mock::MockProvider;
pub use provider::{
    BoxedProvider, Content, GenerateRequest, LlmProvider, ModelTurn, Part, ProviderType, TokenUsage,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::chat::ChatSession;
    pub use super::gemini::GeminiClient;
    pub use super::provider::{
        BoxedProvider, Content, GenerateRequest, LlmProvider, ModelTurn, Part, ProviderType,
    };
}

//! floodzy-chat: Conversation orchestration for Floodzy
//!
//! Turns a user question into a grounded answer: one model turn, at most one
//! tool call, and a second model turn to narrate the tool's result.

pub mod composer;
pub mod error;
pub mod orchestrator;
pub mod prompt;

// Re-export main types
pub use composer::ResponseComposer;
pub use error::ChatError;
pub use orchestrator::{ConversationOrchestrator, ConversationState};
pub use prompt::system_instruction;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{ChatError, ConversationOrchestrator, ResponseComposer};
}

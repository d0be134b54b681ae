//! Chat Session - one conversation against a provider
//!
//! `ChatSession::start` corresponds to `startConversation(systemInstruction,
//! tools, history)` and `send` to `send(turnContent)`. The session lives for a
//! single request; nothing here is shared or persisted.

use anyhow::Result;
use floodzy_core::{ConversationTurn, ToolDeclaration};
use tracing::debug;

use crate::provider::{BoxedProvider, Content, GenerateRequest, ModelTurn, Part};

pub struct ChatSession {
    provider: BoxedProvider,
    model: String,
    system_instruction: String,
    tools: Vec<ToolDeclaration>,
    contents: Vec<Content>,
}

impl ChatSession {
    /// Start a conversation seeded with caller-supplied history
    pub fn start(
        provider: BoxedProvider,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        tools: Vec<ToolDeclaration>,
        history: Vec<ConversationTurn>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_instruction: system_instruction.into(),
            tools,
            contents: history.into_iter().map(Content::from).collect(),
        }
    }

    /// Send one user-side turn and return the model's reply.
    ///
    /// The sent turn and the reply are appended only when the exchange
    /// succeeds, so a failed send leaves the history untouched.
    pub async fn send(&mut self, parts: Vec<Part>) -> Result<ModelTurn> {
        let outgoing = Content::user(parts);
        let mut contents = self.contents.clone();
        contents.push(outgoing.clone());

        let request = GenerateRequest {
            model: self.model.clone(),
            system_instruction: Some(self.system_instruction.clone()),
            tools: self.tools.clone(),
            contents,
        };

        debug!(
            "Sending turn #{} via {}",
            self.contents.len() + 1,
            self.provider.provider_type()
        );
        let reply = self.provider.generate(request).await?;

        self.contents.push(outgoing);
        self.contents.push(reply.content.clone());
        Ok(reply)
    }

    /// Conversation so far (history + exchanged turns)
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }
}

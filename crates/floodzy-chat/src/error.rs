//! Orchestration errors
//!
//! Tool failures never show up here; they are fed back to the model as
//! data. Only failures that leave no answer to give reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The first model turn could not be completed
    #[error("model request failed: {0:#}")]
    Model(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_keeps_chain() {
        let inner = anyhow::anyhow!("connection reset").context("Gemini API request failed");
        let err = ChatError::Model(inner);
        assert_eq!(
            err.to_string(),
            "model request failed: Gemini API request failed: connection reset"
        );
    }
}

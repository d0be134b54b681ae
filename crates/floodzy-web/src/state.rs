//! Application State

use floodzy_chat::ConversationOrchestrator;
use floodzy_core::Settings;
use floodzy_llm::GeminiClient;
use floodzy_tools::{DataSources, ToolDispatcher};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    /// `None` when the model credentials are not configured
    pub orchestrator: Option<Arc<ConversationOrchestrator>>,
}

impl AppState {
    /// Build the live collaborators from settings.
    ///
    /// Missing model credentials are not fatal at startup; every chat request
    /// will answer with a configuration error instead.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let orchestrator = if settings.gemini_api_key.is_some() {
            let client = GeminiClient::from_settings(&settings)?;
            let sources = DataSources::from_settings(&settings)?;
            let dispatcher = Arc::new(ToolDispatcher::new(sources));
            info!("LLM provider: gemini ({})", settings.gemini_model);
            Some(Arc::new(ConversationOrchestrator::new(
                Arc::new(client),
                settings.gemini_model.clone(),
                dispatcher,
            )))
        } else {
            warn!("Chatbot disabled: GEMINI_API_KEY is missing in environment.");
            None
        };

        if settings.open_weather_api_key.is_none() {
            warn!("OPEN_WEATHER_API_KEY not set; weather lookups will fail");
        }

        Ok(Self::from_parts(settings, orchestrator))
    }

    pub fn from_parts(
        settings: Settings,
        orchestrator: Option<Arc<ConversationOrchestrator>>,
    ) -> Self {
        Self {
            settings,
            orchestrator,
        }
    }
}

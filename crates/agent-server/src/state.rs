//! Application State

use std::sync::Arc;

use agent_core::{AgentConfig, LlmProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Base configuration; request overrides are applied to a copy
    pub config: Arc<AgentConfig>,

    /// Client for `config.provider`, created once at startup
    pub provider: Arc<dyn LlmProvider>,
}

impl AppState {
    pub fn new(config: AgentConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

//! Client factory
//!
//! Turns an [`AgentConfig`] into a ready LLM client. Keys come from the
//! config's [`Credentials`](agent_core::Credentials); nothing here reads the
//! process environment.

use std::sync::Arc;

use agent_core::{
    config::{AgentConfig, Provider},
    error::{AgentError, Result},
    provider::LlmProvider,
    Agent,
};

/// Create the LLM client selected by `config.provider`
///
/// Fails with [`AgentError::Auth`] when the provider's key is missing, so a
/// misconfigured agent is rejected before its first request.
pub fn create_client(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider = config.provider;
    let api_key = config
        .credentials
        .key_for(provider)
        .ok_or_else(|| AgentError::Auth(format!("{} is not set", provider.api_key_var())))?;

    tracing::info!(provider = %provider, model = %config.model, "Creating LLM client");

    match provider {
        #[cfg(feature = "openai")]
        Provider::OpenAi => Ok(Arc::new(crate::openai::OpenAiProvider::new(api_key)?)),
        #[cfg(feature = "anthropic")]
        Provider::Anthropic => Ok(Arc::new(crate::anthropic::AnthropicProvider::new(api_key)?)),
        #[allow(unreachable_patterns)]
        other => {
            let _ = api_key;
            Err(AgentError::Config(format!(
                "agent-runtime was built without the `{other}` feature"
            )))
        }
    }
}

/// Create the client for `config` and bind it to a new agent with the default tools
pub fn build_agent(config: AgentConfig) -> Result<Agent> {
    let client = create_client(&config)?;
    Ok(Agent::new(config, client))
}

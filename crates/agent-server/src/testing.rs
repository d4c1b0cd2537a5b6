//! Provider stub for the handler and routing tests.

use std::sync::Arc;

use agent_core::{
    AgentConfig, AgentError, Completion, GenerationOptions, LlmProvider, Message, Result,
};
use async_trait::async_trait;

use crate::state::AppState;

/// Provider that returns the same final answer to every request, or always fails
#[derive(Clone, Debug)]
pub struct StubProvider {
    answer: Option<String>,
}

impl StubProvider {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { answer: None })
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(
        &self,
        _messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let answer = self
            .answer
            .as_ref()
            .ok_or_else(|| AgentError::ProviderUnavailable("stub is down".into()))?;
        Ok(Completion::text(
            &options.model,
            format!(" I now know the final answer\nFinal Answer: {answer}"),
        ))
    }
}

pub fn state_with(provider: Arc<StubProvider>) -> AppState {
    AppState::new(AgentConfig::default(), provider)
}

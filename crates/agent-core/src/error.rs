//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Model output did not follow the reasoning format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Prompt template missing from the prompt hub
    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed or credentials missing
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::RateLimited(_) | Self::Io(_)
        )
    }

    /// Stable machine-readable code for API responses
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            Self::ToolNotFound(_) => "TOOL_NOT_FOUND",
            Self::ToolExecution(_) => "TOOL_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::PromptNotFound(_) => "PROMPT_NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Io(_) => "AGENT_ERROR",
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => "The AI service is currently unavailable. Please try again.".into(),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolExecution(msg) => format!("Tool error: {msg}"),
            Self::Parse(_) => "The AI service returned a response that could not be understood.".into(),
            Self::PromptNotFound(name) => format!("The prompt '{name}' could not be loaded."),
            Self::Config(msg) => format!("The agent is misconfigured: {msg}"),
            Self::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            Self::Auth(_) => "Authentication failed. Please check your credentials.".into(),
            Self::Io(_) => "An unexpected error occurred.".into(),
        }
    }
}

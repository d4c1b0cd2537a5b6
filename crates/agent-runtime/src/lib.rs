//! # agent-runtime
//!
//! Concrete LLM clients for the ReAct agent and the factory that picks one
//! from an [`AgentConfig`].
//!
//! ## Providers
//!
//! - **OpenAI** (`openai` feature): Chat Completions API
//! - **Anthropic** (`anthropic` feature): Messages API
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{build_agent, AgentConfig, Credentials};
//!
//! let config = AgentConfig::default().with_credentials(Credentials::from_env());
//! let agent = build_agent(config)?;
//! let answer = agent.run("What is 2 + 2?").await?;
//! ```

mod http;

#[cfg(feature = "anthropic")]
pub mod anthropic;
pub mod factory;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;
pub use factory::{build_agent, create_client};
#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentConfig, AgentError, Credentials, LlmProvider, Message, ModelChoice, Provider,
    Result, Role, StrategyKind, Tool, ToolRegistry,
};

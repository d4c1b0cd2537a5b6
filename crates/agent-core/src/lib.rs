//! # agent-core
//!
//! Configurable ReAct agent with a provider-agnostic LLM abstraction, an
//! append-only tool registry and a pluggable reasoning engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Agent                              │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tool     │  │    LlmProvider      │  │
//! │  │   Engine    │──│  Registry   │──│    (Strategy)       │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │         ▲                                                   │
//! │  ┌──────┴──────┐  ┌─────────────┐                           │
//! │  │  Strategy   │  │ Prompt Hub  │                           │
//! │  └─────────────┘  └─────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concrete OpenAI and Anthropic providers live in `agent-runtime`; this
//! crate only defines the [`LlmProvider`] interface.

pub mod agent;
pub mod builtin;
pub mod calc;
pub mod config;
pub mod error;
pub mod executor;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod strategy;
pub mod tool;

#[cfg(test)]
mod testing;

pub use agent::{Agent, AgentBuilder};
pub use config::{AgentConfig, Credentials, ModelChoice, Provider, StrategyKind};
pub use error::{AgentError, Result};
pub use executor::{Invocation, Outcome, ReActEngine, ReasoningEngine, Thought, ThoughtKind};
pub use message::{Message, Role};
pub use prompt::{BundledPrompts, PromptHub, PromptTemplate};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use strategy::{PlanExecute, ReAct, Solution, Strategy};
pub use tool::{FnTool, Tool, ToolCall, ToolRegistry, ToolResult};

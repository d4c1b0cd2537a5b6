//! Agent Configuration
//!
//! Model selection, provider choice and credentials for an [`Agent`](crate::Agent).
//!
//! Configuration is plain data. Nothing here checks that the chosen provider
//! actually serves the chosen model; an incompatible pair surfaces as a
//! provider error on the first completion request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::provider::GenerationOptions;

/// Name of the ReAct template served by [`BundledPrompts`](crate::prompt::BundledPrompts)
pub const DEFAULT_PROMPT: &str = "hwchase17/react";

/// Supported LLM models
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelChoice {
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[default]
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-sonnet-20240229")]
    Claude3Sonnet,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
}

impl ModelChoice {
    pub const ALL: [Self; 6] = [
        Self::Gpt4,
        Self::Gpt4Turbo,
        Self::Gpt35Turbo,
        Self::Claude3Opus,
        Self::Claude3Sonnet,
        Self::Claude3Haiku,
    ];

    /// Model identifier as sent to the provider API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gpt4 => "gpt-4",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Claude3Opus => "claude-3-opus-20240229",
            Self::Claude3Sonnet => "claude-3-sonnet-20240229",
            Self::Claude3Haiku => "claude-3-haiku-20240307",
        }
    }

    /// Provider that publishes this model. Informational only.
    pub const fn vendor(self) -> Provider {
        match self {
            Self::Gpt4 | Self::Gpt4Turbo | Self::Gpt35Turbo => Provider::OpenAi,
            Self::Claude3Opus | Self::Claude3Sonnet | Self::Claude3Haiku => Provider::Anthropic,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelChoice {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AgentError::Config(format!("Unknown model: {s}")))
    }
}

/// Chat-completion provider
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's API key
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(AgentError::Config(format!("Unknown provider: {other}"))),
        }
    }
}

/// API keys, resolved once by the caller and carried in [`AgentConfig`]
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
}

impl Credentials {
    /// Read `OPENAI_API_KEY` and `ANTHROPIC_API_KEY` from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve keys through an arbitrary lookup (environment, secret store, test map)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |provider: Provider| {
            lookup(provider.api_key_var()).filter(|key| !key.trim().is_empty())
        };
        Self {
            openai_api_key: read(Provider::OpenAi),
            anthropic_api_key: read(Provider::Anthropic),
        }
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    pub fn with_anthropic_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    /// Key for the given provider, if one was resolved
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .finish()
    }
}

/// How an agent turns a task into an answer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Single pass through the reasoning engine
    #[default]
    Direct,
    /// Reasoning engine, exposing the ReAct trace
    React,
    /// Fixed plan, each step run through the reasoning engine in order
    PlanExecute,
}

impl StrategyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::React => "react",
            Self::PlanExecute => "plan_execute",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "react" => Ok(Self::React),
            "plan_execute" | "plan-execute" => Ok(Self::PlanExecute),
            other => Err(AgentError::Config(format!("Unknown strategy: {other}"))),
        }
    }
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Model to request from the provider
    pub model: ModelChoice,

    /// Sampling temperature (commonly 0.0 - 2.0)
    pub temperature: f32,

    /// Maximum tokens the model may generate per completion
    pub max_tokens: u32,

    /// Which chat-completion API to call
    pub provider: Provider,

    /// API keys for the providers
    pub credentials: Credentials,

    /// Strategy used by [`Agent::solve`](crate::Agent::solve)
    pub strategy: StrategyKind,

    /// Name of the reasoning prompt pulled from the prompt hub on every run
    pub prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            temperature: 0.7,
            max_tokens: 4096,
            provider: Provider::default(),
            credentials: Credentials::default(),
            strategy: StrategyKind::default(),
            prompt: DEFAULT_PROMPT.into(),
            max_iterations: 15,
        }
    }
}

impl AgentConfig {
    /// Build from `AGENT_*` environment variables layered over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    ///
    /// Recognised keys: `AGENT_MODEL`, `AGENT_PROVIDER`, `AGENT_TEMPERATURE`,
    /// `AGENT_MAX_TOKENS`, `AGENT_STRATEGY`, `AGENT_PROMPT`,
    /// `AGENT_MAX_ITERATIONS`, plus the provider API key variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            credentials: Credentials::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(model) = parse_var(&lookup, "AGENT_MODEL")? {
            config.model = model;
        }
        if let Some(provider) = parse_var(&lookup, "AGENT_PROVIDER")? {
            config.provider = provider;
        }
        if let Some(temperature) = parse_var(&lookup, "AGENT_TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = parse_var(&lookup, "AGENT_MAX_TOKENS")? {
            config.max_tokens = max_tokens;
        }
        if let Some(strategy) = parse_var(&lookup, "AGENT_STRATEGY")? {
            config.strategy = strategy;
        }
        if let Some(max_iterations) = parse_var(&lookup, "AGENT_MAX_ITERATIONS")? {
            config.max_iterations = max_iterations;
        }
        if let Some(prompt) = lookup("AGENT_PROMPT").filter(|p| !p.trim().is_empty()) {
            config.prompt = prompt;
        }

        Ok(config)
    }

    pub const fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    pub const fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub const fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Generation parameters for the provider
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.as_str().into(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop_sequences: Vec::new(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AgentError::Config(format!("{key}: {e}"))),
        _ => Ok(None),
    }
}

//! Agent
//!
//! An [`Agent`] binds one LLM client, an ordered tool registry and a
//! reasoning engine. The client is created once and held for the agent's
//! lifetime; every run gets fresh engine state and re-pulls its prompt.

use std::sync::Arc;

use crate::builtin::default_tools;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::executor::{Invocation, Outcome, ReActEngine, ReasoningEngine};
use crate::prompt::{BundledPrompts, PromptHub};
use crate::provider::LlmProvider;
use crate::strategy::{self, Solution, Strategy};
use crate::tool::{Tool, ToolRegistry};

/// The main Agent struct
pub struct Agent {
    config: AgentConfig,
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    engine: Arc<dyn ReasoningEngine>,
    prompts: Arc<dyn PromptHub>,
    strategy: Arc<dyn Strategy>,
}

impl Agent {
    /// Create an agent with the default tools, ReAct engine and bundled prompts
    pub fn new(config: AgentConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            strategy: strategy::for_kind(config.strategy),
            config,
            provider,
            tools: default_tools(),
            engine: Arc::new(ReActEngine),
            prompts: Arc::new(BundledPrompts::new()),
        }
    }

    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Append a tool. Tools are never removed and names are not deduplicated.
    pub fn add_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.register(tool);
    }

    pub fn add_tool_arc(&mut self, tool: Arc<dyn Tool>) {
        self.tools.register_arc(tool);
    }

    /// Get the tool registry
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// LLM client bound at construction
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Run a task through the reasoning engine and return its final answer
    pub async fn run(&self, task: &str) -> Result<String> {
        self.invoke_with(task, true).await.map(|outcome| outcome.output)
    }

    /// Blocking variant of [`run`](Self::run)
    ///
    /// Drives the run on a private current-thread runtime. Calling this from
    /// inside a tokio runtime is an error; await [`run`](Self::run) there.
    pub fn run_sync(&self, task: &str) -> Result<String> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(AgentError::Config(
                "run_sync cannot block inside an async runtime; await run instead".into(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async {
            self.invoke_with(task, false)
                .await
                .map(|outcome| outcome.output)
        })
    }

    /// Like [`run`](Self::run), returning the full trace
    pub async fn invoke(&self, task: &str) -> Result<Outcome> {
        self.invoke_with(task, true).await
    }

    /// Solve a task with the configured strategy
    pub async fn solve(&self, task: &str) -> Result<Solution> {
        self.strategy.solve(self, task).await
    }

    async fn invoke_with(&self, task: &str, verbose: bool) -> Result<Outcome> {
        let prompt = self.prompts.pull(&self.config.prompt).await?;
        let options = self.config.generation_options();

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.config.model,
            tools = self.tools.len(),
            "Starting agent run"
        );

        self.engine
            .invoke(Invocation {
                client: self.provider.as_ref(),
                tools: &self.tools,
                prompt: &prompt,
                task,
                options: &options,
                max_iterations: self.config.max_iterations,
                verbose,
            })
            .await
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .field("tools", &self.tools)
            .field("strategy", &self.strategy.kind())
            .finish_non_exhaustive()
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    config: AgentConfig,
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    engine: Arc<dyn ReasoningEngine>,
    prompts: Arc<dyn PromptHub>,
    strategy: Option<Arc<dyn Strategy>>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            provider: None,
            tools: default_tools(),
            engine: Arc::new(ReActEngine),
            prompts: Arc::new(BundledPrompts::new()),
            strategy: None,
        }
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Append a tool after the defaults
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn ReasoningEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn prompts(mut self, prompts: Arc<dyn PromptHub>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Override the strategy selected by `config.strategy`
    pub fn strategy(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent {
            strategy: self
                .strategy
                .unwrap_or_else(|| strategy::for_kind(self.config.strategy)),
            config: self.config,
            provider,
            tools: self.tools,
            engine: self.engine,
            prompts: self.prompts,
        })
    }
}

//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::executor::{Invocation, Outcome, ReasoningEngine};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};

/// Provider that replays canned replies and records what it was asked
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
    options: Mutex<Vec<GenerationOptions>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn repeating(reply: &str) -> Self {
        Self {
            repeat: Some(reply.to_string()),
            ..Self::default()
        }
    }

    /// Content of the last message of every request, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn options(&self) -> Vec<GenerationOptions> {
        self.options.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        self.options.lock().unwrap().push(options.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .ok_or_else(|| AgentError::ProviderUnavailable("script exhausted".into()))?;

        Ok(Completion::text(&options.model, reply))
    }
}

#[derive(Clone, Debug)]
struct Call {
    task: String,
    tools: usize,
    verbose: bool,
}

/// Engine that answers `echo: {task}` without calling the provider
#[derive(Clone, Default)]
pub struct EchoEngine {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl EchoEngine {
    pub fn tasks(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.task.clone()).collect()
    }

    pub fn tool_counts(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|c| c.tools).collect()
    }

    pub fn verbose_flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|c| c.verbose).collect()
    }
}

fn echo(task: &str) -> Outcome {
    Outcome {
        run_id: Uuid::new_v4(),
        output: format!("echo: {task}"),
        trace: Vec::new(),
        iterations: 1,
    }
}

#[async_trait]
impl ReasoningEngine for EchoEngine {
    async fn invoke(&self, invocation: Invocation<'_>) -> Result<Outcome> {
        self.calls.lock().unwrap().push(Call {
            task: invocation.task.to_string(),
            tools: invocation.tools.len(),
            verbose: invocation.verbose,
        });
        Ok(echo(invocation.task))
    }
}

/// Engine that echoes until its n-th call, which fails
#[derive(Clone)]
pub struct FailingEngine {
    fail_on: usize,
    calls: Arc<AtomicUsize>,
}

impl FailingEngine {
    pub fn on_call(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningEngine for FailingEngine {
    async fn invoke(&self, invocation: Invocation<'_>) -> Result<Outcome> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(AgentError::Provider(format!("step {call} failed")));
        }
        Ok(echo(invocation.task))
    }
}

/// Agent with an empty scripted provider and the given engine
pub fn agent_with_engine<E>(config: AgentConfig, engine: E) -> Agent
where
    E: ReasoningEngine + 'static,
{
    Agent::builder()
        .config(config)
        .provider(Arc::new(ScriptedProvider::new(Vec::<String>::new())))
        .engine(Arc::new(engine))
        .build()
        .unwrap()
}

//! Reasoning Engine
//!
//! The agent hands a task, its LLM client, its tools and a prompt template to
//! a [`ReasoningEngine`] and gets back the final answer plus a trace of the
//! steps taken. Engines are injected, so agent logic can be exercised with a
//! fake engine and no network.
//!
//! [`ReActEngine`] is the default: a text-protocol ReAct loop driven by the
//! `hwchase17/react` template.
//!
//! ```text
//!   render prompt ──► LLM ──► "Action: calculate / Action Input: 2+2"
//!        ▲                                │
//!        │                          run tool
//!        └──── scratchpad += reply + "Observation: 4"
//!                                         │
//!                         ... until "Final Answer: ..."
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::prompt::PromptTemplate;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry};

const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION_STOP: &str = "\nObservation:";

/// Placeholders a ReAct prompt must declare for the loop to make progress
const REQUIRED_VARIABLES: [&str; 2] = ["input", "agent_scratchpad"];

/// Output of a run that hit its iteration limit without a final answer
pub const ITERATION_LIMIT_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

/// Kind of a reasoning step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtKind {
    Thought,
    Action,
    Observation,
}

impl ThoughtKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thought => "thought",
            Self::Action => "action",
            Self::Observation => "observation",
        }
    }
}

/// One step of a reasoning trace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "type")]
    pub kind: ThoughtKind,
    pub content: String,
}

impl Thought {
    pub fn new(kind: ThoughtKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// Everything an engine needs for one run
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub client: &'a dyn LlmProvider,
    pub tools: &'a ToolRegistry,
    pub prompt: &'a PromptTemplate,
    pub task: &'a str,
    pub options: &'a GenerationOptions,
    pub max_iterations: usize,
    /// Log each step at `info` instead of `debug`
    pub verbose: bool,
}

/// Result of a completed run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outcome {
    pub run_id: Uuid,
    pub output: String,
    pub trace: Vec<Thought>,
    pub iterations: usize,
}

/// Runs a reasoning loop to completion
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn invoke(&self, invocation: Invocation<'_>) -> Result<Outcome>;
}

/// Text-protocol ReAct loop
#[derive(Clone, Copy, Debug, Default)]
pub struct ReActEngine;

#[async_trait]
impl ReasoningEngine for ReActEngine {
    async fn invoke(&self, invocation: Invocation<'_>) -> Result<Outcome> {
        let declared = invocation.prompt.variables();
        if let Some(missing) = REQUIRED_VARIABLES.iter().find(|v| !declared.contains(v)) {
            return Err(AgentError::Config(format!(
                "prompt `{}` has no {{{missing}}} placeholder",
                invocation.prompt.name
            )));
        }

        ReActRun::new(invocation).drive().await
    }
}

/// Parsed model reply
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Act { thought: String, call: ToolCall },
    Finish(String),
}

/// Per-call execution state; never shared between runs
struct ReActRun<'a> {
    inv: Invocation<'a>,
    run_id: Uuid,
    options: GenerationOptions,
    tools_section: String,
    tool_names: String,
    scratchpad: String,
    trace: Vec<Thought>,
}

impl<'a> ReActRun<'a> {
    fn new(inv: Invocation<'a>) -> Self {
        let mut options = inv.options.clone();
        if !options.stop_sequences.iter().any(|s| s == OBSERVATION_STOP) {
            options = options.with_stop(OBSERVATION_STOP);
        }

        Self {
            run_id: Uuid::new_v4(),
            options,
            tools_section: inv.tools.prompt_section(),
            tool_names: inv.tools.tool_names(),
            scratchpad: String::new(),
            trace: Vec::new(),
            inv,
        }
    }

    async fn drive(mut self) -> Result<Outcome> {
        self.log("task", self.inv.task);

        for iteration in 1..=self.inv.max_iterations {
            let prompt = self.inv.prompt.render(&[
                ("tools", &self.tools_section),
                ("tool_names", &self.tool_names),
                ("input", self.inv.task),
                ("agent_scratchpad", &self.scratchpad),
            ]);

            let completion = self
                .inv
                .client
                .complete(&[Message::user(prompt)], &self.options)
                .await?;
            let reply = completion.content;

            match parse_reply(&reply)? {
                Step::Finish(answer) => {
                    self.log("final answer", &answer);
                    return Ok(Outcome {
                        run_id: self.run_id,
                        output: answer,
                        trace: self.trace,
                        iterations: iteration,
                    });
                }
                Step::Act { thought, call } => {
                    let observation = self.act(thought, &call).await?;
                    self.scratchpad.push_str(&reply);
                    self.scratchpad.push_str("\nObservation: ");
                    self.scratchpad.push_str(&observation);
                    self.scratchpad.push_str("\nThought: ");
                }
            }
        }

        tracing::warn!(run_id = %self.run_id, max = self.inv.max_iterations, "Iteration limit reached");
        Ok(Outcome {
            run_id: self.run_id,
            output: ITERATION_LIMIT_OUTPUT.into(),
            trace: self.trace,
            iterations: self.inv.max_iterations,
        })
    }

    async fn act(&mut self, thought: String, call: &ToolCall) -> Result<String> {
        if !thought.is_empty() {
            self.log("thought", &thought);
            self.trace.push(Thought::new(ThoughtKind::Thought, thought));
        }

        let action = serde_json::json!({ "name": call.name, "input": call.input }).to_string();
        self.log("action", &action);
        self.trace.push(Thought::new(ThoughtKind::Action, action));

        let observation = match self.inv.tools.execute(call).await {
            Ok(result) => result.output,
            Err(AgentError::ToolNotFound(name)) => {
                tracing::warn!(run_id = %self.run_id, tool = %name, "Model requested unknown tool");
                format!("{name} is not a valid tool, try one of [{}].", self.tool_names)
            }
            Err(e) => return Err(e),
        };

        self.log("observation", &observation);
        self.trace.push(Thought::new(ThoughtKind::Observation, observation.clone()));
        Ok(observation)
    }

    fn log(&self, step: &str, content: &str) {
        if self.inv.verbose {
            tracing::info!(run_id = %self.run_id, step, "{content}");
        } else {
            tracing::debug!(run_id = %self.run_id, step, "{content}");
        }
    }
}

/// Split a model reply into either a tool call or a final answer
fn parse_reply(text: &str) -> Result<Step> {
    let action = parse_action(text);
    let final_answer = text.find(FINAL_ANSWER);

    match (action, final_answer) {
        (Some(_), Some(_)) => Err(AgentError::Parse(format!(
            "reply contains both a final answer and an action: `{text}`"
        ))),
        (Some((thought, call)), None) => Ok(Step::Act { thought, call }),
        (None, Some(idx)) => Ok(Step::Finish(text[idx + FINAL_ANSWER.len()..].trim().to_string())),
        (None, None) => Err(AgentError::Parse(format!("could not parse model output: `{text}`"))),
    }
}

fn parse_action(text: &str) -> Option<(String, ToolCall)> {
    let action_at = text.find(ACTION)?;
    let after_action = &text[action_at + ACTION.len()..];
    let input_at = after_action.find(ACTION_INPUT)?;

    let name = after_action[..input_at].trim();
    if name.is_empty() {
        return None;
    }

    let mut input = &after_action[input_at + ACTION_INPUT.len()..];
    if let Some(cut) = input.find(OBSERVATION_STOP) {
        input = &input[..cut];
    }
    let input = input.trim().trim_matches('"');

    let thought = text[..action_at].trim().to_string();
    let mut call = ToolCall::new(name, input);
    call.id = Some(Uuid::new_v4().to_string());
    Some((thought, call))
}

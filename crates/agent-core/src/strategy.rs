//! Agent Strategies
//!
//! A strategy decides how [`Agent::solve`] turns a task into an answer. The
//! agent picks one from [`StrategyKind`] in its configuration.
//!
//! `ReAct::think` and `PlanExecute::plan` are fixed illustrations: they ignore
//! what the task actually asks and always produce the same shape of output.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::config::StrategyKind;
use crate::error::Result;
use crate::executor::{Thought, ThoughtKind};

/// Final product of [`Agent::solve`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Solution {
    pub answer: String,

    /// Reasoning steps, when the strategy exposes them
    #[serde(default)]
    pub trace: Vec<Thought>,

    /// Per-step results, for plan-based strategies
    #[serde(default)]
    pub steps: Vec<StepResult>,
}

/// Pluggable task-solving behaviour
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn solve(&self, agent: &Agent, task: &str) -> Result<Solution>;
}

/// Strategy implementation for a configured kind
pub fn for_kind(kind: StrategyKind) -> Arc<dyn Strategy> {
    match kind {
        StrategyKind::Direct => Arc::new(Direct),
        StrategyKind::React => Arc::new(ReAct),
        StrategyKind::PlanExecute => Arc::new(PlanExecute),
    }
}

/// Single reasoning-engine run, answer plus the engine's trace
#[derive(Clone, Copy, Debug, Default)]
pub struct Direct;

#[async_trait]
impl Strategy for Direct {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Direct
    }

    async fn solve(&self, agent: &Agent, task: &str) -> Result<Solution> {
        let outcome = agent.invoke(task).await?;
        Ok(Solution {
            answer: outcome.output,
            trace: outcome.trace,
            ..Solution::default()
        })
    }
}

/// Output of [`ReAct::think`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub thoughts: Vec<Thought>,
    pub final_answer: String,
}

/// Reasoning engine answer together with its thought/action/observation trace
#[derive(Clone, Copy, Debug, Default)]
pub struct ReAct;

impl ReAct {
    /// Canned three-step reflection on a task
    pub fn think(&self, task: &str) -> Reflection {
        let action = serde_json::json!({ "name": "search", "input": task });
        let final_answer = format!("Found info about {task}");
        let observation = serde_json::json!({ "result": final_answer });

        Reflection {
            thoughts: vec![
                Thought::new(ThoughtKind::Thought, format!("Analyzing: {task}")),
                Thought::new(ThoughtKind::Action, action.to_string()),
                Thought::new(ThoughtKind::Observation, observation.to_string()),
            ],
            final_answer,
        }
    }
}

#[async_trait]
impl Strategy for ReAct {
    fn kind(&self) -> StrategyKind {
        StrategyKind::React
    }

    async fn solve(&self, agent: &Agent, task: &str) -> Result<Solution> {
        let outcome = agent.invoke(task).await?;
        Ok(Solution {
            answer: outcome.output,
            trace: outcome.trace,
            steps: Vec::new(),
        })
    }
}

/// One step of a plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step: u32,
    pub action: String,
    pub description: String,
}

impl PlanStep {
    fn new(step: u32, action: &str, description: impl Into<String>) -> Self {
        Self {
            step,
            action: action.into(),
            description: description.into(),
        }
    }
}

/// Result of running one plan step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: u32,
    pub result: String,
}

/// Output of [`PlanExecute::execute`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Execution {
    pub plan: Vec<PlanStep>,
    pub results: Vec<StepResult>,
    pub summary: String,
}

/// Fixed research / analyze / synthesize plan, each step run through the agent
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanExecute;

impl PlanExecute {
    /// Three-step plan; only the first step mentions the task
    pub fn plan(&self, task: &str) -> Vec<PlanStep> {
        vec![
            PlanStep::new(1, "research", format!("Research: {task}")),
            PlanStep::new(2, "analyze", "Analyze findings"),
            PlanStep::new(3, "synthesize", "Synthesize results"),
        ]
    }

    /// Run every step's description through [`Agent::run`], strictly in order
    ///
    /// The first failing step aborts the remaining ones.
    pub async fn execute(&self, agent: &Agent, plan: Vec<PlanStep>) -> Result<Execution> {
        let mut results = Vec::with_capacity(plan.len());

        for step in &plan {
            tracing::debug!(step = step.step, action = %step.action, "Executing plan step");
            let result = agent.run(&step.description).await?;
            results.push(StepResult {
                step: step.step,
                result,
            });
        }

        Ok(Execution {
            summary: format!("Completed {} steps", results.len()),
            plan,
            results,
        })
    }
}

#[async_trait]
impl Strategy for PlanExecute {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PlanExecute
    }

    async fn solve(&self, agent: &Agent, task: &str) -> Result<Solution> {
        let execution = self.execute(agent, self.plan(task)).await?;
        let answer = execution
            .results
            .last()
            .map_or_else(|| execution.summary.clone(), |r| r.result.clone());

        Ok(Solution {
            answer,
            trace: Vec::new(),
            steps: execution.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::error::AgentError;
    use crate::testing::{EchoEngine, FailingEngine, ScriptedProvider, agent_with_engine};

    #[test]
    fn test_think_shape() {
        let reflection = ReAct.think("quantum computing");
        let kinds: Vec<_> = reflection.thoughts.iter().map(|t| t.kind.as_str()).collect();

        assert_eq!(kinds, vec!["thought", "action", "observation"]);
        assert_eq!(reflection.thoughts[0].content, "Analyzing: quantum computing");
        assert_eq!(reflection.final_answer, "Found info about quantum computing");

        let action: serde_json::Value = serde_json::from_str(&reflection.thoughts[1].content).unwrap();
        assert_eq!(action, serde_json::json!({"name": "search", "input": "quantum computing"}));
    }

    #[test]
    fn test_plan_shape() {
        let plan = PlanExecute.plan("X");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(plan[0].description.contains('X'));
        assert_eq!(plan[1].description, "Analyze findings");
        assert_eq!(plan[2].action, "synthesize");
    }

    #[tokio::test]
    async fn test_execute_runs_steps_in_order() {
        let engine = EchoEngine::default();
        let agent = agent_with_engine(AgentConfig::default(), engine.clone());

        let plan = PlanExecute.plan("rust");
        let execution = PlanExecute.execute(&agent, plan.clone()).await.unwrap();

        assert_eq!(execution.results.len(), plan.len());
        assert_eq!(execution.summary, "Completed 3 steps");
        assert_eq!(execution.results[0].result, "echo: Research: rust");
        assert_eq!(execution.results[2].step, 3);
        assert_eq!(
            engine.tasks(),
            vec!["Research: rust", "Analyze findings", "Synthesize results"]
        );
    }

    #[tokio::test]
    async fn test_execute_empty_plan() {
        let agent = agent_with_engine(AgentConfig::default(), EchoEngine::default());
        let execution = PlanExecute.execute(&agent, Vec::new()).await.unwrap();
        assert!(execution.results.is_empty());
        assert_eq!(execution.summary, "Completed 0 steps");
    }

    #[tokio::test]
    async fn test_execute_aborts_on_failure() {
        let engine = FailingEngine::on_call(2);
        let agent = agent_with_engine(AgentConfig::default(), engine.clone());

        let err = PlanExecute
            .execute(&agent, PlanExecute.plan("t"))
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Provider(_)));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_plan_execute_solve_answers_with_last_step() {
        let agent = agent_with_engine(
            AgentConfig::default().with_strategy(StrategyKind::PlanExecute),
            EchoEngine::default(),
        );
        let solution = agent.solve("t").await.unwrap();
        assert_eq!(solution.answer, "echo: Synthesize results");
        assert_eq!(solution.steps.len(), 3);
    }

    #[tokio::test]
    async fn test_react_solve_exposes_trace() {
        let config = AgentConfig::default().with_strategy(StrategyKind::React);
        let provider = ScriptedProvider::new([
            "Action: get_weather\nAction Input: Oslo",
            "Final Answer: Sunny",
        ]);
        let agent = Agent::new(config, Arc::new(provider));

        let solution = agent.solve("Weather in Oslo?").await.unwrap();
        assert_eq!(solution.answer, "Sunny");
        assert_eq!(solution.trace.len(), 2);
        assert_eq!(solution.trace[1].content, "Weather in Oslo: Sunny, 72°F");
    }

    #[tokio::test]
    async fn test_direct_solve_keeps_trace() {
        let provider = ScriptedProvider::new([
            "Let me compute\nAction: calculate\nAction Input: 6*7",
            "Final Answer: 42",
        ]);
        let agent = Agent::new(AgentConfig::default(), Arc::new(provider));
        assert_eq!(agent.strategy().kind(), StrategyKind::Direct);

        let solution = agent.solve("What is 6 times 7?").await.unwrap();
        assert_eq!(solution.answer, "42");
        let kinds: Vec<_> = solution.trace.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["thought", "action", "observation"]);
        assert_eq!(solution.trace[2].content, "42");
        assert!(solution.steps.is_empty());
    }

    #[test]
    fn test_for_kind() {
        for kind in [StrategyKind::Direct, StrategyKind::React, StrategyKind::PlanExecute] {
            assert_eq!(for_kind(kind).kind(), kind);
        }
    }
}

//! Prompt Templates
//!
//! Reasoning prompts are looked up by name on every run through a
//! [`PromptHub`]. The bundled hub serves the classic ReAct template; other
//! hubs (remote registries, files) plug in behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::DEFAULT_PROMPT;
use crate::error::{AgentError, Result};

const REACT_TEMPLATE: &str = r"Answer the following questions as best you can. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {input}
Thought:{agent_scratchpad}";

/// A named template with `{variable}` placeholders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Substitute `{key}` placeholders in a single pass
    ///
    /// Substituted values are never rescanned, and placeholders without a
    /// matching variable are left untouched.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let key = &after[..close];
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| (*v, close))
            });

            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// Placeholder names appearing in the template, in order of first use
    pub fn variables(&self) -> Vec<&str> {
        let mut vars = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else { break };
            let key = &after[..close];
            if !key.is_empty()
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !vars.contains(&key)
            {
                vars.push(key);
            }
            rest = &after[close + 1..];
        }
        vars
    }
}

/// Source of named prompt templates
#[async_trait]
pub trait PromptHub: Send + Sync {
    /// Fetch a template by name
    async fn pull(&self, name: &str) -> Result<PromptTemplate>;
}

/// In-process prompt hub, preloaded with the ReAct template
#[derive(Clone, Debug)]
pub struct BundledPrompts {
    templates: HashMap<String, String>,
}

impl Default for BundledPrompts {
    fn default() -> Self {
        Self::new()
    }
}

impl BundledPrompts {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(DEFAULT_PROMPT.to_string(), REACT_TEMPLATE.to_string());
        Self { templates }
    }

    /// Add or replace a template
    pub fn with_template(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }
}

#[async_trait]
impl PromptHub for BundledPrompts {
    async fn pull(&self, name: &str) -> Result<PromptTemplate> {
        self.templates
            .get(name)
            .map(|template| PromptTemplate::new(name, template.clone()))
            .ok_or_else(|| AgentError::PromptNotFound(name.to_string()))
    }
}

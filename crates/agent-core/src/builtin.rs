//! Built-in Tools
//!
//! The three tools every agent starts with. `search` and `get_weather` are
//! placeholders that return synthetic text; swap in a real backend by
//! registering a different tool under the same role.

use async_trait::async_trait;

use crate::calc;
use crate::error::Result;
use crate::tool::{Tool, ToolRegistry};

/// Web search placeholder
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    async fn call(&self, query: &str) -> Result<String> {
        Ok(format!("Search results for: {query}"))
    }
}

/// Calculator tool - evaluates arithmetic expressions
///
/// Evaluation failures are reported in the output as `Error: ...` instead of
/// failing the tool call, so the model can read the problem and retry.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    /// Evaluate without going through the async tool interface
    pub fn calculate(expression: &str) -> String {
        match calc::evaluate(expression) {
            Ok(value) => calc::format_number(value),
            Err(e) => format!("Error: {e}"),
        }
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Calculate mathematical expressions"
    }

    async fn call(&self, expression: &str) -> Result<String> {
        Ok(Self::calculate(expression))
    }
}

/// Weather lookup placeholder
#[derive(Clone, Copy, Debug, Default)]
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get weather for a location"
    }

    async fn call(&self, location: &str) -> Result<String> {
        Ok(format!("Weather in {location}: Sunny, 72°F"))
    }
}

/// Registry holding `search`, `calculate` and `get_weather`, in that order
pub fn default_tools() -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(SearchTool);
    tools.register(CalculatorTool);
    tools.register(WeatherTool);
    tools
}

//! HTTP Handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use agent_core::{
    Agent, AgentError, ModelChoice, Provider, StrategyKind, Thought,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub time: String,
    pub provider: Provider,
    pub model: ModelChoice,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: ModelChoice,
    pub provider: Provider,
}

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub task: String,
    #[serde(default)]
    pub model: Option<ModelChoice>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub result: String,
    pub thoughts: Vec<Thought>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Agent failure rendered as a 500 with a user-facing message
#[derive(Debug)]
pub struct ApiError(AgentError);

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.0.user_message(),
                code: self.0.code().into(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        time: chrono::Utc::now().to_rfc3339(),
        provider: state.config.provider,
        model: state.config.model,
    })
}

/// Supported models and the provider serving each
pub async fn list_models() -> Json<Vec<ModelInfo>> {
    Json(
        ModelChoice::ALL
            .into_iter()
            .map(|id| ModelInfo {
                id,
                provider: id.vendor(),
            })
            .collect(),
    )
}

/// Solve a task with a per-request agent
pub async fn run_agent(
    State(state): State<AppState>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    let started = Instant::now();
    let agent = request_agent(&state, &payload)?;

    tracing::info!(
        model = %agent.config().model,
        strategy = agent.config().strategy.as_str(),
        "Agent request"
    );

    let solution = agent.solve(&payload.task).await.map_err(|e| {
        tracing::error!(error = %e, "Agent error");
        e
    })?;

    Ok(Json(AgentResponse {
        result: solution.answer,
        thoughts: solution.trace,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }))
}

/// Apply request overrides to the base config and bind a client
///
/// The shared client is reused when the request stays on the base provider;
/// a model from the other vendor gets its own client.
fn request_agent(state: &AppState, request: &AgentRequest) -> agent_core::Result<Agent> {
    let mut config = (*state.config).clone();
    if let Some(model) = request.model {
        config = config.with_model(model).with_provider(model.vendor());
    }
    if let Some(temperature) = request.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(strategy) = request.strategy {
        config = config.with_strategy(strategy);
    }

    let provider = if config.provider == state.config.provider {
        Arc::clone(&state.provider)
    } else {
        agent_runtime::create_client(&config)?
    };

    Ok(Agent::new(config, provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubProvider, state_with};

    fn request(task: &str) -> AgentRequest {
        AgentRequest {
            task: task.into(),
            model: None,
            temperature: None,
            strategy: None,
        }
    }

    #[tokio::test]
    async fn test_health_reports_base_config() {
        let state = state_with(StubProvider::answering("ok"));
        let Json(health) = health_check(State(state)).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.provider, Provider::OpenAi);
        assert_eq!(health.model, ModelChoice::Gpt4Turbo);
        assert!(chrono::DateTime::parse_from_rfc3339(&health.time).is_ok());
    }

    #[tokio::test]
    async fn test_list_models() {
        let Json(models) = list_models().await;
        assert_eq!(models.len(), ModelChoice::ALL.len());

        let value = serde_json::to_value(&models).unwrap();
        assert_eq!(value[0]["id"], "gpt-4");
        assert_eq!(value[0]["provider"], "openai");
        assert_eq!(value[5]["provider"], "anthropic");
    }

    #[tokio::test]
    async fn test_run_agent_returns_answer() {
        let state = state_with(StubProvider::answering("4"));
        let Json(response) = run_agent(State(state), Json(request("What is 2 + 2?")))
            .await
            .unwrap();

        assert_eq!(response.result, "4");
        assert!(response.thoughts.is_empty());
    }

    #[tokio::test]
    async fn test_request_overrides_apply() {
        let state = state_with(StubProvider::answering("done"));
        let mut req = request("t");
        req.model = Some(ModelChoice::Gpt4);
        req.temperature = Some(0.1);
        req.strategy = Some(StrategyKind::React);

        let agent = request_agent(&state, &req).unwrap();
        assert_eq!(agent.config().model, ModelChoice::Gpt4);
        assert_eq!(agent.strategy().kind(), StrategyKind::React);
        assert_eq!(agent.provider().name(), "stub");

        // the base config is untouched
        assert_eq!(state.config.model, ModelChoice::Gpt4Turbo);
    }

    #[tokio::test]
    async fn test_other_vendor_without_key_is_auth_error() {
        let state = state_with(StubProvider::answering("unused"));
        let mut req = request("t");
        req.model = Some(ModelChoice::Claude3Haiku);

        let err = run_agent(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.0.code(), "AUTH_ERROR");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_error_body() {
        let state = state_with(StubProvider::failing());
        let err = run_agent(State(state), Json(request("t"))).await.unwrap_err();

        assert_eq!(err.0.code(), "PROVIDER_UNAVAILABLE");
        assert!(err.0.user_message().contains("unavailable"));
    }
}

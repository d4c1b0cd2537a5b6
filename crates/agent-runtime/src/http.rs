//! Shared HTTP plumbing for the chat-completion providers.

use std::time::Duration;

use agent_core::error::{AgentError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Request timeout applied to provider clients
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Build the reqwest client used by a provider
pub fn client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))
}

/// Send a request and decode a JSON body, mapping failures onto `AgentError`
pub async fn send_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(|e| transport_error(provider, &e))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| transport_error(provider, &e))?;

    if !status.is_success() {
        tracing::warn!(provider, %status, "Provider request failed");
        return Err(status_error(provider, status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| AgentError::Provider(format!("{provider}: invalid response: {e}")))
}

fn transport_error(provider: &str, err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::ProviderUnavailable(format!("{provider}: {err}"))
    } else {
        AgentError::Provider(format!("{provider}: {err}"))
    }
}

/// Map a non-success status to the matching error variant
pub fn status_error(provider: &str, status: StatusCode, body: &str) -> AgentError {
    let detail = error_message(body).unwrap_or_else(|| body.trim().to_string());
    let msg = format!("{provider} returned {status}: {detail}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(msg),
        StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(msg),
        s if s.is_server_error() => AgentError::ProviderUnavailable(msg),
        _ => AgentError::Provider(msg),
    }
}

/// Both APIs wrap errors as `{"error": {"message": ...}}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"].as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error("openai", StatusCode::UNAUTHORIZED, ""),
            AgentError::Auth(_)
        ));
        assert!(matches!(
            status_error("openai", StatusCode::TOO_MANY_REQUESTS, ""),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            status_error("anthropic", StatusCode::from_u16(529).unwrap(), ""),
            AgentError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            status_error("anthropic", StatusCode::BAD_REQUEST, ""),
            AgentError::Provider(_)
        ));
    }

    #[test]
    fn test_error_message_extracted() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "model not found"}}"#;
        let err = status_error("anthropic", StatusCode::NOT_FOUND, body);
        assert!(err.to_string().ends_with("model not found"), "{err}");
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::dispatch::{error::DispatchError, request::ExecutionRequest};

pub const DEFAULT_EXECUTOR_ENDPOINT: &str = "http://localhost:8000/execute-action";

/// Reported when the executor says `success: false` without a message, or
/// answers with an unexpected shape.
pub const DEFAULT_FAILURE_MESSAGE: &str = "could not execute the action";

/// Result text shown when the executor cannot be reached.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to the server";

/// Something that performs element actions for real.
///
/// Implementations return the raw JSON response; interpreting its shape is
/// the dispatcher's job.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, DispatchError>;
}

// ============================================================================
// Response contract
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutorResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Map an executor response onto a result.
///
/// `Ok(Some(text))` is a result to show, `Ok(None)` a success without
/// result text. Any shape other than `{success, result?, message?}` counts
/// as an application failure.
pub fn interpret_response(value: Value) -> Result<Option<String>, DispatchError> {
    let response: ExecutorResponse = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "executor response has an unexpected shape");
            return Err(DispatchError::Application(DEFAULT_FAILURE_MESSAGE.to_string()));
        }
    };

    if response.success {
        Ok(response.result)
    } else {
        let message = response
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        Err(DispatchError::Application(message))
    }
}

/// Text placed in an element's result slot for a failed dispatch.
pub fn failure_text(error: &DispatchError) -> String {
    match error {
        DispatchError::Application(message) => format!("Error: {}", message),
        _ => CONNECTION_ERROR_MESSAGE.to_string(),
    }
}

// ============================================================================
// HTTP executor
// ============================================================================

pub struct HttpExecutor {
    pub endpoint: String,
    client: reqwest::Client,
}

impl Default for HttpExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTOR_ENDPOINT)
    }
}

impl HttpExecutor {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Executor whose requests fail after `timeout`. Without a timeout a
    /// hung executor leaves the element pending.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        // The status code is not part of the contract; the body decides.
        response
            .json::<Value>()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))
    }
}

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dispatch::request::ExecutionRequest;

/// How a dispatch ended, as recorded in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    Success,
    ApplicationError,
    NetworkError,
    /// The owning view was gone when the response arrived.
    Dropped,
}

#[derive(Debug, Serialize)]
pub struct DispatchTraceEvent {
    pub timestamp_ms: u128,
    pub collection: String,
    pub identity: String,
    pub action_type: String,
    pub outcome: TraceOutcome,
    pub result: Option<String>,
}

impl DispatchTraceEvent {
    pub fn now(collection: &str, identity: &str, request: &ExecutionRequest, outcome: TraceOutcome) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            collection: collection.to_string(),
            identity: identity.to_string(),
            action_type: request.action_type().to_string(),
            outcome,
            result: None,
        }
    }

    pub fn with_result(mut self, result: Option<&str>) -> Self {
        self.result = result.map(str::to_string);
        self
    }
}

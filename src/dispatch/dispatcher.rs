use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    dispatch::{
        error::DispatchError,
        executor::{Executor, failure_text, interpret_response},
        request::{ExecutionRequest, build_request},
    },
    schema::element_model::ElementCollection,
    state::state_model::InteractionState,
    trace::{
        logger::TraceLogger,
        trace::{DispatchTraceEvent, TraceOutcome},
    },
};

pub type SharedState = Arc<Mutex<InteractionState>>;

/// How dispatches of different elements relate to each other.
///
/// Both policies guarantee at most one in-flight dispatch per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Different elements may be pending at the same time.
    #[default]
    PerElement,
    /// At most one element is pending across the whole view.
    Serialized,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The element (or, when serialized, some element) was already pending;
    /// nothing was sent and nothing changed.
    Ignored,
    Completed(Completion),
    /// The view that issued the request was discarded before the response
    /// arrived.
    Dropped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub identity: String,
    pub outcome: Result<Option<String>, DispatchError>,
    /// What now sits in the element's result slot.
    pub result_text: Option<String>,
}

impl Completion {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ============================================================================
// Pending dispatch
// ============================================================================

/// An element marked busy whose request has been built but not answered.
///
/// Completing it applies the response to the state it came from, if that
/// state still exists. Dropping it without completing clears the busy mark.
pub struct PendingDispatch {
    identity: String,
    request: ExecutionRequest,
    is_form: bool,
    state: Weak<Mutex<InteractionState>>,
    collection: String,
    tracer: Arc<TraceLogger>,
    finished: bool,
}

impl PendingDispatch {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn request(&self) -> &ExecutionRequest {
        &self.request
    }

    pub fn complete(mut self, response: Result<Value, DispatchError>) -> DispatchOutcome {
        self.finished = true;
        let outcome = response.and_then(interpret_response);

        let Some(state) = self.state.upgrade() else {
            debug!(identity = %self.identity, "view discarded, dropping executor response");
            self.trace(TraceOutcome::Dropped, None);
            return DispatchOutcome::Dropped;
        };

        let result_text = {
            let mut state = state.lock();

            let text = match &outcome {
                Ok(Some(result)) => {
                    state.set_result(&self.identity, result.clone());
                    Some(result.clone())
                }
                Ok(None) => {
                    state.clear_result(&self.identity);
                    None
                }
                Err(e) => {
                    let text = failure_text(e);
                    state.set_error(&self.identity, text.clone());
                    Some(text)
                }
            };

            if self.is_form {
                state.apply_submission_outcome(&self.identity, outcome.is_ok());
            }
            state.clear_busy(&self.identity);
            text
        };

        let trace_outcome = match &outcome {
            Ok(_) => TraceOutcome::Success,
            Err(DispatchError::Application(message)) => {
                warn!(identity = %self.identity, %message, "executor rejected action");
                TraceOutcome::ApplicationError
            }
            Err(e) => {
                warn!(identity = %self.identity, error = %e, "action dispatch failed");
                TraceOutcome::NetworkError
            }
        };
        self.trace(trace_outcome, result_text.as_deref());

        DispatchOutcome::Completed(Completion {
            identity: self.identity.clone(),
            outcome,
            result_text,
        })
    }

    fn trace(&self, outcome: TraceOutcome, result: Option<&str>) {
        if !self.tracer.is_enabled() {
            return;
        }
        let event = DispatchTraceEvent::now(&self.collection, &self.identity, &self.request, outcome)
            .with_result(result);
        self.tracer.log(&event);
    }
}

impl Drop for PendingDispatch {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(state) = self.state.upgrade() {
            warn!(identity = %self.identity, "dispatch abandoned before completion");
            state.lock().clear_busy(&self.identity);
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

pub struct Dispatcher {
    executor: Arc<dyn Executor>,
    policy: DispatchPolicy,
    tracer: Arc<TraceLogger>,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            policy: DispatchPolicy::default(),
            tracer: Arc::new(TraceLogger::disabled()),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    pub fn tracer(&self) -> &TraceLogger {
        &self.tracer
    }

    /// Move an element from idle to pending.
    ///
    /// Returns `Ok(None)` when the busy guard rejects the interaction; the
    /// state is left untouched in that case.
    pub fn begin(
        &self,
        collection: &ElementCollection,
        state: &SharedState,
        identity: &str,
    ) -> Result<Option<PendingDispatch>, DispatchError> {
        let entry = collection
            .get(identity)
            .ok_or_else(|| DispatchError::UnknownElement(identity.to_string()))?;

        let mut guard = state.lock();

        let blocked = match self.policy() {
            DispatchPolicy::PerElement => guard.is_busy(identity),
            DispatchPolicy::Serialized => guard.any_busy(),
        };
        if blocked {
            debug!(identity, policy = ?self.policy(), "element busy, ignoring interaction");
            return Ok(None);
        }

        let request = build_request(entry, &guard);
        guard.mark_busy(identity);
        drop(guard);

        debug!(identity, action_type = request.action_type(), "dispatching action");

        let collection_fingerprint = if self.tracer.is_enabled() {
            collection.fingerprint()
        } else {
            String::new()
        };

        Ok(Some(PendingDispatch {
            identity: identity.to_string(),
            request,
            is_form: entry.element.is_form(),
            state: Arc::downgrade(state),
            collection: collection_fingerprint,
            tracer: self.tracer.clone(),
            finished: false,
        }))
    }

    /// Run one interaction to completion: guard, request, response, state
    /// update. The busy mark is cleared on every path.
    pub async fn dispatch(
        &self,
        collection: &ElementCollection,
        state: &SharedState,
        identity: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(pending) = self.begin(collection, state, identity)? else {
            return Ok(DispatchOutcome::Ignored);
        };

        let response = self.executor.execute(pending.request()).await;
        Ok(pending.complete(response))
    }
}

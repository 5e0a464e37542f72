#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use page_actions::dispatch::{
    dispatcher::{DispatchPolicy, Dispatcher},
    error::DispatchError,
    executor::Executor,
    request::ExecutionRequest,
};
use page_actions::view::actions_view::ActionsView;

// =========================================================================
// Scripted executor
// =========================================================================

/// Records every request and answers from a script. With a gate, each
/// request waits for `gate.notify_one()` before answering.
pub struct MockExecutor {
    requests: Mutex<Vec<ExecutionRequest>>,
    responses: Mutex<VecDeque<Result<Value, DispatchError>>>,
    gate: Option<Arc<Notify>>,
}

impl MockExecutor {
    pub fn new(responses: Vec<Result<Value, DispatchError>>) -> Self {
        Self {
            requests: Mutex::new(vec![]),
            responses: Mutex::new(responses.into()),
            gate: None,
        }
    }

    pub fn succeeding(result: &str) -> Self {
        Self::new(vec![Ok(json!({ "success": true, "result": result }))])
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, DispatchError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({ "success": true, "result": "ok" })))
    }
}

// =========================================================================
// Payload and view helpers
// =========================================================================

pub fn encode(payload: &Value) -> String {
    urlencoding::encode(&payload.to_string()).into_owned()
}

pub fn view_with(executor: Arc<MockExecutor>, policy: DispatchPolicy) -> ActionsView {
    ActionsView::new(Dispatcher::new(executor).with_policy(policy))
}

pub fn loaded_view(executor: Arc<MockExecutor>, payload: &Value) -> ActionsView {
    let mut view = view_with(executor, DispatchPolicy::PerElement);
    view.load(Some(&encode(payload))).expect("payload should decode");
    view
}

pub fn click(id: Option<&str>, label: &str, importance: f64) -> Value {
    json!({
        "id": id,
        "label": label,
        "description": format!("{} description", label),
        "importance": importance,
        "type": "click"
    })
}

pub fn form(id: Option<&str>, importance: f64) -> Value {
    json!({
        "id": id,
        "label": "Sign up",
        "description": "Create an account",
        "importance": importance,
        "type": "form",
        "submitButton": { "id": "signup-submit", "label": "Create account" },
        "inputs": [
            { "id": "email", "label": "Email", "placeholder": "you@example.com", "inputType": "email", "required": true },
            { "id": null, "placeholder": "Nickname" }
        ]
    })
}

/// A storefront description touching every element kind.
pub fn storefront() -> Value {
    json!({
        "elements": [
            { "id": "buy", "label": "Buy now", "description": "Add to cart and check out", "importance": 5, "type": "click" },
            { "id": "size", "label": "Size", "description": "Pick a size", "importance": 7, "type": "select", "options": ["S", "M", "L"] },
            { "id": "coupon", "label": "Coupon", "description": "Apply a coupon code", "importance": 2, "type": "input", "placeholder": "Code", "inputType": "text" },
            form(Some("signup"), 9.0)
        ]
    })
}

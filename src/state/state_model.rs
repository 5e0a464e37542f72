use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Ephemeral interaction state of one loaded collection, keyed by element
/// identity. Replaced wholesale when a new collection is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub input_values: HashMap<String, String>,
    pub select_values: HashMap<String, String>,
    pub form_values: HashMap<String, HashMap<String, String>>,
    pub open_forms: HashMap<String, bool>,
    pub action_results: HashMap<String, String>,

    /// Identities whose last completed dispatch failed.
    pub failed: HashSet<String>,
    /// Identities with a dispatch in flight.
    pub pending: HashSet<String>,
}

/// Per-identity dispatch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementPhase {
    Idle,
    Pending,
    IdleWithResult,
    IdleWithError,
}

impl InteractionState {
    // ---- Input values ----

    pub fn set_input_value(&mut self, identity: &str, value: impl Into<String>) {
        self.input_values.insert(identity.to_string(), value.into());
    }

    pub fn input_value(&self, identity: &str) -> &str {
        self.input_values.get(identity).map(String::as_str).unwrap_or("")
    }

    // ---- Select values ----

    pub fn set_select_value(&mut self, identity: &str, value: impl Into<String>) {
        self.select_values.insert(identity.to_string(), value.into());
    }

    pub fn select_value(&self, identity: &str) -> &str {
        self.select_values.get(identity).map(String::as_str).unwrap_or("")
    }

    // ---- Busy marker ----

    pub fn mark_busy(&mut self, identity: &str) {
        self.pending.insert(identity.to_string());
    }

    pub fn clear_busy(&mut self, identity: &str) {
        self.pending.remove(identity);
    }

    pub fn is_busy(&self, identity: &str) -> bool {
        self.pending.contains(identity)
    }

    pub fn any_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    // ---- Results ----

    pub fn set_result(&mut self, identity: &str, text: impl Into<String>) {
        self.failed.remove(identity);
        self.action_results.insert(identity.to_string(), text.into());
    }

    pub fn set_error(&mut self, identity: &str, text: impl Into<String>) {
        self.failed.insert(identity.to_string());
        self.action_results.insert(identity.to_string(), text.into());
    }

    pub fn clear_result(&mut self, identity: &str) {
        self.failed.remove(identity);
        self.action_results.remove(identity);
    }

    pub fn result(&self, identity: &str) -> Option<&str> {
        self.action_results.get(identity).map(String::as_str)
    }

    pub fn phase(&self, identity: &str) -> ElementPhase {
        if self.is_busy(identity) {
            ElementPhase::Pending
        } else if self.failed.contains(identity) {
            ElementPhase::IdleWithError
        } else if self.action_results.contains_key(identity) {
            ElementPhase::IdleWithResult
        } else {
            ElementPhase::Idle
        }
    }
}

use std::collections::HashMap;

use crate::state::state_model::InteractionState;

/// Forms at or above this importance start expanded.
pub const AUTO_EXPAND_IMPORTANCE: f64 = 8.0;

/// Whether a form starts open, given its importance and rendered position.
pub fn should_auto_expand(importance: f64, rendered_position: usize) -> bool {
    rendered_position == 0 || importance >= AUTO_EXPAND_IMPORTANCE
}

impl InteractionState {
    pub fn toggle_form(&mut self, identity: &str) -> bool {
        let open = self.open_forms.entry(identity.to_string()).or_insert(false);
        *open = !*open;
        *open
    }

    pub fn is_form_open(&self, identity: &str) -> bool {
        self.open_forms.get(identity).copied().unwrap_or(false)
    }

    pub fn set_field_value(&mut self, identity: &str, field: &str, value: impl Into<String>) {
        self.form_values
            .entry(identity.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    pub fn field_value(&self, identity: &str, field: &str) -> &str {
        self.form_values
            .get(identity)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn field_values(&self, identity: &str) -> Option<&HashMap<String, String>> {
        self.form_values.get(identity)
    }

    /// Collapse after a successful submission; a failed one leaves the form
    /// as it was so the user can correct and resubmit.
    pub fn apply_submission_outcome(&mut self, identity: &str, succeeded: bool) {
        if succeeded {
            self.open_forms.insert(identity.to_string(), false);
        }
    }
}

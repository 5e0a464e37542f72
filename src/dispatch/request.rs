use serde::Serialize;

use crate::schema::element_model::{CollectionEntry, ElementKind, InputKind};
use crate::state::identity::field_identity;
use crate::state::state_model::InteractionState;

/// Label sent for form fields that declare none.
pub const DEFAULT_FIELD_LABEL: &str = "field";

/// Body of one `POST` to the executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action_type", rename_all = "lowercase")]
pub enum ExecutionRequest {
    Click {
        element_id: Option<String>,
        element_label: String,
        element_description: String,
        element_importance: f64,
    },
    Select {
        element_id: Option<String>,
        element_label: String,
        element_description: String,
        element_importance: f64,
        value: String,
    },
    Input {
        element_id: Option<String>,
        element_label: String,
        element_description: String,
        element_placeholder: String,
        element_input_type: InputKind,
        element_importance: f64,
        value: String,
    },
    Form {
        /// Id of the submit button.
        element_id: Option<String>,
        /// Label of the submit button.
        element_label: String,
        element_description: String,
        element_importance: f64,
        fields: Vec<FormFieldValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormFieldValue {
    pub field_id: String,
    pub element_id: Option<String>,
    pub label: String,
    pub value: String,
}

impl ExecutionRequest {
    pub fn action_type(&self) -> &'static str {
        match self {
            ExecutionRequest::Click { .. } => "click",
            ExecutionRequest::Select { .. } => "select",
            ExecutionRequest::Input { .. } => "input",
            ExecutionRequest::Form { .. } => "form",
        }
    }
}

/// Normalize the current state of one element into an execution request.
pub fn build_request(entry: &CollectionEntry, state: &InteractionState) -> ExecutionRequest {
    let element = &entry.element;
    let identity = entry.identity.as_str();

    match &element.kind {
        ElementKind::Click => ExecutionRequest::Click {
            element_id: element.id.clone(),
            element_label: element.label.clone(),
            element_description: element.description.clone(),
            element_importance: element.importance,
        },
        ElementKind::Select { .. } => ExecutionRequest::Select {
            element_id: element.id.clone(),
            element_label: element.label.clone(),
            element_description: element.description.clone(),
            element_importance: element.importance,
            value: state.select_value(identity).to_string(),
        },
        ElementKind::Input {
            placeholder,
            input_kind,
        } => ExecutionRequest::Input {
            element_id: element.id.clone(),
            element_label: element.label.clone(),
            element_description: element.description.clone(),
            element_placeholder: placeholder.clone(),
            element_input_type: *input_kind,
            element_importance: element.importance,
            value: state.input_value(identity).to_string(),
        },
        ElementKind::Form {
            submit_button,
            inputs,
        } => {
            let fields = inputs
                .iter()
                .enumerate()
                .map(|(i, input)| {
                    let field_id = field_identity(entry.index, i);
                    let value = state.field_value(identity, &field_id).to_string();
                    FormFieldValue {
                        element_id: input.id.clone(),
                        label: input
                            .label
                            .clone()
                            .filter(|l| !l.is_empty())
                            .unwrap_or_else(|| DEFAULT_FIELD_LABEL.to_string()),
                        field_id,
                        value,
                    }
                })
                .collect();

            ExecutionRequest::Form {
                element_id: submit_button.id.clone(),
                element_label: submit_button.label.clone(),
                element_description: element.description.clone(),
                element_importance: element.importance,
                fields,
            }
        }
    }
}

use serde::Serialize;

use crate::{
    prefs::styler::AccessibilityProfile,
    schema::element_model::{ElementKind, InputKind},
    state::{identity::field_identity, state_model::ElementPhase},
    view::actions_view::{ActionsView, ViewStatus},
};

pub const HEADING: &str = "Actions available on this page";
pub const NO_ACTIONS_MESSAGE: &str = "No actions available";
pub const RUN_LABEL: &str = "Run action";
pub const RUNNING_LABEL: &str = "Running...";

/// Everything the display shows, derived from the view on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub profile: AccessibilityProfile,
    pub elements: Vec<ElementView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    NoActions,
    Error,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub identity: String,
    pub kind: &'static str,
    pub label: String,
    pub description: String,
    pub importance: f64,
    pub phase: ElementPhase,
    pub button_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub control: ControlView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ControlView {
    Button,
    Select {
        options: Vec<String>,
        selected: String,
    },
    Input {
        placeholder: String,
        input_type: InputKind,
        value: String,
    },
    Form {
        open: bool,
        fields: Vec<FieldView>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub field_id: String,
    pub label: Option<String>,
    pub description: String,
    pub placeholder: String,
    pub input_type: InputKind,
    pub required: bool,
    pub value: String,
}

impl ViewModel {
    pub fn build(view: &ActionsView) -> Self {
        let profile = view.profile().clone();

        let (status, banner) = match view.status() {
            ViewStatus::NoActions => (StatusKind::NoActions, None),
            ViewStatus::Failed { banner } => (StatusKind::Error, Some(banner)),
            ViewStatus::Ready => (StatusKind::Ready, None),
        };

        let Some(state) = view.state() else {
            return Self {
                status,
                banner,
                profile,
                elements: vec![],
            };
        };

        let elements = view
            .rendered()
            .into_iter()
            .map(|entry| {
                let element = &entry.element;
                let identity = entry.identity.as_str();
                let phase = state.phase(identity);

                let control = match &element.kind {
                    ElementKind::Click => ControlView::Button,
                    ElementKind::Select { options } => ControlView::Select {
                        options: options.clone(),
                        selected: state.select_value(identity).to_string(),
                    },
                    ElementKind::Input {
                        placeholder,
                        input_kind,
                    } => ControlView::Input {
                        placeholder: placeholder.clone(),
                        input_type: *input_kind,
                        value: state.input_value(identity).to_string(),
                    },
                    ElementKind::Form { inputs, .. } => ControlView::Form {
                        open: state.is_form_open(identity),
                        fields: inputs
                            .iter()
                            .enumerate()
                            .map(|(i, input)| {
                                let field_id = field_identity(entry.index, i);
                                FieldView {
                                    value: state.field_value(identity, &field_id).to_string(),
                                    field_id,
                                    label: input.label.clone(),
                                    description: input.description.clone(),
                                    placeholder: input.placeholder.clone(),
                                    input_type: input.input_kind,
                                    required: input.required,
                                }
                            })
                            .collect(),
                    },
                };

                let button_label = match (&element.kind, phase) {
                    (_, ElementPhase::Pending) => RUNNING_LABEL.to_string(),
                    (ElementKind::Form { submit_button, .. }, _) => submit_button.label.clone(),
                    _ => RUN_LABEL.to_string(),
                };

                ElementView {
                    identity: identity.to_string(),
                    kind: element.kind_name(),
                    label: element.label.clone(),
                    description: element.description.clone(),
                    importance: element.importance,
                    phase,
                    button_label,
                    result: state.result(identity).map(str::to_string),
                    control,
                }
            })
            .collect();

        Self {
            status,
            banner,
            profile,
            elements,
        }
    }

    pub fn element(&self, identity: &str) -> Option<&ElementView> {
        self.elements.iter().find(|e| e.identity == identity)
    }
}

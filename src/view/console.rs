use crate::schema::element_model::InputKind;
use crate::state::state_model::ElementPhase;
use crate::view::view_model::{ControlView, ElementView, HEADING, NO_ACTIONS_MESSAGE, StatusKind, ViewModel};

// ============================================================================
// Console renderer: formatted terminal output
// ============================================================================

/// Format a view model for terminal output.
///
/// Produces output like:
/// ```text
/// === Actions available on this page ===
///
/// [click] Buy (element-0, importance 5)
///     Adds the product to the cart
///     [ Run action ]
///     Result: Done
/// ```
pub fn format_console_view(model: &ViewModel) -> String {
    match model.status {
        StatusKind::Error => {
            let banner = model.banner.as_deref().unwrap_or("error");
            return format!("[ERROR] {}\n", banner);
        }
        StatusKind::NoActions => return format!("{}\n", NO_ACTIONS_MESSAGE),
        StatusKind::Ready => {}
    }

    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", HEADING));

    if !model.profile.classes.is_empty() {
        out.push_str(&format!("Accessibility: {}\n", model.profile.classes.join(", ")));
    }

    // Honour a requested line height by spacing elements further apart
    let separator = if model.profile.overrides.line_height.is_some() {
        "\n\n"
    } else {
        "\n"
    };

    for element in &model.elements {
        out.push_str(separator);
        out.push_str(&format_element(element));
    }

    out
}

fn format_element(element: &ElementView) -> String {
    let mut out = format!(
        "[{}] {} ({}, importance {})\n",
        element.kind, element.label, element.identity, element.importance
    );

    if !element.description.is_empty() {
        out.push_str(&format!("    {}\n", element.description));
    }

    match &element.control {
        ControlView::Button => {}
        ControlView::Select { options, selected } => {
            let rendered: Vec<String> = options
                .iter()
                .map(|o| if o == selected { format!("({})", o) } else { o.clone() })
                .collect();
            out.push_str(&format!("    Options: {}\n", rendered.join(" | ")));
        }
        ControlView::Input {
            placeholder,
            input_type,
            value,
        } => {
            let shown = if value.is_empty() {
                format!("<{}>", placeholder)
            } else if *input_type == InputKind::Password {
                "*".repeat(value.chars().count())
            } else {
                value.clone()
            };
            out.push_str(&format!("    {}: {}\n", input_type.as_str(), shown));
        }
        ControlView::Form { open, fields } => {
            if *open {
                for field in fields {
                    let label = field.label.as_deref().unwrap_or("field");
                    let marker = if field.required { "*" } else { "" };
                    out.push_str(&format!(
                        "    - {}{} [{}]: {}\n",
                        label, marker, field.field_id, field.value
                    ));
                }
            } else {
                out.push_str(&format!("    ({} fields, collapsed)\n", fields.len()));
            }
        }
    }

    out.push_str(&format!("    [ {} ]\n", element.button_label));

    // Error text already carries its own prefix
    match (&element.result, element.phase) {
        (Some(result), ElementPhase::IdleWithError) => out.push_str(&format!("    {}\n", result)),
        (Some(result), _) => out.push_str(&format!("    Result: {}\n", result)),
        (None, _) => {}
    }

    out
}

use std::collections::HashMap;

use crate::schema::element_model::{CollectionEntry, ElementKind};
use crate::state::forms::should_auto_expand;
use crate::state::identity::field_identity;
use crate::state::state_model::InteractionState;

/// Fresh interaction state for a collection, given its entries in rendered
/// order.
///
/// Selects start on their first option, inputs and form fields start empty,
/// and forms start open when they are rendered first or are important
/// enough.
pub fn seed_state(rendered: &[&CollectionEntry]) -> InteractionState {
    let mut state = InteractionState::default();

    for (position, entry) in rendered.iter().enumerate() {
        let identity = entry.identity.as_str();

        match &entry.element.kind {
            ElementKind::Click => {}
            ElementKind::Select { options } => {
                let first = options.first().cloned().unwrap_or_default();
                state.set_select_value(identity, first);
            }
            ElementKind::Input { .. } => {
                state.set_input_value(identity, "");
            }
            ElementKind::Form { inputs, .. } => {
                let fields: HashMap<String, String> = (0..inputs.len())
                    .map(|i| (field_identity(entry.index, i), String::new()))
                    .collect();
                state.form_values.insert(identity.to_string(), fields);

                let open = should_auto_expand(entry.element.importance, position);
                state.open_forms.insert(identity.to_string(), open);
            }
        }
    }

    state
}

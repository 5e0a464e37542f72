/// Identity of an element: its declared id, or `element-{index}` when the
/// id is absent or empty. `index` is the position in the decoded payload.
pub fn element_identity(declared: Option<&str>, index: usize) -> String {
    match declared {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("element-{index}"),
    }
}

/// Identity of one field of a form element, keyed by the form's payload
/// index and the field's position inside the form.
pub fn field_identity(element_index: usize, input_index: usize) -> String {
    format!("input-{element_index}-{input_index}")
}

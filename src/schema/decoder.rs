use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::element_model::{
    CollectionEntry, Element, ElementCollection, ElementKind, InputKind, PayloadShape,
};
use crate::schema::error::DecodeError;
use crate::state::identity::element_identity;

// ============================================================================
// Inbound payload shapes
// ============================================================================

/// The two inbound schema versions, resolved once at decode time.
#[derive(Debug)]
enum ActionsPayload {
    Unified(UnifiedPayload),
    Legacy(LegacyPayload),
}

#[derive(Debug, Serialize, Deserialize)]
struct UnifiedPayload {
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPayload {
    #[serde(default)]
    click_elements: Vec<LegacyClick>,
    #[serde(default)]
    select_elements: Vec<LegacySelect>,
    #[serde(default)]
    input_elements: Vec<LegacyInput>,
}

#[derive(Debug, Deserialize)]
struct LegacyClick {
    #[serde(default)]
    id: Option<String>,
    label: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct LegacySelect {
    #[serde(default)]
    id: Option<String>,
    label: String,
    description: String,
    options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyInput {
    #[serde(default)]
    id: Option<String>,
    label: String,
    description: String,
    #[serde(default)]
    placeholder: String,
    #[serde(rename = "type", default)]
    input_kind: InputKind,
}

impl ActionsPayload {
    /// Presence of an `elements` key selects the unified shape.
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let object = match &value {
            Value::Object(map) => map,
            other => return Err(DecodeError::NotAnObject(json_type_name(other))),
        };

        if object.contains_key("elements") {
            serde_json::from_value(value)
                .map(ActionsPayload::Unified)
                .map_err(|source| DecodeError::Schema { shape: "unified", source })
        } else {
            serde_json::from_value(value)
                .map(ActionsPayload::Legacy)
                .map_err(|source| DecodeError::Schema { shape: "legacy", source })
        }
    }

    fn shape(&self) -> PayloadShape {
        match self {
            ActionsPayload::Unified(_) => PayloadShape::Unified,
            ActionsPayload::Legacy(_) => PayloadShape::Legacy,
        }
    }

    fn into_elements(self) -> Vec<Element> {
        match self {
            ActionsPayload::Unified(p) => p.elements,
            ActionsPayload::Legacy(p) => {
                let clicks = p.click_elements.into_iter().map(|c| Element {
                    id: c.id,
                    label: c.label,
                    description: c.description,
                    importance: 0.0,
                    kind: ElementKind::Click,
                });
                let selects = p.select_elements.into_iter().map(|s| Element {
                    id: s.id,
                    label: s.label,
                    description: s.description,
                    importance: 0.0,
                    kind: ElementKind::Select { options: s.options },
                });
                let inputs = p.input_elements.into_iter().map(|i| Element {
                    id: i.id,
                    label: i.label,
                    description: i.description,
                    importance: 0.0,
                    kind: ElementKind::Input {
                        placeholder: i.placeholder,
                        input_kind: i.input_kind,
                    },
                });
                clicks.chain(selects).chain(inputs).collect()
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode the value of the `actions` query parameter.
pub fn decode_payload(encoded: &str) -> Result<ElementCollection, DecodeError> {
    check_escapes(encoded)?;
    let json = urlencoding::decode(encoded).map_err(DecodeError::PercentEncoding)?;
    decode_json(&json)
}

/// Every `%` must start a two-digit hex escape. `urlencoding` passes
/// malformed escapes through as literal text, so they are rejected here.
fn check_escapes(encoded: &str) -> Result<(), DecodeError> {
    let bytes = encoded.as_bytes();
    let mut offset = 0;

    while offset < bytes.len() {
        if bytes[offset] != b'%' {
            offset += 1;
            continue;
        }

        let valid = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(DecodeError::InvalidEscape { offset });
        }
        offset += 3;
    }

    Ok(())
}

/// Decode an already percent-decoded JSON document.
pub fn decode_json(json: &str) -> Result<ElementCollection, DecodeError> {
    let value: Value = serde_json::from_str(json).map_err(DecodeError::Json)?;
    let payload = ActionsPayload::from_value(value)?;
    let shape = payload.shape();

    let entries = assign_identities(payload.into_elements())?;

    tracing::debug!(?shape, elements = entries.len(), "decoded element collection");
    Ok(ElementCollection::new(shape, entries))
}

fn assign_identities(elements: Vec<Element>) -> Result<Vec<CollectionEntry>, DecodeError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entries = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let identity = element_identity(element.id.as_deref(), index);

        if let Some(&first) = seen.get(&identity) {
            return Err(DecodeError::DuplicateIdentity {
                identity,
                first,
                second: index,
            });
        }
        seen.insert(identity.clone(), index);

        entries.push(CollectionEntry {
            index,
            identity,
            element,
        });
    }

    Ok(entries)
}

// ============================================================================
// Re-encoding
// ============================================================================

/// Serialize a collection back to the unified shape, in payload order.
pub fn encode_json(collection: &ElementCollection) -> Result<String, serde_json::Error> {
    let payload = UnifiedPayload {
        elements: collection.elements().cloned().collect(),
    };
    serde_json::to_string(&payload)
}

/// Serialize and percent-encode a collection for the `actions` parameter.
pub fn encode_payload(collection: &ElementCollection) -> Result<String, serde_json::Error> {
    let json = encode_json(collection)?;
    Ok(urlencoding::encode(&json).into_owned())
}

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

// ============================================================================
// Elements
// ============================================================================

/// One interactive unit detected on the target page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub importance: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Click,
    Select {
        options: Vec<String>,
    },
    Input {
        #[serde(default)]
        placeholder: String,
        #[serde(rename = "inputType", default)]
        input_kind: InputKind,
    },
    Form {
        #[serde(rename = "submitButton")]
        submit_button: SubmitButton,
        #[serde(default)]
        inputs: Vec<FormInput>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Text,
    Number,
    Email,
    Password,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Email => "email",
            InputKind::Password => "password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitButton {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(rename = "inputType", default)]
    pub input_kind: InputKind,
    #[serde(default)]
    pub required: bool,
}

impl Element {
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Click => "click",
            ElementKind::Select { .. } => "select",
            ElementKind::Input { .. } => "input",
            ElementKind::Form { .. } => "form",
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self.kind, ElementKind::Form { .. })
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Which inbound schema a collection was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    Legacy,
    Unified,
}

/// An element together with its positional index and resolved identity.
///
/// `index` is the position in the decoded payload, never the rendered
/// position, so identities and field identities survive re-ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub index: usize,
    pub identity: String,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementCollection {
    pub shape: PayloadShape,
    entries: Vec<CollectionEntry>,
}

impl ElementCollection {
    pub(crate) fn new(shape: PayloadShape, entries: Vec<CollectionEntry>) -> Self {
        Self { shape, entries }
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|e| e.identity == identity)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.entries.iter().map(|e| &e.element)
    }

    /// Stable fingerprint of the normalized collection, used to correlate
    /// trace events with the collection they were dispatched from.
    pub fn fingerprint(&self) -> String {
        let elements: Vec<&Element> = self.elements().collect();
        let json = serde_json::to_string(&elements).unwrap_or_default();

        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

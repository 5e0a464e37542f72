use thiserror::Error;

/// A user-level state update that does not fit the loaded collection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("no element with identity '{0}'")]
    UnknownElement(String),

    #[error("element '{identity}' is a {actual} element, not a {expected} element")]
    WrongKind {
        identity: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{value}' is not an option of select element '{identity}'")]
    InvalidOption { identity: String, value: String },

    #[error("form '{identity}' has no field '{field}'")]
    UnknownField { identity: String, field: String },
}

use thiserror::Error;

/// The inbound element description could not be turned into a collection.
///
/// Fatal to the collection being loaded; loading another payload recovers.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    PercentEncoding(#[source] std::string::FromUtf8Error),

    #[error("payload has a malformed percent escape at byte {offset}")]
    InvalidEscape { offset: usize },

    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("payload must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("{shape} payload has an invalid element list: {source}")]
    Schema {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("identity '{identity}' is used by elements {first} and {second}")]
    DuplicateIdentity {
        identity: String,
        first: usize,
        second: usize,
    },
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    /// The executor could not be reached, or answered with something that
    /// is not JSON.
    #[error("could not reach the executor: {0}")]
    Network(String),

    /// The executor answered but reported failure.
    #[error("executor reported failure: {0}")]
    Application(String),

    #[error("no element with identity '{0}' in the loaded collection")]
    UnknownElement(String),

    #[error("no element collection is loaded")]
    NoCollection,
}

use thiserror::Error;

/// Errors surfaced by a [`LabelSource`](crate::LabelSource).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LabelError {
    /// The labeling service answered with an error message. Displayed verbatim.
    #[error("{0}")]
    Service(String),
    /// The request never produced a usable HTTP response.
    #[error("label request failed: {0}")]
    Transport(String),
    /// The service replied with a body we could not decode.
    #[error("invalid label response: {0}")]
    InvalidResponse(String),
    /// Configuration is inconsistent (unknown mode, empty endpoint, ...).
    #[error("invalid label source config: {0}")]
    InvalidConfig(String),
}

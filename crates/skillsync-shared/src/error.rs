use thiserror::Error;

/// A backend response decoded fine but does not have the shape the client
/// relies on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("{entity} is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} field `{field}` is out of range: {detail}")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        detail: String,
    },
}

/// A form failed validation before anything was sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

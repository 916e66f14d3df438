use thiserror::Error;

/// Failures while interpreting the documents handed to the filter
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Malformed identifier '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: String },

    #[error("Invalid power levels content: {0}")]
    InvalidPowerLevels(String),

    #[error("Malformed room creation request: {0}")]
    MalformedRequest(String),
}

impl FilterError {
    pub fn malformed_identifier(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier { id: id.to_string(), reason: reason.into() }
    }
}

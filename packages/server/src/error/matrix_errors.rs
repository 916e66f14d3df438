use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::error::FilterError;

/// Matrix error codes returned to the homeserver by the filter endpoints
#[derive(Error, Debug)]
pub enum MatrixError {
    /// The event or request was rejected by policy; carries the deny reason
    #[error("{reason}")]
    Forbidden { reason: String },

    #[error("Invalid JSON in request: {0}")]
    BadJson(String),
    #[error("Request body is not valid JSON")]
    NotJson,
    #[error("Missing required parameters: {0}")]
    MissingParams(String),
    #[error("Invalid parameter value: {0}")]
    InvalidParam(String),
}

impl MatrixError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    /// Convert error to response parts (status, errcode, message)
    pub fn to_response_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            MatrixError::Forbidden { .. } => {
                (StatusCode::FORBIDDEN, "M_FORBIDDEN", self.to_string())
            }
            MatrixError::BadJson(_) => (StatusCode::BAD_REQUEST, "M_BAD_JSON", self.to_string()),
            MatrixError::NotJson => (StatusCode::BAD_REQUEST, "M_NOT_JSON", self.to_string()),
            MatrixError::MissingParams(_) => {
                (StatusCode::BAD_REQUEST, "M_MISSING_PARAMS", self.to_string())
            }
            MatrixError::InvalidParam(_) => {
                (StatusCode::BAD_REQUEST, "M_INVALID_PARAM", self.to_string())
            }
        }
    }

    /// JSON body in the Matrix `{"errcode", "error"}` shape
    pub fn to_json(&self) -> Value {
        let (_, errcode, message) = self.to_response_parts();
        json!({
            "errcode": errcode,
            "error": message
        })
    }
}

impl IntoResponse for MatrixError {
    fn into_response(self) -> Response {
        let (status, _, _) = self.to_response_parts();
        (status, Json(self.to_json())).into_response()
    }
}

impl From<FilterError> for MatrixError {
    fn from(filter_error: FilterError) -> Self {
        match filter_error {
            FilterError::MissingField(field) => MatrixError::MissingParams(field.to_string()),
            FilterError::MalformedIdentifier { .. } => {
                MatrixError::InvalidParam(filter_error.to_string())
            }
            FilterError::InvalidPowerLevels(_) | FilterError::MalformedRequest(_) => {
                MatrixError::BadJson(filter_error.to_string())
            }
        }
    }
}

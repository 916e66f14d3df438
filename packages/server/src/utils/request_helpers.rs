use axum::{
    Json,
    extract::rejection::JsonRejection,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::MatrixError;

/// Unwrap an extracted JSON body, mapping axum's rejection to a Matrix error
///
/// Bodies that are not JSON at all (wrong content type, syntax errors) are
/// `M_NOT_JSON`; anything else axum refuses is `M_BAD_JSON`.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, MatrixError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonSyntaxError(e)) => {
            warn!("Rejected request body - invalid JSON syntax: {}", e);
            Err(MatrixError::NotJson)
        }
        Err(JsonRejection::MissingJsonContentType(e)) => {
            warn!("Rejected request body - missing JSON content type: {}", e);
            Err(MatrixError::NotJson)
        }
        Err(e) => {
            warn!("Rejected request body: {}", e);
            Err(MatrixError::BadJson(e.body_text()))
        }
    }
}

/// Deserialize a JSON body into its typed request form
pub fn parse_body<T: DeserializeOwned>(value: Value) -> Result<T, MatrixError> {
    serde_json::from_value(value).map_err(|e| {
        warn!("Rejected request body - unexpected shape: {}", e);
        MatrixError::BadJson(e.to_string())
    })
}

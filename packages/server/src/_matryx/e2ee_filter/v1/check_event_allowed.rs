use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    AppState,
    error::MatrixError,
    room::Verdict,
    utils::request_helpers::json_body,
};

#[derive(Serialize)]
pub struct CheckEventAllowedResponse {
    allowed: bool,
    event: Value,
}

/// POST /_matryx/e2ee_filter/v1/check_event_allowed
///
/// Body is the event as the homeserver would persist it. An allowed event
/// is echoed back; a denied one yields `M_FORBIDDEN` with the deny reason,
/// which the homeserver relays to the sender.
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckEventAllowedResponse>, MatrixError> {
    let event = json_body(payload)?;

    match state.rules.check_event_allowed(&event) {
        Verdict::Allow => Ok(Json(CheckEventAllowedResponse { allowed: true, event })),
        Verdict::Deny(reason) => Err(MatrixError::forbidden(reason)),
    }
}

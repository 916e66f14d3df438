use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use matryx_e2ee_entity::types::CreateRoomRequest;

use crate::{
    AppState,
    error::{FilterError, MatrixError},
    utils::request_helpers::{json_body, parse_body},
};

#[derive(Deserialize)]
pub struct OnCreateRoomBody {
    requester: String,
    #[serde(default)]
    is_requester_admin: bool,
    request: Value,
}

#[derive(Serialize)]
pub struct OnCreateRoomResponse {
    request: CreateRoomRequest,
}

/// POST /_matryx/e2ee_filter/v1/on_create_room
///
/// Called by the homeserver before it builds a new room. Returns the
/// `createRoom` body with encryption stripped from `initial_state` and the
/// synthesized power levels appended. A malformed body is refused rather
/// than passed through unfiltered.
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OnCreateRoomResponse>, MatrixError> {
    let body: OnCreateRoomBody = parse_body(json_body(payload)?)?;

    let request = CreateRoomRequest::from_value(body.request).map_err(|e| {
        warn!("Room creation filter failed - malformed request from {}: {}", body.requester, e);
        MatrixError::from(FilterError::MalformedRequest(e.to_string()))
    })?;

    let request = state
        .rules
        .on_create_room(&body.requester, body.is_requester_admin, request)
        .map_err(|e| {
            warn!("Room creation filter failed for {}: {}", body.requester, e);
            MatrixError::from(e)
        })?;

    info!(
        "Filtered room creation for {}: {} initial state events",
        body.requester,
        request.initial_state.len()
    );
    Ok(Json(OnCreateRoomResponse { request }))
}

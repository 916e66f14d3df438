use axum::{Json, extract::State};

use crate::{AppState, config::FilterConfig};

/// GET /_matryx/e2ee_filter/v1/config
///
/// The deny-lists and switches the filter is running with.
pub async fn get(State(state): State<AppState>) -> Json<FilterConfig> {
    Json(state.config.as_ref().clone())
}

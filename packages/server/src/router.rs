use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::_matryx;
use crate::state::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .nest("/_matryx/e2ee_filter/v1", create_filter_routes())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .fallback(handler_404)
}

fn create_filter_routes() -> Router<AppState> {
    Router::new()
        .route("/on_create_room", post(_matryx::e2ee_filter::v1::on_create_room::post))
        .route(
            "/check_event_allowed",
            post(_matryx::e2ee_filter::v1::check_event_allowed::post),
        )
        .route("/config", get(_matryx::e2ee_filter::v1::config::get))
}

async fn handler_404() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Endpoint not found")
}

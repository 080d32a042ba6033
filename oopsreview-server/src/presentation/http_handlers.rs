use axum::{Json, Router, http::StatusCode, response::Response, routing::get};
use serde::Serialize;

use super::http::envelope::Envelope;
use super::{AppState, routes};

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .fallback(route_not_found)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn route_not_found() -> Response {
    Envelope::message(StatusCode::NOT_FOUND, "route not found").respond(StatusCode::NOT_FOUND)
}

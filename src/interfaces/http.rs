//! HTTP surface of the scoring service.
//!
//! Thin axum layer: every route delegates to [`ScoringService`]. Unsupported
//! methods on known paths get 405 from the router itself. Bodies over axum's
//! default limit are answered with the JSON error shape like any other bad body.

use crate::application::scoring::ScoringService;
use crate::domain::errors::ScoringError;
use crate::domain::ml::prediction::ErrorResponse;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info_span;
use uuid::Uuid;

pub fn router(service: ScoringService) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(service)
}

impl IntoResponse for ScoringError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}

async fn predict(
    State(service): State<ScoringService>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    info_span!("predict", %request_id)
        .in_scope(|| match body {
            Ok(body) => service.score_body(&body),
            Err(rejection) => Err(service.reject_body(rejection.body_text())),
        })
        .map(Json)
        .into_response()
}

async fn health(State(service): State<ScoringService>) -> impl IntoResponse {
    Json(service.health())
}

async fn metrics(State(service): State<ScoringService>) -> Response {
    match service.metrics() {
        Some(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! external-dns webhook HTTP surface.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /healthz` | Liveness, always `200 OK` |
//! | `GET /` | Domain filter negotiation |
//! | `GET /records` | Current canonical record list |
//! | `POST /records` | Apply a change-set (`204` on success) |
//! | `POST /adjustendpoints` | Wildcard filtering of candidate records |
//! | `GET /metrics` | Prometheus exposition |
//!
//! Request bodies are decoded here rather than through the `Json` extractor so
//! that every malformed body is answered with `400`, whatever its content type.

use crate::constants::WEBHOOK_MEDIA_TYPE;
use crate::endpoint::{Changes, Endpoint};
use crate::errors::WebhookError;
use crate::metrics::{gather_metrics, record_webhook_request};
use crate::provider::Provider;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Build the webhook router around a provider.
pub fn router(provider: Provider) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/", get(negotiate))
        .route("/records", get(get_records).post(apply_changes))
        .route("/adjustendpoints", post(adjust_endpoints))
        .route("/metrics", get(metrics))
        .with_state(Arc::new(provider))
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => {
                warn!(error = %self, "Rejecting malformed webhook request");
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) | Self::Metrics(_) => {
                error!(error = %self, kind = self.kind(), "Webhook request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

fn webhook_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)],
        Json(value),
    )
        .into_response()
}

fn finish(route: &str, result: Result<Response, WebhookError>) -> Response {
    let response = result.unwrap_or_else(IntoResponse::into_response);
    record_webhook_request(route, response.status().as_u16());
    response
}

async fn health() -> Response {
    finish("healthz", Ok((StatusCode::OK, "OK").into_response()))
}

async fn negotiate(State(provider): State<Arc<Provider>>) -> Response {
    finish(
        "negotiate",
        Ok(webhook_json(StatusCode::OK, provider.domain_filter())),
    )
}

async fn get_records(State(provider): State<Arc<Provider>>) -> Response {
    let result = provider
        .records()
        .await
        .map(|records| webhook_json(StatusCode::OK, &records))
        .map_err(WebhookError::from);
    finish("records", result)
}

async fn apply_changes(State(provider): State<Arc<Provider>>, body: Bytes) -> Response {
    let result = async {
        let changes: Changes = serde_json::from_slice(&body)?;
        provider.apply_changes(changes).await?;
        Ok::<_, WebhookError>(
            (
                StatusCode::NO_CONTENT,
                [(header::CONTENT_TYPE, WEBHOOK_MEDIA_TYPE)],
            )
                .into_response(),
        )
    }
    .await;
    finish("apply_changes", result)
}

async fn adjust_endpoints(State(provider): State<Arc<Provider>>, body: Bytes) -> Response {
    let result = serde_json::from_slice::<Vec<Endpoint>>(&body)
        .map(|candidates| {
            let adjusted = provider.adjust_endpoints(candidates);
            webhook_json(StatusCode::OK, &adjusted)
        })
        .map_err(WebhookError::from);
    finish("adjust_endpoints", result)
}

async fn metrics() -> Response {
    let result = gather_metrics()
        .map(|text| {
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
                text,
            )
                .into_response()
        })
        .map_err(WebhookError::from);
    finish("metrics", result)
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod webhook_tests;

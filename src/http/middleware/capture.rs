//! Request/response capture middleware.
//!
//! Produces a complete [`RequestLog`] for every audited call without
//! altering what the caller observes. The record is written twice: once
//! before the inner service runs (so a hung or crashed call still leaves a
//! trail) and once after it returns. Both bodies are buffered transparently;
//! the bytes forwarded downstream and back to the caller are exactly the
//! bytes that were captured.
//!
//! Failures of the inner service are not handled here: a response carrying
//! the classified-failure marker passes through untouched, leaving the
//! record incomplete by design, and the classification layer outside this
//! one renders it. Failures of the capture itself (body read, sink write)
//! are caught and answered with a 500 body carrying the correlation id.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::record::{body_text, RequestLog};
use crate::audit::resilient::ResilientLogger;
use crate::audit::store::StoreError;
use crate::error::{ApiError, ErrorResponse, GENERIC_ERROR_MESSAGE};
use crate::http::context::RequestContext;
use crate::http::middleware::identity::CallerIdentity;
use crate::observability::metrics;

#[derive(Clone)]
pub struct CaptureState {
    pub logger: Arc<ResilientLogger>,
    /// Path prefixes excluded from auditing (introspection routes).
    pub skip_prefixes: Arc<Vec<String>>,
    /// Upper bound on the request body buffered for audit.
    pub max_body_bytes: usize,
}

#[derive(Debug, Error)]
enum CaptureError {
    #[error("failed to read body: {0}")]
    BodyRead(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn capture_request(
    State(state): State<CaptureState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if state
        .skip_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return next.run(request).await;
    }

    // The classification layer mints the context; tolerate running without
    // one (stand-alone mounting) by minting a fallback id. In that case the
    // trace and request records will not join.
    let correlation_id = request
        .extensions()
        .get::<RequestContext>()
        .copied()
        .unwrap_or_default()
        .correlation_id();

    let started = Instant::now();

    match audited_call(&state, correlation_id, request, next, started).await {
        Ok(response) => response,
        Err(failure) => {
            tracing::error!(log_id = %correlation_id, error = %failure, "request capture failed");
            capture_failure_response(correlation_id, &failure)
        }
    }
}

async fn audited_call(
    state: &CaptureState,
    correlation_id: Uuid,
    request: Request<Body>,
    next: Next,
    started: Instant,
) -> Result<Response, CaptureError> {
    let user_id = request
        .extensions()
        .get::<CallerIdentity>()
        .and_then(|identity| identity.0.as_ref())
        .map(|info| info.user_id.clone());

    // Buffer the request body and hand downstream an identical copy, so
    // extractors can still consume it.
    let (parts, body) = request.into_parts();
    let request_bytes = to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|err| CaptureError::BodyRead(err.to_string()))?;

    let mut record = RequestLog::begin(
        correlation_id,
        user_id,
        parts.method.to_string(),
        parts.uri.path().to_string(),
        body_text(&request_bytes),
    );

    // Initial write happens strictly before the handler runs: if the call
    // never returns, this record is the only evidence it existed.
    state.logger.record_request_start(&record).await?;

    let request = Request::from_parts(parts, Body::from(request_bytes));
    let response = next.run(request).await;

    if response.extensions().get::<ApiError>().is_some() {
        // The failure unwinds past this layer; the record stays incomplete.
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let response_bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|err| CaptureError::BodyRead(err.to_string()))?;

    record.complete(
        parts.status.as_u16(),
        body_text(&response_bytes),
        started.elapsed(),
    );
    state.logger.record_request_end(&record).await?;
    metrics::record_request(&record.http_method, parts.status.as_u16(), started);

    Ok(Response::from_parts(parts, Body::from(response_bytes)))
}

/// The capture itself failed; answer with a server error that carries the
/// correlation id so the caller can report it.
fn capture_failure_response(correlation_id: Uuid, failure: &CaptureError) -> Response {
    let body = ErrorResponse {
        message: GENERIC_ERROR_MESSAGE.to_string(),
        detail: Some(failure.to_string()),
        log_id: Some(correlation_id),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

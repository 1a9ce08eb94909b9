//! Error classification middleware.
//!
//! Outermost application layer. Mints the per-call correlation context on
//! the way in; on the way out, turns a classified failure into exactly one
//! JSON error response and one Error-severity trace record. The trace is
//! persisted on a best-effort basis: if the resilient logger itself fails,
//! the failure is logged to the process console and the response is written
//! regardless — a logging outage never costs the caller their error body.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::audit::record::TraceRecord;
use crate::audit::resilient::ResilientLogger;
use crate::error::{ApiError, ErrorResponse, GENERIC_ERROR_MESSAGE, SUPPORT_DETAIL};
use crate::http::context::RequestContext;
use crate::observability::metrics;

#[derive(Clone)]
pub struct ClassifyState {
    pub logger: Arc<ResilientLogger>,
}

pub async fn classify_errors(
    State(state): State<ClassifyState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let context = RequestContext::new();
    request.extensions_mut().insert(context);

    let method = request.method().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let Some(error) = response.extensions().get::<ApiError>().cloned() else {
        return response;
    };

    let correlation_id = context.correlation_id();
    let trace = TraceRecord::error(correlation_id, error.to_string(), error.diagnostic());
    if let Err(persist_err) = state.logger.record_trace(&trace).await {
        // Fallback channel: the trace is lost to the primary sink, but the
        // failure itself must not take the response down with it.
        tracing::error!(
            log_id = %correlation_id,
            error = %persist_err,
            "failed to persist failure trace"
        );
    }
    tracing::error!(log_id = %correlation_id, error = %error, "request failed");

    let status = error.status();
    metrics::record_request(&method, status.as_u16(), started);

    let internal = status == StatusCode::INTERNAL_SERVER_ERROR;
    let body = ErrorResponse {
        message: GENERIC_ERROR_MESSAGE.to_string(),
        detail: Some(if internal {
            SUPPORT_DETAIL.to_string()
        } else {
            error.to_string()
        }),
        log_id: internal.then_some(correlation_id),
    };

    (status, Json(body)).into_response()
}

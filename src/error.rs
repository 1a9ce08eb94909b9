//! Closed error taxonomy for the API.
//!
//! Every failure a handler can produce is one of these kinds, so the
//! status-code classification in the error layer is an exhaustive match
//! checked at compile time. Handlers return `Err(ApiError)`; the value rides
//! the response as an extension until the classification layer renders it.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fixed top-level message of every error body.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred processing your request.";

/// Detail text for 500 responses; the real cause stays server-side.
pub const SUPPORT_DETAIL: &str = "Contact our support and send the LogId returned.";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Input failed validation (duplicate key, malformed payload).
    #[error("{0}")]
    Validation(String),

    /// A business rule was violated (e-mail format, password policy).
    #[error("{0}")]
    BusinessRule(String),

    /// Missing, invalid, or insufficient credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected internal failure.
    #[error("{message}")]
    Internal {
        message: String,
        /// Diagnostic detail (source chain) persisted with the trace,
        /// never sent to the caller.
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: None,
        }
    }

    /// Internal failure with diagnostic detail for the trace record.
    pub fn internal_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Classification table. First match wins; the match is exhaustive, so
    /// adding a kind without a row fails to compile.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stack-like diagnostic detail for the trace record, if any.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            ApiError::Internal { detail, .. } => detail.clone(),
            _ => None,
        }
    }
}

/// A failing handler produces a bare response carrying the error as an
/// extension; the classification layer turns it into the client-facing JSON
/// body. The status is set here too, so the error still renders sensibly if
/// the layer is not mounted.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.status();
        response.extensions_mut().insert(self);
        response
    }
}

/// Client-facing error body.
///
/// `log_id` is populated only for 500 responses: correlation ids are
/// surfaced to callers only when the failure is unexpected enough to
/// warrant contacting support.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub detail: Option<String>,
    pub log_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BusinessRule("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn into_response_attaches_the_error_as_an_extension() {
        let response = ApiError::NotFound("missing".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let carried = response.extensions().get::<ApiError>().unwrap();
        assert!(matches!(carried, ApiError::NotFound(_)));
    }

    #[test]
    fn error_body_uses_camel_case_on_the_wire() {
        let body = ErrorResponse {
            message: GENERIC_ERROR_MESSAGE.into(),
            detail: Some("bad".into()),
            log_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], GENERIC_ERROR_MESSAGE);
        assert_eq!(json["detail"], "bad");
        assert!(json["logId"].is_null());
    }
}

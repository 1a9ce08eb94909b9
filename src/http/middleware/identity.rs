//! Identity extraction middleware.
//!
//! Resolves the `Authorization: Bearer` token into a caller identity and
//! attaches it to the request. This layer never rejects: enforcement lives
//! in the handlers, so unauthorized calls still travel the full pipeline
//! and get audited and classified like any other failure.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::tokens::{AuthInfo, TokenIssuer};

/// Caller identity attached to every request passing this layer.
/// `None` for anonymous callers and unknown or expired tokens.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Option<AuthInfo>);

#[derive(Clone)]
pub struct IdentityState {
    pub tokens: Arc<TokenIssuer>,
}

pub async fn extract_identity(
    State(state): State<IdentityState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.validate(token));

    request.extensions_mut().insert(CallerIdentity(identity));
    next.run(request).await
}

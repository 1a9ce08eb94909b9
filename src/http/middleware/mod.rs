//! Request pipeline middleware.
//!
//! # Ordering
//! ```text
//! inbound → classify.rs (mint correlation context, render failures)
//!         → identity.rs (resolve bearer token, never rejects)
//!         → capture.rs (two-phase audit record, transparent buffering)
//!         → timeout → handler
//! ```
//!
//! The order is load-bearing: classification owns the correlation id and
//! must sit outside capture so a failure skips the completion update, and
//! identity must sit outside capture so the audit record sees the caller.
//! `http::server::build_router` is the single place the order is wired.

pub mod capture;
pub mod classify;
pub mod identity;

pub use capture::{capture_request, CaptureState};
pub use classify::{classify_errors, ClassifyState};
pub use identity::{extract_identity, CallerIdentity, IdentityState};

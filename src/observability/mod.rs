//! Observability subsystem.
//!
//! Structured logging is initialized in `main` via `tracing-subscriber`;
//! this module owns the metrics side. Audit logging is a separate concern
//! with its own subsystem (`crate::audit`).

pub mod metrics;

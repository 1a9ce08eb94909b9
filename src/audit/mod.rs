//! Audit logging subsystem.
//!
//! # Data Flow
//! ```text
//! Capture / classification layers
//!     → resilient.rs (absorbs primary-sink failures)
//!         → store.rs (LogStore trait)
//!             → postgres.rs (durable store of record)
//!             → memory.rs (development and tests)
//!         → telemetry queue (best-effort secondary sink)
//! ```
//!
//! # Design Decisions
//! - Records are keyed by correlation id; no cross-call ordering is assumed
//! - The primary sink may fail; callers above the resilient logger never see
//!   that failure take down a request
//! - Record identity (correlation id, trace sequence) is assigned exactly
//!   once and never mutated

pub mod memory;
pub mod postgres;
pub mod record;
pub mod resilient;
pub mod store;

pub use memory::MemoryLogStore;
pub use postgres::PostgresLogStore;
pub use record::{body_text, RequestLog, Severity, TraceRecord};
pub use resilient::ResilientLogger;
pub use store::{LogStore, StoreError};

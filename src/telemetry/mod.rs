//! Secondary telemetry sink subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientLogger
//!     → event.rs (record → wire event, severity derivation)
//!     → queue.rs (bounded queue, detached worker task)
//!     → sink.rs (transport trait)
//!         → http.rs (remote observability endpoint)
//!         → noop.rs (telemetry disabled)
//! ```
//!
//! The secondary sink is strictly best-effort: enqueueing never blocks a
//! request, a full queue drops the event, and transport failures stop at the
//! worker. Nothing in this module can affect a call's outcome.

pub mod event;
pub mod http;
pub mod noop;
pub mod queue;
pub mod sink;

pub use event::TelemetryEvent;
pub use http::HttpTelemetrySink;
pub use noop::NoopTelemetrySink;
pub use queue::{spawn_telemetry_worker, TelemetryQueue};
pub use sink::{SinkError, TelemetrySink};

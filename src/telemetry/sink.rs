//! Transport boundary for the secondary sink.

use async_trait::async_trait;
use std::error::Error;

use crate::telemetry::event::TelemetryEvent;

pub type SinkError = Box<dyn Error + Send + Sync>;

/// Destination for [`TelemetryEvent`]s.
///
/// `send` is called from the queue worker task, never from a request task.
/// Transport failures are returned to the worker, which logs and discards
/// them; they are never retried and never reach request handling.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError>;
}

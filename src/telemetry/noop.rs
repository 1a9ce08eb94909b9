//! No-op sink used when telemetry is disabled.

use async_trait::async_trait;

use crate::telemetry::event::TelemetryEvent;
use crate::telemetry::sink::{SinkError, TelemetrySink};

pub struct NoopTelemetrySink;

#[async_trait]
impl TelemetrySink for NoopTelemetrySink {
    async fn send(&self, _event: &TelemetryEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

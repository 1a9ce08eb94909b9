//! HTTP adapter for a remote observability endpoint.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::schema::TelemetryConfig;
use crate::telemetry::event::TelemetryEvent;
use crate::telemetry::sink::{SinkError, TelemetrySink};

/// Ships events to an external log-ingestion endpoint.
///
/// The endpoint and the shared-secret header are configuration values, not
/// process-wide constants; the same adapter serves any vendor that accepts
/// a JSON event array authenticated by a fixed header.
pub struct HttpTelemetrySink {
    client: Client,
    endpoint: String,
    header_name: String,
    license_key: String,
}

impl HttpTelemetrySink {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            header_name: config.header_name.clone(),
            license_key: config.license_key.clone(),
        }
    }
}

#[async_trait]
impl TelemetrySink for HttpTelemetrySink {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(self.header_name.as_str(), self.license_key.as_str())
            .json(&event.to_wire())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("telemetry endpoint returned {}", response.status()).into())
        }
    }
}

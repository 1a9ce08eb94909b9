//! Telemetry wire events.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::audit::record::{RequestLog, Severity, TraceRecord};

/// One event bound for the secondary sink.
///
/// Severity for a trace is taken verbatim from the record; for a request it
/// is derived from the status code (≥ 500 error, ≥ 400 warning, else info).
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub level: &'static str,
    pub log: Value,
}

impl TelemetryEvent {
    pub fn from_trace(trace: &TraceRecord) -> Self {
        Self {
            message: trace.message.clone(),
            timestamp: Utc::now(),
            level: trace.level.telemetry_label(),
            log: serde_json::to_value(trace).unwrap_or(Value::Null),
        }
    }

    pub fn from_request(log: &RequestLog) -> Self {
        let status = log.status_code.unwrap_or(0);
        let level = if status >= 500 {
            Severity::Error
        } else if status >= 400 {
            Severity::Warning
        } else {
            Severity::Info
        };
        Self {
            message: format!("{} {} - {}", log.http_method, log.path, status),
            timestamp: Utc::now(),
            level: level.telemetry_label(),
            log: serde_json::to_value(log).unwrap_or(Value::Null),
        }
    }

    /// Request body for the outbound call: an array of one object, with the
    /// original record nested under `attributes.log` in camelCase.
    pub fn to_wire(&self) -> Value {
        json!([{
            "message": self.message,
            "timestamp": self.timestamp.timestamp_millis(),
            "attributes": {
                "level": self.level,
                "log": self.log,
            },
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn request_severity_is_derived_from_status() {
        let mut log = RequestLog::begin(Uuid::new_v4(), None, "GET".into(), "/users".into(), None);

        log.complete(200, None, Duration::ZERO);
        assert_eq!(TelemetryEvent::from_request(&log).level, "INFO");

        log.status_code = Some(404);
        assert_eq!(TelemetryEvent::from_request(&log).level, "WARNING");

        log.status_code = Some(503);
        assert_eq!(TelemetryEvent::from_request(&log).level, "ERROR");
    }

    #[test]
    fn trace_severity_is_verbatim() {
        let trace = TraceRecord::new(Uuid::new_v4(), Severity::Critical, "boom".into(), None);
        assert_eq!(TelemetryEvent::from_trace(&trace).level, "CRITICAL");
    }

    #[test]
    fn wire_shape_is_an_array_of_one_event() {
        let trace = TraceRecord::error(Uuid::new_v4(), "boom".into(), Some("at main".into()));
        let wire = TelemetryEvent::from_trace(&trace).to_wire();

        let events = wire.as_array().unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event["message"], "boom");
        assert!(event["timestamp"].is_i64());
        assert_eq!(event["attributes"]["level"], "ERROR");
        assert_eq!(event["attributes"]["log"]["message"], "boom");
        assert_eq!(event["attributes"]["log"]["stackTrace"], "at main");
    }
}

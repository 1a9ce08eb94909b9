//! Audit record types.
//!
//! Two record shapes flow through the logging pipeline: [`RequestLog`], one
//! per inbound call, written in two phases (initial write before the handler
//! runs, completion update after), and [`TraceRecord`], one per diagnostic or
//! failure event. Both carry the call's correlation id as the join key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Severity of a trace record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Canonical name as persisted by the primary sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "Trace",
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }

    /// Upper-cased label used in the secondary sink's `attributes.level`.
    pub fn telemetry_label(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Audit entry for one inbound call, spanning start to completion.
///
/// `start_date` is fixed at creation. The completion fields (`status_code`,
/// `response_body`, `end_date`, `duration_ms`) are set exactly once by
/// [`RequestLog::complete`] after the downstream call returns. A call that
/// never returns leaves the record permanently incomplete; that is an
/// accepted trade-off, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub log_id: Uuid,
    /// Caller identity; `None` for unauthenticated calls.
    pub user_id: Option<String>,
    pub http_method: String,
    pub path: String,
    pub status_code: Option<u16>,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
}

impl RequestLog {
    /// Create the initial record, before the downstream call runs.
    pub fn begin(
        log_id: Uuid,
        user_id: Option<String>,
        http_method: String,
        path: String,
        request_body: Option<String>,
    ) -> Self {
        Self {
            log_id,
            user_id,
            http_method,
            path,
            status_code: None,
            request_body,
            response_body: None,
            start_date: Utc::now(),
            end_date: None,
            duration_ms: None,
        }
    }

    /// Fill in the completion fields after the downstream call returned.
    ///
    /// `elapsed` comes from a monotonic clock so the recorded duration is
    /// immune to wall-clock adjustments mid-call.
    pub fn complete(&mut self, status_code: u16, response_body: Option<String>, elapsed: Duration) {
        self.status_code = Some(status_code);
        self.response_body = response_body;
        self.end_date = Some(Utc::now());
        self.duration_ms = Some(elapsed.as_millis() as i64);
    }
}

/// Single diagnostic or failure event.
///
/// The correlation id and message are mandatory by construction. The
/// sequence-assigned `trace_id` is owned by the primary sink and handed out
/// at insert time; the record itself is never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub log_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: Severity,
    pub message: String,
    pub stack_trace: Option<String>,
}

impl TraceRecord {
    pub fn new(log_id: Uuid, level: Severity, message: String, stack_trace: Option<String>) -> Self {
        Self {
            log_id,
            timestamp: Utc::now(),
            level,
            message,
            stack_trace,
        }
    }

    /// Error-severity trace for an unhandled request failure.
    pub fn error(log_id: Uuid, message: String, stack_trace: Option<String>) -> Self {
        Self::new(log_id, Severity::Error, message, stack_trace)
    }
}

/// Decode captured body bytes for persistence.
///
/// Empty and whitespace-only bodies are recorded as absent rather than as
/// empty strings, so the audit table distinguishes "no body" from "body".
pub fn body_text(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}

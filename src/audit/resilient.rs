//! Resilient logger.
//!
//! Single choke point through which every audit record flows. Absorbs
//! primary-sink outages: a failed primary write is mirrored to the secondary
//! sink as a synthesized error trace and then re-raised to the owning
//! middleware layer, which swallows it after logging. Nothing in here may
//! crash a request.

use std::sync::Arc;

use crate::audit::record::{RequestLog, Severity, TraceRecord};
use crate::audit::store::{LogStore, StoreError};
use crate::telemetry::{TelemetryEvent, TelemetryQueue};

pub struct ResilientLogger {
    store: Arc<dyn LogStore>,
    telemetry: TelemetryQueue,
    /// Mirror records to the secondary sink in addition to using it as a
    /// fallback. Driven by the telemetry `enabled` configuration flag.
    mirror: bool,
}

impl ResilientLogger {
    pub fn new(store: Arc<dyn LogStore>, telemetry: TelemetryQueue, mirror: bool) -> Self {
        Self {
            store,
            telemetry,
            mirror,
        }
    }

    /// Persist a trace record.
    ///
    /// An empty message is a caller bug, rejected before either sink is
    /// touched. Traces are always mirrored when telemetry is on. On primary
    /// failure the original error is returned after the fallback paths ran;
    /// the calling layer owns the decision to swallow it.
    pub async fn record_trace(&self, trace: &TraceRecord) -> Result<i64, StoreError> {
        if trace.message.trim().is_empty() {
            return Err(StoreError::Contract("trace message must not be empty".into()));
        }

        if self.mirror {
            self.telemetry.enqueue(TelemetryEvent::from_trace(trace));
        }

        match self.store.insert_trace(trace).await {
            Ok(trace_id) => Ok(trace_id),
            Err(err) => {
                self.on_primary_failure(trace.log_id, format!("error persisting trace: {err}"));
                Err(err)
            }
        }
    }

    /// Persist the initial request record, before the handler runs.
    ///
    /// Never mirrored: the status code is not known yet, and mirroring every
    /// start would double secondary-sink traffic with no diagnostic value.
    pub async fn record_request_start(&self, log: &RequestLog) -> Result<(), StoreError> {
        self.mirror_request(log);
        match self.store.insert_request(log).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.on_primary_failure(log.log_id, format!("error persisting request log: {err}"));
                Err(err)
            }
        }
    }

    /// Persist the completion update after the handler returned.
    pub async fn record_request_end(&self, log: &RequestLog) -> Result<(), StoreError> {
        self.mirror_request(log);
        match self.store.update_request(log).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.on_primary_failure(log.log_id, format!("error updating request log: {err}"));
                Err(err)
            }
        }
    }

    fn mirror_request(&self, log: &RequestLog) {
        if self.mirror && log.status_code.is_some() {
            self.telemetry.enqueue(TelemetryEvent::from_request(log));
        }
    }

    /// Fallback path for a failed primary write: describe the failure to the
    /// secondary sink and the process logger. Runs regardless of the mirror
    /// flag, since this is the only remaining copy of the information.
    fn on_primary_failure(&self, log_id: uuid::Uuid, message: String) {
        tracing::error!(log_id = %log_id, "{message}");
        let failure = TraceRecord::new(log_id, Severity::Error, message, None);
        self.telemetry.enqueue(TelemetryEvent::from_trace(&failure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::memory::MemoryLogStore;
    use crate::telemetry::sink::SinkError;
    use crate::telemetry::{spawn_telemetry_worker, TelemetrySink};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<TelemetryEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TelemetrySink for RecordingSink {
        async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl LogStore for FailingStore {
        async fn insert_request(&self, _log: &RequestLog) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("injected outage".into()))
        }

        async fn update_request(&self, _log: &RequestLog) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("injected outage".into()))
        }

        async fn insert_trace(&self, _trace: &TraceRecord) -> Result<i64, StoreError> {
            Err(StoreError::Unavailable("injected outage".into()))
        }
    }

    fn logger_with(
        store: Arc<dyn LogStore>,
        mirror: bool,
    ) -> (ResilientLogger, Arc<RecordingSink>) {
        let sink = RecordingSink::new();
        let (queue, _worker) = spawn_telemetry_worker(sink.clone(), 64);
        (ResilientLogger::new(store, queue, mirror), sink)
    }

    async fn drain() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn empty_message_is_a_contract_violation() {
        let (logger, sink) = logger_with(Arc::new(MemoryLogStore::new()), true);
        let trace = TraceRecord::error(Uuid::new_v4(), "   ".into(), None);

        let err = logger.record_trace(&trace).await.unwrap_err();
        assert!(matches!(err, StoreError::Contract(_)));

        drain().await;
        assert!(sink.events().is_empty(), "contract violations touch no sink");
    }

    #[tokio::test]
    async fn start_is_never_mirrored_but_completion_is() {
        let store = Arc::new(MemoryLogStore::new());
        let (logger, sink) = logger_with(store, true);
        let mut log = RequestLog::begin(Uuid::new_v4(), None, "GET".into(), "/users".into(), None);

        logger.record_request_start(&log).await.unwrap();
        drain().await;
        assert!(sink.events().is_empty(), "no status code yet, no mirror");

        log.complete(200, None, Duration::from_millis(1));
        logger.record_request_end(&log).await.unwrap();
        drain().await;
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.events()[0].level, "INFO");
    }

    #[tokio::test]
    async fn primary_failure_mirrors_a_failure_trace_and_reraises() {
        let (logger, sink) = logger_with(Arc::new(FailingStore), false);
        let log_id = Uuid::new_v4();
        let trace = TraceRecord::error(log_id, "boom".into(), None);

        let err = logger.record_trace(&trace).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        drain().await;
        let events = sink.events();
        assert_eq!(events.len(), 1, "fallback trace reaches the secondary sink");
        assert!(events[0].message.contains("error persisting trace"));
        assert_eq!(events[0].level, "ERROR");
        assert_eq!(events[0].log["logId"], log_id.to_string());
    }

    #[tokio::test]
    async fn mirror_and_fallback_both_fire_when_primary_is_down() {
        let (logger, sink) = logger_with(Arc::new(FailingStore), true);
        let trace = TraceRecord::error(Uuid::new_v4(), "boom".into(), None);

        let _ = logger.record_trace(&trace).await;

        drain().await;
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "boom");
        assert!(events[1].message.contains("error persisting trace"));
    }
}

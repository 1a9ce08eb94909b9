//! Bounded queue between request tasks and the telemetry transport.
//!
//! Forwarding to the secondary sink is fire-and-forget, but modeled as an
//! explicit bounded channel with a single worker task rather than as
//! unawaited futures: a flood of failures cannot grow unbounded concurrent
//! work, and a dead remote endpoint costs at most `capacity` buffered
//! events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::telemetry::event::TelemetryEvent;
use crate::telemetry::sink::TelemetrySink;

/// Cloneable producer handle held by the resilient logger.
#[derive(Clone)]
pub struct TelemetryQueue {
    tx: mpsc::Sender<TelemetryEvent>,
    dropped: Arc<AtomicU64>,
}

impl TelemetryQueue {
    /// Enqueue an event without blocking. A full queue drops the event and
    /// counts the drop; the caller's request is never delayed.
    pub fn enqueue(&self, event: TelemetryEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("telemetry queue full, dropping event");
        }
    }

    /// Events dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Spawn the worker task draining the queue into `sink`.
///
/// Sink failures are logged and swallowed here; this is the boundary past
/// which no telemetry failure travels.
pub fn spawn_telemetry_worker(
    sink: Arc<dyn TelemetrySink>,
    capacity: usize,
) -> (TelemetryQueue, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<TelemetryEvent>(capacity.max(16));
    let dropped = Arc::new(AtomicU64::new(0));

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(err) = sink.send(&event).await {
                tracing::warn!(error = %err, "telemetry sink rejected event");
            }
        }
    });

    (TelemetryQueue { tx, dropped }, handle)
}

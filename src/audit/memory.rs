//! In-memory log store.
//!
//! Keeps audit records in process memory. Used when no database is
//! configured and as the primary sink in tests, where its accessors let
//! assertions inspect exactly what the pipeline persisted.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::audit::record::{RequestLog, TraceRecord};
use crate::audit::store::{LogStore, StoreError};

/// Trace row with the sequence id the store assigned at insert.
#[derive(Debug, Clone)]
pub struct StoredTrace {
    pub trace_id: i64,
    pub record: TraceRecord,
}

#[derive(Default)]
pub struct MemoryLogStore {
    requests: DashMap<Uuid, RequestLog>,
    traces: Mutex<Vec<StoredTrace>>,
    next_trace_id: AtomicI64,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a request record by correlation id.
    pub fn request(&self, log_id: &Uuid) -> Option<RequestLog> {
        self.requests.get(log_id).map(|entry| entry.value().clone())
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Snapshot of all request records, in no particular order.
    pub fn requests(&self) -> Vec<RequestLog> {
        self.requests
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Snapshot of all persisted traces, in insertion order.
    pub fn traces(&self) -> Vec<StoredTrace> {
        self.traces.lock().expect("trace store poisoned").clone()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn insert_request(&self, log: &RequestLog) -> Result<(), StoreError> {
        self.requests.insert(log.log_id, log.clone());
        Ok(())
    }

    async fn update_request(&self, log: &RequestLog) -> Result<(), StoreError> {
        if !self.requests.contains_key(&log.log_id) {
            return Err(StoreError::UnknownRequest(log.log_id));
        }
        self.requests.insert(log.log_id, log.clone());
        Ok(())
    }

    async fn insert_trace(&self, trace: &TraceRecord) -> Result<i64, StoreError> {
        let trace_id = self.next_trace_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.traces
            .lock()
            .map_err(|_| StoreError::Unavailable("trace store poisoned".into()))?
            .push(StoredTrace {
                trace_id,
                record: trace.clone(),
            });
        Ok(trace_id)
    }
}

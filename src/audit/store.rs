//! Primary sink boundary.
//!
//! The primary sink is the durable store of record for audit data. It is an
//! external collaborator: implementations transport records to a concrete
//! backend (PostgreSQL in production, memory in development and tests) and
//! may fail transiently. Resilience lives one level up, in
//! [`crate::audit::resilient::ResilientLogger`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::record::{RequestLog, TraceRecord};

/// Failures surfaced by a [`LogStore`].
///
/// `Contract` marks a caller bug and is never retried or mirrored; the other
/// variants are treated as transient sink outages.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid record: {0}")]
    Contract(String),

    #[error("unknown request log {0}")]
    UnknownRequest(Uuid),

    #[error("log store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

/// Durable destination for audit records.
///
/// Request records are written twice, keyed by `log_id`: `insert_request`
/// before the downstream call runs, `update_request` after it returns. Trace
/// inserts return the sequence id the sink assigned to the row.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn insert_request(&self, log: &RequestLog) -> Result<(), StoreError>;

    async fn update_request(&self, log: &RequestLog) -> Result<(), StoreError>;

    async fn insert_trace(&self, trace: &TraceRecord) -> Result<i64, StoreError>;
}

//! Shared utilities for integration testing.
//!
//! Spawns the real server on an ephemeral port with swappable audit
//! collaborators: an inspectable in-memory primary sink (or an injected
//! outage), and a recording secondary sink.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use accounts_api::audit::{
    LogStore, MemoryLogStore, RequestLog, ResilientLogger, StoreError, TraceRecord,
};
use accounts_api::config::schema::{AppConfig, BootstrapAdmin};
use accounts_api::http::{AppState, HttpServer};
use accounts_api::lifecycle::Shutdown;
use accounts_api::telemetry::{spawn_telemetry_worker, SinkError, TelemetryEvent, TelemetrySink};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Adm1n!pass";

/// Secondary sink that records every event it is handed.
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
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

/// Primary sink with a total injected outage.
pub struct FailingLogStore;

#[async_trait]
impl LogStore for FailingLogStore {
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

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    /// Inspectable primary sink; `None` when the app runs with an outage.
    pub store: Option<Arc<MemoryLogStore>>,
    pub sink: Arc<RecordingSink>,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// The in-memory audit store backing this app.
    #[allow(dead_code)]
    pub fn audit(&self) -> &MemoryLogStore {
        self.store.as_ref().expect("app runs without a memory store")
    }

    /// Log in as the seeded administrator and return the bearer token.
    #[allow(dead_code)]
    pub async fn login_admin(&self) -> String {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "userId": ADMIN_ID, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), 200, "admin login should succeed");
        let body: serde_json::Value = response.json().await.unwrap();
        body["token"].as_str().expect("token in login body").to_string()
    }

    /// Give the detached telemetry worker a moment to drain.
    #[allow(dead_code)]
    pub async fn drain_telemetry(&self) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Spawn the app with an in-memory primary sink.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryLogStore::new());
    spawn_app_with(store.clone(), Some(store)).await
}

/// Spawn the app with the primary sink down.
#[allow(dead_code)]
pub async fn spawn_app_with_failing_store() -> TestApp {
    spawn_app_with(Arc::new(FailingLogStore), None).await
}

async fn spawn_app_with(
    store: Arc<dyn LogStore>,
    memory: Option<Arc<MemoryLogStore>>,
) -> TestApp {
    let sink = RecordingSink::new();
    let (queue, _worker) = spawn_telemetry_worker(sink.clone(), 64);
    let logger = Arc::new(ResilientLogger::new(store, queue, true));

    let mut config = AppConfig::default();
    config.auth.bootstrap_admin = Some(BootstrapAdmin {
        user_id: ADMIN_ID.to_string(),
        name: "Administrator".to_string(),
        email: "admin@example.com".to_string(),
        password: ADMIN_PASSWORD.to_string(),
    });

    let state = AppState::from_config(&config, logger).unwrap();
    if let Some(admin) = &config.auth.bootstrap_admin {
        state.users.bootstrap(admin).await;
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(&config, state);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    // Wait until the listener answers.
    for _ in 0..50 {
        if client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    TestApp {
        addr,
        client,
        store: memory,
        sink,
        shutdown,
    }
}

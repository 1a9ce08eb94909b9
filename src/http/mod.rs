//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, pipeline wiring)
//!     → middleware/ (classification, identity, capture)
//!     → handlers/ (auth, users, health, docs)
//! ```

pub mod context;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use context::RequestContext;
pub use server::{build_router, AppState, HttpServer};

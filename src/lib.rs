//! Accounts API
//!
//! A user account management service (CRUD + login) whose request pipeline
//! audits every call and classifies every failure.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────────────┐
//!                    │                     ACCOUNTS API                       │
//!                    │                                                        │
//!  Client Request    │  ┌──────────┐   ┌──────────┐   ┌──────────┐           │
//!  ──────────────────┼─▶│ classify │──▶│ identity │──▶│ capture  │──▶ users/ │
//!                    │  │  layer   │   │  layer   │   │  layer   │    auth   │
//!                    │  └────┬─────┘   └──────────┘   └────┬─────┘  handlers │
//!                    │       │ failures                    │ audit records   │
//!                    │       ▼                             ▼                 │
//!                    │  ┌────────────────────────────────────────┐           │
//!                    │  │            resilient logger            │           │
//!                    │  └───────┬──────────────────────┬─────────┘           │
//!                    │          ▼                      ▼                     │
//!                    │  ┌──────────────┐      ┌─────────────────┐            │
//!                    │  │ primary sink │      │ telemetry queue │            │
//!                    │  │  (postgres)  │      │ → remote sink   │            │
//!                    │  └──────────────┘      └─────────────────┘            │
//!                    │                                                       │
//!                    │  Cross-cutting: config, observability, lifecycle      │
//!                    └───────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline guarantees: one correlation id per call shared by every
//! record, the initial audit write lands before the handler runs, and no
//! logging failure — primary sink down, secondary sink down, or both — ever
//! costs a caller their response.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;

// Audit pipeline
pub mod audit;
pub mod telemetry;

// Business collaborators
pub mod auth;
pub mod users;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

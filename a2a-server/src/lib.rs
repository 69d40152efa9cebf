//! # A2A Protocol Engine
//!
//! A transport-agnostic server engine for the Agent2Agent (A2A) task-exchange
//! protocol over JSON-RPC 2.0. The engine decodes request envelopes, routes
//! the seven protocol methods, tracks task lifecycles through an atomic store
//! and a pure state machine, and fans live updates out to bounded subscriber
//! streams.
//!
//! HTTP routing, authentication and webhook delivery live outside this crate;
//! a transport feeds raw request bodies into [`server::A2aServer::handle`]
//! and frames the resulting bytes or update stream itself.
//!
//! ```no_run
//! use std::sync::Arc;
//! use a2a_server::config::ServerConfig;
//! use a2a_server::executor::NoopExecutor;
//! use a2a_server::server::{A2aServer, Outcome};
//!
//! # async fn run() {
//! let server = A2aServer::new(Arc::new(NoopExecutor), ServerConfig::default());
//! let body = br#"{"jsonrpc":"2.0","method":"tasks/get","params":{"id":"t1"},"id":1}"#;
//! match server.handle(body).await {
//!     Outcome::Bytes(_bytes) => { /* write the response body */ }
//!     Outcome::Stream { .. } => { /* frame events, e.g. as SSE */ }
//! }
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod executor;
pub mod server;
pub mod task;

pub use config::ServerConfig;
pub use errors::{A2aError, Result};
pub use executor::{AgentExecutor, AgentHandle, NoopExecutor};
pub use server::{A2aServer, Outcome};
pub use task::{AgentUpdate, InMemoryTaskStore, StatusEvent, TaskStore};

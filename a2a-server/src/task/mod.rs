//! Task lifecycle and storage.

pub mod lifecycle;
pub mod store;

pub use lifecycle::{transition, StatusEvent};
pub use store::{AgentUpdate, InMemoryTaskStore, SendOutcome, TaskStore};

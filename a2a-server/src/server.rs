//! Server wiring: the byte-level entry point a transport plugs into.

use std::sync::Arc;

use a2a_types::RequestId;
use tracing::debug;

use crate::codec;
use crate::config::ServerConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::errors::A2aError;
use crate::events::hub::{SubscriptionHub, UpdateStream};
use crate::executor::AgentExecutor;
use crate::task::store::{InMemoryTaskStore, TaskStore};

/// The result of handling one request body.
pub enum Outcome {
    /// An encoded JSON-RPC response, success or error.
    Bytes(Vec<u8>),
    /// A live update stream for a streaming method, with the request id the
    /// transport needs to frame each event.
    Stream {
        id: Option<RequestId>,
        stream: UpdateStream,
    },
}

/// The A2A protocol engine, assembled.
///
/// Owns the store, hub, executor and config; construction is explicit, no
/// globals. The transport feeds request bodies into [`A2aServer::handle`] and
/// writes back whatever comes out.
pub struct A2aServer {
    dispatcher: Dispatcher,
    hub: Arc<SubscriptionHub>,
    store: Arc<dyn TaskStore>,
}

impl A2aServer {
    /// Builds a server around the in-memory store.
    pub fn new(executor: Arc<dyn AgentExecutor>, config: ServerConfig) -> Self {
        let hub = Arc::new(SubscriptionHub::new(config.subscriber_buffer));
        let store: Arc<dyn TaskStore> =
            Arc::new(InMemoryTaskStore::new(Arc::clone(&hub)));
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store), executor, config),
            hub,
            store,
        }
    }

    /// Builds a server around a caller-provided store. The store must publish
    /// its events through the given hub.
    pub fn with_store(
        store: Arc<dyn TaskStore>,
        hub: Arc<SubscriptionHub>,
        executor: Arc<dyn AgentExecutor>,
        config: ServerConfig,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store), executor, config),
            hub,
            store,
        }
    }

    /// The store this server mutates, for driving task progress externally.
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    /// Handles one raw request body: decode, dispatch, encode. Every failure
    /// is folded into an encoded error response; this never panics and never
    /// returns malformed bytes.
    pub async fn handle(&self, bytes: &[u8]) -> Outcome {
        let request = match codec::decode_request(bytes) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "request rejected at the envelope");
                return Outcome::Bytes(codec::encode_error(None, err.to_wire()));
            }
        };

        let id = request.id.clone();
        match self.dispatcher.dispatch(request).await {
            Ok(DispatchOutcome::Response(response)) => match codec::encode_response(&response) {
                Ok(bytes) => Outcome::Bytes(bytes),
                Err(err) => {
                    Outcome::Bytes(codec::encode_error(response.id, err.to_wire()))
                }
            },
            Ok(DispatchOutcome::Stream { id, stream }) => Outcome::Stream { id, stream },
            Err(err) => {
                if matches!(err, A2aError::Internal { .. }) {
                    tracing::warn!(error = %err, "internal error while dispatching");
                }
                Outcome::Bytes(codec::encode_error(id, err.to_wire()))
            }
        }
    }

    /// Closes every live subscriber stream and clears the registries.
    pub fn shutdown(&self) {
        self.hub.shutdown();
    }
}

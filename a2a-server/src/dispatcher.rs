//! Method dispatch.
//!
//! Maps the seven A2A method names onto the store, the hub and the executor.
//! Unary methods produce a [`a2a_types::JsonRpcResponse`]; the streaming
//! methods produce an update stream the transport frames however it likes
//! (SSE, WebSocket, ...).

use std::sync::Arc;

use a2a_types::{
    JsonRpcRequest, JsonRpcResponse, RequestId, TaskIdParams, TaskPushNotificationConfig,
    TasksCancelParams, TasksGetParams, TasksSendParams, METHOD_CANCEL, METHOD_GET,
    METHOD_PUSH_NOTIFICATION_GET, METHOD_PUSH_NOTIFICATION_SET, METHOD_RESUBSCRIBE, METHOD_SEND,
    METHOD_SEND_SUBSCRIBE,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ServerConfig;
use crate::errors::{A2aError, Result};
use crate::events::hub::UpdateStream;
use crate::executor::{AgentExecutor, AgentHandle};
use crate::task::store::TaskStore;

/// What a dispatched method produced.
pub enum DispatchOutcome {
    /// A unary response, ready for encoding.
    Response(JsonRpcResponse),
    /// A live update stream; the request id is carried alongside so the
    /// transport can frame each event.
    Stream {
        id: Option<RequestId>,
        stream: UpdateStream,
    },
}

// The stream has no useful textual form; show the variant and the id.
impl std::fmt::Debug for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Response(response) => {
                f.debug_tuple("Response").field(response).finish()
            }
            DispatchOutcome::Stream { id, .. } => {
                f.debug_struct("Stream").field("id", id).finish_non_exhaustive()
            }
        }
    }
}

pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
    executor: Arc<dyn AgentExecutor>,
    config: ServerConfig,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn TaskStore>,
        executor: Arc<dyn AgentExecutor>,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// Routes a validated request to its handler.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Result<DispatchOutcome> {
        let id = request.id.clone();
        debug!(method = %request.method, "dispatching");
        match request.method.as_str() {
            METHOD_SEND => {
                let params: TasksSendParams = typed_params(request.params)?;
                let outcome = self.store.send(params, false).await?;
                self.spawn_executor(outcome.task.clone());
                self.respond(id, &outcome.task)
            }
            METHOD_GET => {
                let params: TasksGetParams = typed_params(request.params)?;
                let task = self.store.get(&params.id, params.history_length).await?;
                self.respond(id, &task)
            }
            METHOD_CANCEL => {
                let params: TasksCancelParams = typed_params(request.params)?;
                let task = self.store.cancel(&params.id, params.reason).await?;
                let executor = Arc::clone(&self.executor);
                let snapshot = task.clone();
                tokio::spawn(async move { executor.on_cancel(snapshot).await });
                self.respond(id, &task)
            }
            METHOD_PUSH_NOTIFICATION_SET => {
                if !self.config.push_notifications {
                    return Err(A2aError::PushNotificationNotSupported);
                }
                let params: TaskPushNotificationConfig = typed_params(request.params)?;
                let config = self.store.set_push_notification_config(params).await?;
                self.respond(id, &config)
            }
            METHOD_PUSH_NOTIFICATION_GET => {
                if !self.config.push_notifications {
                    return Err(A2aError::PushNotificationNotSupported);
                }
                let params: TaskIdParams = typed_params(request.params)?;
                let config = self.store.get_push_notification_config(&params.id).await?;
                let result = match config {
                    Some(config) => serde_json::to_value(TaskPushNotificationConfig {
                        id: params.id,
                        push_notification_config: config,
                    })?,
                    None => json!({ "id": params.id }),
                };
                Ok(DispatchOutcome::Response(JsonRpcResponse::success(
                    id, result,
                )))
            }
            METHOD_SEND_SUBSCRIBE => {
                self.require_streaming(METHOD_SEND_SUBSCRIBE)?;
                let params: TasksSendParams = typed_params(request.params)?;
                let outcome = self.store.send(params, true).await?;
                self.spawn_executor(outcome.task);
                let stream = outcome.stream.ok_or_else(|| {
                    A2aError::internal("send with attach_subscription returned no stream")
                })?;
                Ok(DispatchOutcome::Stream { id, stream })
            }
            METHOD_RESUBSCRIBE => {
                self.require_streaming(METHOD_RESUBSCRIBE)?;
                let params: TaskIdParams = typed_params(request.params)?;
                let stream = self
                    .store
                    .resubscribe(&params.id, self.config.replay_terminal_on_resubscribe)
                    .await?;
                Ok(DispatchOutcome::Stream { id, stream })
            }
            other => Err(A2aError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }

    fn respond<T: serde::Serialize>(
        &self,
        id: Option<RequestId>,
        result: &T,
    ) -> Result<DispatchOutcome> {
        Ok(DispatchOutcome::Response(JsonRpcResponse::success(
            id,
            serde_json::to_value(result)?,
        )))
    }

    fn require_streaming(&self, method: &str) -> Result<()> {
        if self.config.streaming {
            Ok(())
        } else {
            Err(A2aError::UnsupportedOperation {
                operation: method.to_string(),
            })
        }
    }

    fn spawn_executor(&self, task: a2a_types::Task) {
        let executor = Arc::clone(&self.executor);
        let handle = AgentHandle::new(task.id.clone(), Arc::clone(&self.store));
        tokio::spawn(async move { executor.on_send(task, handle).await });
    }
}

fn typed_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|e| A2aError::InvalidParams {
        message: e.to_string(),
    })
}

//! Error taxonomy for the A2A protocol engine.
//!
//! Every variant maps to a stable JSON-RPC error code via [`A2aError::code`],
//! and [`A2aError::to_wire`] produces the error object sent to clients.
//! Engine-internal kinds (`InvalidTransition`, `SessionConflict`,
//! `SubscriberLagged`) fold onto the closest wire code when surfaced.

use a2a_types::{JsonRpcError, TaskState};
use serde_json::json;

pub type Result<T> = std::result::Result<T, A2aError>;

/// Everything that can go wrong inside the protocol engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2aError {
    /// The request body was not valid JSON.
    #[error("JSON parse error: {message}")]
    JsonParse { message: String },

    /// The request body was valid JSON but not a valid JSON-RPC request.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The requested method does not exist.
    #[error("method not found: {method}")]
    MethodNotFound { method: String },

    /// The method parameters failed to deserialize or validate.
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    /// An internal error, details logged but never sent on the wire.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// The referenced task does not exist.
    #[error("task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// The task is in a state where it cannot be canceled.
    #[error("task {task_id} cannot be canceled in state {state}")]
    TaskNotCancelable { task_id: String, state: TaskState },

    /// Push notifications are disabled for this agent.
    #[error("push notifications are not supported")]
    PushNotificationNotSupported,

    /// The requested operation is not supported.
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    /// The requested content types are incompatible with the agent.
    #[error("content type not supported: {content_type}")]
    ContentTypeNotSupported { content_type: String },

    /// A status event does not apply to the task's current state.
    #[error("invalid transition from {from:?} on {event}")]
    InvalidTransition { from: Option<TaskState>, event: String },

    /// A task id was reused with a different session id.
    #[error("task {task_id} already belongs to a different session")]
    SessionConflict {
        task_id: String,
        existing: Option<String>,
        requested: Option<String>,
    },

    /// A subscriber fell too far behind and its stream was terminated.
    #[error("subscriber for task {task_id} lagged and was dropped")]
    SubscriberLagged { task_id: String },
}

impl A2aError {
    /// The stable JSON-RPC error code this error surfaces as.
    pub fn code(&self) -> i32 {
        match self {
            A2aError::JsonParse { .. } => a2a_types::JSON_PARSE_ERROR_CODE,
            A2aError::InvalidRequest { .. } => a2a_types::INVALID_REQUEST_ERROR_CODE,
            A2aError::MethodNotFound { .. } => a2a_types::METHOD_NOT_FOUND_ERROR_CODE,
            A2aError::InvalidParams { .. } | A2aError::SessionConflict { .. } => {
                a2a_types::INVALID_PARAMS_ERROR_CODE
            }
            A2aError::Internal { .. } | A2aError::SubscriberLagged { .. } => {
                a2a_types::INTERNAL_ERROR_CODE
            }
            A2aError::TaskNotFound { .. } => a2a_types::TASK_NOT_FOUND_ERROR_CODE,
            A2aError::TaskNotCancelable { .. } => a2a_types::TASK_NOT_CANCELABLE_ERROR_CODE,
            A2aError::PushNotificationNotSupported => {
                a2a_types::PUSH_NOTIFICATION_NOT_SUPPORTED_ERROR_CODE
            }
            A2aError::UnsupportedOperation { .. } | A2aError::InvalidTransition { .. } => {
                a2a_types::UNSUPPORTED_OPERATION_ERROR_CODE
            }
            A2aError::ContentTypeNotSupported { .. } => {
                a2a_types::CONTENT_TYPE_NOT_SUPPORTED_ERROR_CODE
            }
        }
    }

    /// Converts this error into the JSON-RPC error object sent to clients.
    ///
    /// Wire messages are the canonical defaults for each code; internal detail
    /// goes into `data` only where it helps the caller (never for
    /// [`A2aError::Internal`]).
    pub fn to_wire(&self) -> JsonRpcError {
        match self {
            A2aError::JsonParse { .. } => JsonRpcError::json_parse(),
            A2aError::InvalidRequest { .. } => JsonRpcError::invalid_request(),
            A2aError::MethodNotFound { method } => {
                JsonRpcError::method_not_found().with_data(json!({ "method": method }))
            }
            A2aError::InvalidParams { message } => {
                JsonRpcError::invalid_params().with_data(json!({ "detail": message }))
            }
            A2aError::SessionConflict {
                task_id,
                existing,
                requested,
            } => JsonRpcError::invalid_params().with_data(json!({
                "id": task_id,
                "sessionId": existing,
                "requestedSessionId": requested,
            })),
            A2aError::Internal { .. } | A2aError::SubscriberLagged { .. } => {
                JsonRpcError::internal()
            }
            A2aError::TaskNotFound { task_id } => {
                JsonRpcError::task_not_found().with_data(json!({ "id": task_id }))
            }
            A2aError::TaskNotCancelable { task_id, state } => JsonRpcError::task_not_cancelable()
                .with_data(json!({ "id": task_id, "state": state })),
            A2aError::PushNotificationNotSupported => {
                JsonRpcError::push_notification_not_supported()
            }
            A2aError::UnsupportedOperation { operation } => JsonRpcError::unsupported_operation()
                .with_data(json!({ "operation": operation })),
            A2aError::InvalidTransition { from, event } => JsonRpcError::unsupported_operation()
                .with_data(json!({ "from": from, "event": event })),
            A2aError::ContentTypeNotSupported { content_type } => {
                JsonRpcError::content_type_not_supported()
                    .with_data(json!({ "contentType": content_type }))
            }
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        A2aError::Internal {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for A2aError {
    fn from(err: serde_json::Error) -> Self {
        A2aError::Internal {
            message: format!("serialization error: {err}"),
        }
    }
}

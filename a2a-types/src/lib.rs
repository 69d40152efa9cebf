//! # A2A (Agent2Agent) Protocol Types
//!
//! This crate provides the Rust data structures for the Agent2Agent (A2A)
//! task-exchange protocol, layered on JSON-RPC 2.0. The types are derived from
//! the protocol's JSON wire schema and are designed for serialization and
//! deserialization with `serde`.
//!
//! The protocol lets a client:
//! - Submit work to an agent as a `Task` and follow it to a terminal outcome.
//! - Exchange conversation turns as `Message`s made of typed `Part`s.
//! - Collect indexed `Artifact`s produced by the agent during execution.
//! - Subscribe to live `TaskStatusUpdateEvent` / `TaskArtifactUpdateEvent`
//!   streams while a task runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod agent_card;
pub use agent_card::{AgentCapabilities, AgentCard, AgentProvider, AgentSkills, Skill};

// ============================================================================
// JSON-RPC 2.0 Envelope Types
// ============================================================================

/// The JSON-RPC protocol version carried by every envelope. MUST be exactly "2.0".
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 correlation identifier: a UTF-8 string or a 32-bit signed
/// integer, never both.
///
/// The variant is fixed at creation and preserved exactly across a round-trip;
/// the string `"1"` and the integer `1` are distinct identifiers. Floats,
/// booleans and `null` are rejected at the codec boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i32),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        RequestId::Number(value)
    }
}

/// Represents a JSON-RPC 2.0 Request object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The version of the JSON-RPC protocol. MUST be exactly "2.0".
    pub jsonrpc: String,
    /// A string containing the name of the method to be invoked.
    pub method: String,
    /// A structured value holding the parameter values for the method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// A unique identifier established by the client. Omitted for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: Some(params),
            id: Some(id.into()),
        }
    }
}

/// Represents a JSON-RPC 2.0 Response object.
///
/// A well-formed response carries exactly one of `result` or `error`; the
/// codec enforces this before any bytes are produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// The version of the JSON-RPC protocol. MUST be exactly "2.0".
    pub jsonrpc: String,
    /// The value produced by the invoked method. Mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// An object describing the failure. Mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// The identifier established by the client, echoed back verbatim.
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Represents a JSON-RPC 2.0 Error object, included in an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// A number that indicates the error type that occurred.
    pub code: i32,
    /// A short description of the error.
    pub message: String,
    /// A primitive or structured value with additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// Standard JSON-RPC 2.0 error codes.
pub const JSON_PARSE_ERROR_CODE: i32 = -32700;
pub const INVALID_REQUEST_ERROR_CODE: i32 = -32600;
pub const METHOD_NOT_FOUND_ERROR_CODE: i32 = -32601;
pub const INVALID_PARAMS_ERROR_CODE: i32 = -32602;
pub const INTERNAL_ERROR_CODE: i32 = -32603;

// A2A-specific error codes.
pub const TASK_NOT_FOUND_ERROR_CODE: i32 = -32001;
pub const TASK_NOT_CANCELABLE_ERROR_CODE: i32 = -32002;
pub const PUSH_NOTIFICATION_NOT_SUPPORTED_ERROR_CODE: i32 = -32003;
pub const UNSUPPORTED_OPERATION_ERROR_CODE: i32 = -32004;
pub const CONTENT_TYPE_NOT_SUPPORTED_ERROR_CODE: i32 = -32005;

impl JsonRpcError {
    fn new(code: i32, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    /// An error indicating that the server received invalid JSON.
    pub fn json_parse() -> Self {
        Self::new(JSON_PARSE_ERROR_CODE, "Invalid JSON payload")
    }

    /// An error indicating that the JSON sent is not a valid Request object.
    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST_ERROR_CODE, "Request payload validation error")
    }

    /// An error indicating that the requested method does not exist.
    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND_ERROR_CODE, "Method not found")
    }

    /// An error indicating that the method parameters are invalid.
    pub fn invalid_params() -> Self {
        Self::new(INVALID_PARAMS_ERROR_CODE, "Invalid parameters")
    }

    /// An error indicating an internal error on the server.
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_CODE, "Internal error")
    }

    /// An A2A-specific error indicating that the requested task ID was not found.
    pub fn task_not_found() -> Self {
        Self::new(TASK_NOT_FOUND_ERROR_CODE, "Task not found")
    }

    /// An A2A-specific error indicating that the task is in a state where it
    /// cannot be canceled.
    pub fn task_not_cancelable() -> Self {
        Self::new(TASK_NOT_CANCELABLE_ERROR_CODE, "Task cannot be canceled")
    }

    /// An A2A-specific error indicating that the agent does not support push
    /// notifications.
    pub fn push_notification_not_supported() -> Self {
        Self::new(
            PUSH_NOTIFICATION_NOT_SUPPORTED_ERROR_CODE,
            "Push Notification is not supported",
        )
    }

    /// An A2A-specific error indicating that the requested operation is not
    /// supported by the agent.
    pub fn unsupported_operation() -> Self {
        Self::new(UNSUPPORTED_OPERATION_ERROR_CODE, "This operation is not supported")
    }

    /// An A2A-specific error indicating an incompatibility between the
    /// requested content types and the agent's capabilities.
    pub fn content_type_not_supported() -> Self {
        Self::new(CONTENT_TYPE_NOT_SUPPORTED_ERROR_CODE, "Content type not supported")
    }

    /// Attaches additional structured detail to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ============================================================================
// A2A RPC Method Names
// ============================================================================

/// The method name for sending a message to start or continue a task.
pub const METHOD_SEND: &str = "tasks/send";
/// The method name for getting a task snapshot.
pub const METHOD_GET: &str = "tasks/get";
/// The method name for canceling a task.
pub const METHOD_CANCEL: &str = "tasks/cancel";
/// The method name for setting push notification configuration.
pub const METHOD_PUSH_NOTIFICATION_SET: &str = "tasks/pushNotification/set";
/// The method name for getting push notification configuration.
pub const METHOD_PUSH_NOTIFICATION_GET: &str = "tasks/pushNotification/get";
/// The method name for sending a task and subscribing to its updates.
pub const METHOD_SEND_SUBSCRIBE: &str = "tasks/sendSubscribe";
/// The method name for resubscribing to task updates.
pub const METHOD_RESUBSCRIBE: &str = "tasks/resubscribe";

// ============================================================================
// A2A Core Protocol Types
// ============================================================================

/// Defines the lifecycle states of a Task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// The task has been submitted and is awaiting execution.
    Submitted,
    /// The agent is actively working on the task.
    Working,
    /// The task is paused and waiting for input from the user.
    InputRequired,
    /// The task has been successfully completed.
    Completed,
    /// The task failed due to an error during execution.
    Failed,
    /// The task was canceled before reaching completion.
    Canceled,
}

impl TaskState {
    /// Whether this state is terminal. Terminal states have no outgoing
    /// transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed | TaskState::Canceled)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// An error that occurred during task execution, carried by a failed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    /// A machine-readable error code, agent-specific.
    pub code: String,
    /// A human-readable description of the failure.
    pub message: String,
}

/// Represents the status of a task at a specific point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// The current state of the task's lifecycle.
    pub state: TaskState,
    /// When this status was recorded.
    pub timestamp: DateTime<Utc>,
    /// An optional, human-readable note about the current status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The execution error, present only when `state` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,
}

/// Identifies the sender of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// For messages sent by the client/user.
    User,
    /// For messages sent by the agent/service.
    Agent,
}

/// Optional auxiliary annotation carried by a [`Part`]. Opaque to the
/// protocol engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartMetadata {
    #[serde(skip_serializing_if = "Option::is_none", rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<Value>,
}

/// The fundamental content unit within a [`Message`] or [`Artifact`]: a tagged
/// union over text, file and structured-data payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Plain text content.
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<PartMetadata>,
    },
    /// File content, provided either as base64-encoded bytes or as a URI.
    File {
        #[serde(skip_serializing_if = "Option::is_none", rename = "fileBytes")]
        file_bytes: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", rename = "fileUri")]
        file_uri: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
        mime_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<PartMetadata>,
    },
    /// Structured JSON data.
    Data {
        data: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<PartMetadata>,
    },
}

impl Part {
    /// Creates a new text part with the provided content.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Creates a new data part with the provided structured content.
    pub fn data(data: Value) -> Self {
        Part::Data { data, metadata: None }
    }

    /// Creates a new file part with base64-encoded content.
    pub fn file_bytes(
        bytes: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Part::File {
            file_bytes: Some(bytes.into()),
            file_uri: None,
            mime_type: Some(mime_type.into()),
            metadata: Some(PartMetadata {
                file_name: Some(file_name.into()),
                ..Default::default()
            }),
        }
    }

    /// Creates a new file part with a URI reference.
    pub fn file_uri(
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Part::File {
            file_bytes: None,
            file_uri: Some(uri.into()),
            mime_type: Some(mime_type.into()),
            metadata: Some(PartMetadata {
                file_name: Some(file_name.into()),
                ..Default::default()
            }),
        }
    }
}

/// Represents a single communication turn between the client and the agent.
/// Never mutated after being appended to a task's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifies the sender. `user` for the client, `agent` for the service.
    pub role: Role,
    /// An array of content parts that form the message body.
    pub parts: Vec<Part>,
}

impl Message {
    /// Creates a new message with the user role.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    /// Creates a new message with the agent role.
    pub fn agent(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Agent,
            parts,
        }
    }
}

/// An output produced by the agent during task execution.
///
/// The `index` is the artifact's slot within its task: unique, not
/// necessarily contiguous. Resending an existing index replaces that
/// artifact (last-write-wins per index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// The content parts that make up the artifact.
    pub parts: Vec<Part>,
    /// The artifact's slot within the task.
    pub index: u32,
    /// An optional, human-readable name for the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Opaque labels attached by the agent, passed through uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Value>,
}

impl Artifact {
    /// Creates a new artifact at the given index.
    pub fn new(index: u32, title: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            parts,
            index,
            title: Some(title.into()),
            labels: None,
        }
    }
}

/// A reference to another task, used for lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    /// The identifier of the referenced task.
    pub id: String,
}

/// The central unit of work in the A2A protocol, tracked through its
/// lifecycle from submission to a terminal outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// A unique identifier for the task, assigned by the client on creation.
    pub id: String,
    /// An optional grouping key, opaque to the engine.
    #[serde(skip_serializing_if = "Option::is_none", rename = "sessionId")]
    pub session_id: Option<String>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Outputs produced by the agent, keyed by artifact index.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub artifacts: Vec<Artifact>,
    /// The conversation so far, in chronological order. Append-only.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub history: Vec<Message>,
    /// Output MIME types the client is prepared to accept. Stored verbatim.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        rename = "acceptedOutputModes",
        default
    )]
    pub accepted_output_modes: Vec<String>,
    /// The push notification configuration registered for this task, if any.
    #[serde(skip_serializing_if = "Option::is_none", rename = "pushNotifications")]
    pub push_notifications: Option<PushNotificationConfig>,
    /// When the task was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// When the task was last mutated. Advances on every accepted mutation.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Optional metadata, passed through uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// The task this one was spawned from. Immutable after creation.
    #[serde(skip_serializing_if = "Option::is_none", rename = "parentTask")]
    pub parent_task: Option<TaskRef>,
    /// Earlier tasks this one follows on from. Immutable after creation.
    #[serde(skip_serializing_if = "Vec::is_empty", rename = "prevTasks", default)]
    pub prev_tasks: Vec<TaskRef>,
}

// ============================================================================
// Push Notification Configuration
// ============================================================================

/// Authentication details for a push notification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationInfo {
    /// Supported authentication schemes (e.g. 'Basic', 'Bearer').
    pub schemes: Vec<String>,
    /// Optional credentials required by the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
}

/// Configuration for delivering task updates to a client-provided endpoint.
/// The engine stores and validates this; delivery itself is external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotificationConfig {
    /// The callback URL where the agent should send push notifications.
    pub url: String,
    /// A token to validate incoming push notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Authentication details for calling the notification URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationInfo>,
}

// ============================================================================
// A2A Method Parameter Types
// ============================================================================

/// Parameters for `tasks/send` and `tasks/sendSubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksSendParams {
    /// The task identifier, assigned by the client.
    pub id: String,
    /// Optional session grouping key.
    #[serde(skip_serializing_if = "Option::is_none", rename = "sessionId")]
    pub session_id: Option<String>,
    /// Output MIME types the client is prepared to accept.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        rename = "acceptedOutputModes",
        default
    )]
    pub accepted_output_modes: Vec<String>,
    /// The message being sent to the agent.
    pub message: Message,
    /// The task this one is spawned from. Applied only at creation.
    #[serde(skip_serializing_if = "Option::is_none", rename = "parentTask")]
    pub parent_task: Option<TaskRef>,
    /// Earlier tasks this one follows on from. Applied only at creation.
    #[serde(skip_serializing_if = "Vec::is_empty", rename = "prevTasks", default)]
    pub prev_tasks: Vec<TaskRef>,
    /// Optional metadata, passed through uninterpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl TasksSendParams {
    pub fn new(id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            session_id: None,
            accepted_output_modes: Vec::new(),
            message,
            parent_task: None,
            prev_tasks: Vec::new(),
            metadata: None,
        }
    }
}

/// Parameters for `tasks/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksGetParams {
    /// The unique identifier of the task.
    pub id: String,
    /// The number of most recent history messages to include in the snapshot.
    #[serde(skip_serializing_if = "Option::is_none", rename = "historyLength")]
    pub history_length: Option<u32>,
}

/// Parameters for `tasks/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksCancelParams {
    /// The unique identifier of the task.
    pub id: String,
    /// An optional human-readable reason for the cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Parameters containing only a task ID, used by `tasks/pushNotification/get`
/// and `tasks/resubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskIdParams {
    /// The unique identifier of the task.
    pub id: String,
}

/// Associates a push notification configuration with a specific task; the
/// params of `tasks/pushNotification/set` and the result of both
/// push-notification methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPushNotificationConfig {
    /// The unique identifier of the task.
    pub id: String,
    /// The push notification configuration for this task.
    #[serde(rename = "pushNotificationConfig")]
    pub push_notification_config: PushNotificationConfig,
}

// ============================================================================
// Streaming Event Types
// ============================================================================

/// An event notifying subscribers of a change in a task's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusUpdateEvent {
    /// The ID of the task that was updated.
    pub id: String,
    /// The new status of the task.
    pub status: TaskStatus,
    /// If true, this is the last event in the stream for this task.
    #[serde(rename = "final", default)]
    pub is_final: bool,
}

/// An event notifying subscribers that an artifact was produced or replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskArtifactUpdateEvent {
    /// The ID of the task this artifact belongs to.
    pub id: String,
    /// The artifact that was added or updated in this mutation.
    pub artifact: Artifact,
}

/// A single item on a task's subscription stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskUpdateEvent {
    Status(TaskStatusUpdateEvent),
    Artifact(TaskArtifactUpdateEvent),
}

impl TaskUpdateEvent {
    /// The ID of the task this event belongs to.
    pub fn task_id(&self) -> &str {
        match self {
            TaskUpdateEvent::Status(e) => &e.id,
            TaskUpdateEvent::Artifact(e) => &e.id,
        }
    }

    /// Whether this event closes the stream it is delivered on.
    pub fn is_final(&self) -> bool {
        matches!(self, TaskUpdateEvent::Status(e) if e.is_final)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_variant_survives_round_trip() {
        let string_id: RequestId = serde_json::from_str("\"1\"").unwrap();
        let number_id: RequestId = serde_json::from_str("1").unwrap();
        assert_eq!(string_id, RequestId::String("1".to_string()));
        assert_eq!(number_id, RequestId::Number(1));
        assert_ne!(string_id, number_id);

        assert_eq!(serde_json::to_string(&string_id).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&number_id).unwrap(), "1");
    }

    #[test]
    fn request_id_rejects_float_bool_and_null() {
        assert!(serde_json::from_str::<RequestId>("1.5").is_err());
        assert!(serde_json::from_str::<RequestId>("true").is_err());
        assert!(serde_json::from_str::<RequestId>("null").is_err());
        // Out of i32 range
        assert!(serde_json::from_str::<RequestId>("4294967296").is_err());
    }

    #[test]
    fn part_serializes_with_type_tag() {
        let part = Part::text("hi");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hi");

        let back: Part = serde_json::from_value(json).unwrap();
        assert_eq!(back, part);
    }

    #[test]
    fn task_state_terminal_set() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
    }

    #[test]
    fn task_state_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskState::InputRequired).unwrap(),
            "\"input-required\""
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(JsonRpcError::json_parse().code, -32700);
        assert_eq!(JsonRpcError::invalid_request().code, -32600);
        assert_eq!(JsonRpcError::method_not_found().code, -32601);
        assert_eq!(JsonRpcError::invalid_params().code, -32602);
        assert_eq!(JsonRpcError::internal().code, -32603);
        assert_eq!(JsonRpcError::task_not_found().code, -32001);
        assert_eq!(JsonRpcError::task_not_cancelable().code, -32002);
        assert_eq!(JsonRpcError::push_notification_not_supported().code, -32003);
        assert_eq!(JsonRpcError::unsupported_operation().code, -32004);
        assert_eq!(JsonRpcError::content_type_not_supported().code, -32005);
    }
}

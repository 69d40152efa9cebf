//! Task storage.
//!
//! [`TaskStore`] is the async seam between the protocol surface and
//! persistence; [`InMemoryTaskStore`] is the bundled implementation. Each
//! task lives in its own `tokio::sync::Mutex` slot inside a `DashMap`, and
//! every mutation holds that lock across read-modify-write *and* hub
//! publication, so the events for one task always appear in mutation order.
//! Publication itself is non-blocking, so a slow subscriber can never stall
//! a writer. Tasks never interfere with each other.

use std::sync::Arc;

use a2a_types::{
    Artifact, Message, PushNotificationConfig, Task, TaskArtifactUpdateEvent,
    TaskPushNotificationConfig, TaskState, TaskStatusUpdateEvent, TaskUpdateEvent,
    TasksSendParams,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{A2aError, Result};
use crate::events::hub::{SubscriptionHub, UpdateStream};
use crate::task::lifecycle::{transition, StatusEvent};

/// The result of a `send`: the task snapshot after the mutation, plus the
/// attached update stream when the caller asked for one.
pub struct SendOutcome {
    pub task: Task,
    pub stream: Option<UpdateStream>,
}

// The stream has no useful textual form; show only whether one is attached.
impl std::fmt::Debug for SendOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendOutcome")
            .field("task", &self.task)
            .field("stream", &self.stream.as_ref().map(|_| "UpdateStream"))
            .finish()
    }
}

/// A batch of agent-side progress applied to a task in one atomic step.
///
/// Artifacts are upserted by index, the optional message is appended to
/// history, and the optional status event is validated against the state
/// machine before anything is touched. On the subscriber streams, artifact
/// events precede the status event of the same batch.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub message: Option<Message>,
    pub artifacts: Vec<Artifact>,
    pub status: Option<StatusEvent>,
}

/// Storage seam for tasks and their push-notification configuration.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a task or appends a continuation turn to an existing one.
    ///
    /// With `attach_subscription`, the returned stream is registered inside
    /// the same critical section as the mutation, so it observes every event
    /// from this mutation onward.
    async fn send(&self, params: TasksSendParams, attach_subscription: bool)
        -> Result<SendOutcome>;

    /// Returns a snapshot of a task. `history_length` trims the snapshot's
    /// history to the N most recent messages; the stored task is unaffected.
    async fn get(&self, task_id: &str, history_length: Option<u32>) -> Result<Task>;

    /// Applies agent-side progress to a task.
    async fn append_agent_update(&self, task_id: &str, update: AgentUpdate) -> Result<Task>;

    /// Cancels a task.
    async fn cancel(&self, task_id: &str, reason: Option<String>) -> Result<Task>;

    /// Stores a validated push notification configuration for a task.
    async fn set_push_notification_config(
        &self,
        config: TaskPushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig>;

    /// Returns the push notification configuration for a task, if one is set.
    async fn get_push_notification_config(
        &self,
        task_id: &str,
    ) -> Result<Option<PushNotificationConfig>>;

    /// Attaches a fresh update stream to an existing task. No replay: the
    /// stream observes mutations from now on. For a task already in a
    /// terminal state, `replay_terminal` selects between delivering the
    /// terminal status once and closing immediately.
    async fn resubscribe(&self, task_id: &str, replay_terminal: bool) -> Result<UpdateStream>;
}

/// In-memory [`TaskStore`] backed by a `DashMap` of per-task mutex slots.
pub struct InMemoryTaskStore {
    slots: DashMap<String, Arc<Mutex<Option<Task>>>>,
    hub: Arc<SubscriptionHub>,
}

impl InMemoryTaskStore {
    pub fn new(hub: Arc<SubscriptionHub>) -> Self {
        Self {
            slots: DashMap::new(),
            hub,
        }
    }

    fn slot(&self, task_id: &str) -> Arc<Mutex<Option<Task>>> {
        self.slots
            .entry(task_id.to_string())
            .or_default()
            .clone()
    }

    fn existing_slot(&self, task_id: &str) -> Result<Arc<Mutex<Option<Task>>>> {
        self.slots
            .get(task_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| A2aError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// The next `updatedAt` value: wall clock, bumped by 1 ns past the
    /// previous value when the clock has not advanced. Keeps `updatedAt`
    /// strictly increasing under coarse or stalled clocks.
    fn stamp(prev: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = Utc::now();
        match prev {
            Some(prev) if now <= prev => prev + Duration::nanoseconds(1),
            _ => now,
        }
    }

    fn publish_status(&self, task: &Task) {
        self.hub.publish(
            &task.id,
            TaskUpdateEvent::Status(TaskStatusUpdateEvent {
                id: task.id.clone(),
                status: task.status.clone(),
                is_final: task.status.state.is_terminal(),
            }),
        );
    }

    fn upsert_artifact(task: &mut Task, artifact: Artifact) {
        match task.artifacts.iter_mut().find(|a| a.index == artifact.index) {
            Some(existing) => *existing = artifact,
            None => task.artifacts.push(artifact),
        }
    }
}

fn validate_push_config(config: &PushNotificationConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(A2aError::InvalidParams {
            message: "push notification url must not be empty".to_string(),
        });
    }
    if let Some(auth) = &config.authentication {
        if auth.schemes.is_empty() {
            return Err(A2aError::InvalidParams {
                message: "push notification authentication requires at least one scheme"
                    .to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn send(
        &self,
        params: TasksSendParams,
        attach_subscription: bool,
    ) -> Result<SendOutcome> {
        let slot = self.slot(&params.id);
        let mut guard = slot.lock().await;

        match guard.as_mut() {
            None => {
                let now = Self::stamp(None);
                let status = transition(&params.id, None, &StatusEvent::Submit, now)?;
                let task = Task {
                    id: params.id.clone(),
                    session_id: params.session_id,
                    status,
                    artifacts: Vec::new(),
                    history: vec![params.message],
                    accepted_output_modes: params.accepted_output_modes,
                    push_notifications: None,
                    created_at: now,
                    updated_at: now,
                    metadata: params.metadata,
                    parent_task: params.parent_task,
                    prev_tasks: params.prev_tasks,
                };
                debug!(task_id = %task.id, "task created");

                let stream = attach_subscription.then(|| self.hub.subscribe(&task.id));
                *guard = Some(task.clone());
                self.publish_status(&task);
                Ok(SendOutcome { task, stream })
            }
            Some(task) => {
                if task.status.state.is_terminal() {
                    return Err(A2aError::InvalidTransition {
                        from: Some(task.status.state),
                        event: "send".to_string(),
                    });
                }
                if params.session_id.is_some() && params.session_id != task.session_id {
                    return Err(A2aError::SessionConflict {
                        task_id: task.id.clone(),
                        existing: task.session_id.clone(),
                        requested: params.session_id,
                    });
                }

                let now = Self::stamp(Some(task.updated_at));
                // A turn into a paused task resumes it; a turn into a
                // submitted or working task only extends the conversation.
                let resumed = if task.status.state == TaskState::InputRequired {
                    task.status = transition(&task.id, Some(&task.status.state),
                        &StatusEvent::Continue, now)?;
                    true
                } else {
                    false
                };
                task.history.push(params.message);
                task.updated_at = now;
                debug!(task_id = %task.id, resumed, "continuation turn appended");

                let stream = attach_subscription.then(|| self.hub.subscribe(&task.id));
                let snapshot = task.clone();
                if resumed {
                    self.publish_status(&snapshot);
                }
                Ok(SendOutcome {
                    task: snapshot,
                    stream,
                })
            }
        }
    }

    async fn get(&self, task_id: &str, history_length: Option<u32>) -> Result<Task> {
        let slot = self.existing_slot(task_id)?;
        let guard = slot.lock().await;
        let task = guard.as_ref().ok_or_else(|| A2aError::TaskNotFound {
            task_id: task_id.to_string(),
        })?;
        let mut snapshot = task.clone();
        if let Some(n) = history_length {
            let n = n as usize;
            if snapshot.history.len() > n {
                snapshot.history.drain(..snapshot.history.len() - n);
            }
        }
        Ok(snapshot)
    }

    async fn append_agent_update(&self, task_id: &str, update: AgentUpdate) -> Result<Task> {
        let slot = self.existing_slot(task_id)?;
        let mut guard = slot.lock().await;
        let task = guard.as_mut().ok_or_else(|| A2aError::TaskNotFound {
            task_id: task_id.to_string(),
        })?;

        let now = Self::stamp(Some(task.updated_at));

        // Validate the transition before touching anything; a rejected batch
        // leaves the task untouched.
        let next_status = update
            .status
            .as_ref()
            .map(|event| transition(&task.id, Some(&task.status.state), event, now))
            .transpose()?;

        let mut artifact_events = Vec::with_capacity(update.artifacts.len());
        for artifact in update.artifacts {
            artifact_events.push(TaskUpdateEvent::Artifact(TaskArtifactUpdateEvent {
                id: task.id.clone(),
                artifact: artifact.clone(),
            }));
            Self::upsert_artifact(task, artifact);
        }
        if let Some(message) = update.message {
            task.history.push(message);
        }
        if let Some(status) = next_status {
            task.status = status;
        }
        task.updated_at = now;

        let snapshot = task.clone();
        debug!(task_id = %snapshot.id, state = %snapshot.status.state, "agent update applied");

        // Artifacts first, then the (possibly final) status event.
        for event in artifact_events {
            self.hub.publish(&snapshot.id, event);
        }
        if update.status.is_some() {
            self.publish_status(&snapshot);
        }
        Ok(snapshot)
    }

    async fn cancel(&self, task_id: &str, reason: Option<String>) -> Result<Task> {
        let slot = self.existing_slot(task_id)?;
        let mut guard = slot.lock().await;
        let task = guard.as_mut().ok_or_else(|| A2aError::TaskNotFound {
            task_id: task_id.to_string(),
        })?;

        let now = Self::stamp(Some(task.updated_at));
        task.status = transition(
            &task.id,
            Some(&task.status.state),
            &StatusEvent::Canceled { reason },
            now,
        )?;
        task.updated_at = now;

        let snapshot = task.clone();
        debug!(task_id = %snapshot.id, "task canceled");
        self.publish_status(&snapshot);
        Ok(snapshot)
    }

    async fn set_push_notification_config(
        &self,
        config: TaskPushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig> {
        validate_push_config(&config.push_notification_config)?;

        let slot = self.existing_slot(&config.id)?;
        let mut guard = slot.lock().await;
        let task = guard.as_mut().ok_or_else(|| A2aError::TaskNotFound {
            task_id: config.id.clone(),
        })?;

        task.push_notifications = Some(config.push_notification_config.clone());
        task.updated_at = Self::stamp(Some(task.updated_at));
        debug!(task_id = %task.id, "push notification config set");
        Ok(config)
    }

    async fn get_push_notification_config(
        &self,
        task_id: &str,
    ) -> Result<Option<PushNotificationConfig>> {
        let slot = self.existing_slot(task_id)?;
        let guard = slot.lock().await;
        let task = guard.as_ref().ok_or_else(|| A2aError::TaskNotFound {
            task_id: task_id.to_string(),
        })?;
        Ok(task.push_notifications.clone())
    }

    async fn resubscribe(&self, task_id: &str, replay_terminal: bool) -> Result<UpdateStream> {
        let slot = self.existing_slot(task_id)?;
        let guard = slot.lock().await;
        let task = guard.as_ref().ok_or_else(|| A2aError::TaskNotFound {
            task_id: task_id.to_string(),
        })?;

        if task.status.state.is_terminal() {
            let items = if replay_terminal {
                vec![Ok(TaskUpdateEvent::Status(TaskStatusUpdateEvent {
                    id: task.id.clone(),
                    status: task.status.clone(),
                    is_final: true,
                }))]
            } else {
                Vec::new()
            };
            return Ok(SubscriptionHub::replay(items));
        }
        Ok(self.hub.subscribe(task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_types::{Part, TaskError};
    use tokio::task::JoinSet;

    fn store() -> InMemoryTaskStore {
        InMemoryTaskStore::new(Arc::new(SubscriptionHub::new(64)))
    }

    fn send_params(id: &str, text: &str) -> TasksSendParams {
        TasksSendParams::new(id, Message::user(vec![Part::text(text)]))
    }

    #[tokio::test]
    async fn send_creates_a_submitted_task() {
        let store = store();
        let outcome = store.send(send_params("t1", "hello"), false).await.unwrap();
        assert_eq!(outcome.task.status.state, TaskState::Submitted);
        assert_eq!(outcome.task.history.len(), 1);
        assert!(outcome.stream.is_none());
    }

    #[tokio::test]
    async fn send_outcome_debug_elides_the_stream() {
        let store = store();
        let outcome = store.send(send_params("t1", "hello"), true).await.unwrap();
        let printed = format!("{outcome:?}");
        assert!(printed.contains("UpdateStream"));
        assert!(printed.contains("t1"));
    }

    #[tokio::test]
    async fn send_to_terminal_task_is_rejected() {
        let store = store();
        store.send(send_params("t1", "hello"), false).await.unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Working { reason: None }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = store.send(send_params("t1", "again"), false).await.unwrap_err();
        assert!(matches!(err, A2aError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn session_conflict_leaves_store_unchanged() {
        let store = store();
        let mut params = send_params("t1", "hello");
        params.session_id = Some("s1".to_string());
        store.send(params, false).await.unwrap();

        let mut conflicting = send_params("t1", "again");
        conflicting.session_id = Some("s2".to_string());
        let err = store.send(conflicting, false).await.unwrap_err();
        assert!(matches!(err, A2aError::SessionConflict { .. }));

        let task = store.get("t1", None).await.unwrap();
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn concurrent_sends_lose_no_history() {
        let store = Arc::new(store());
        store.send(send_params("t1", "turn 0"), false).await.unwrap();

        let mut join_set = JoinSet::new();
        for i in 1..=20 {
            let store = Arc::clone(&store);
            join_set.spawn(async move {
                store
                    .send(send_params("t1", &format!("turn {i}")), false)
                    .await
                    .unwrap();
            });
        }
        while let Some(res) = join_set.join_next().await {
            res.unwrap();
        }

        let task = store.get("t1", None).await.unwrap();
        assert_eq!(task.history.len(), 21);
    }

    #[tokio::test]
    async fn send_resumes_a_paused_task() {
        let store = store();
        store.send(send_params("t1", "hello"), false).await.unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Working { reason: None }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::InputRequired { reason: None }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let outcome = store.send(send_params("t1", "here you go"), false).await.unwrap();
        assert_eq!(outcome.task.status.state, TaskState::Working);
        assert_eq!(outcome.task.history.len(), 2);
    }

    #[tokio::test]
    async fn artifact_index_upsert_replaces_not_appends() {
        let store = store();
        store.send(send_params("t1", "hello"), false).await.unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Working { reason: None }),
                    artifacts: vec![Artifact::new(0, "draft", vec![Part::text("v1")])],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let task = store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    artifacts: vec![
                        Artifact::new(0, "draft", vec![Part::text("v2")]),
                        Artifact::new(3, "appendix", vec![Part::text("extra")]),
                    ],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(task.artifacts.len(), 2);
        let slot0 = task.artifacts.iter().find(|a| a.index == 0).unwrap();
        assert_eq!(slot0.parts, vec![Part::text("v2")]);
        assert!(task.artifacts.iter().any(|a| a.index == 3));
    }

    #[tokio::test]
    async fn rejected_update_leaves_task_untouched() {
        let store = store();
        store.send(send_params("t1", "hello"), false).await.unwrap();

        // Completed is not reachable from submitted; the artifact in the same
        // batch must not land either.
        let err = store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Completed),
                    artifacts: vec![Artifact::new(0, "draft", vec![Part::text("v1")])],
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, A2aError::InvalidTransition { .. }));

        let task = store.get("t1", None).await.unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
        assert!(task.artifacts.is_empty());
    }

    #[tokio::test]
    async fn cancel_unknown_and_terminal_tasks() {
        let store = store();
        let err = store.cancel("missing", None).await.unwrap_err();
        assert!(matches!(err, A2aError::TaskNotFound { .. }));

        store.send(send_params("t1", "hello"), false).await.unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Working { reason: None }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .append_agent_update(
                "t1",
                AgentUpdate {
                    status: Some(StatusEvent::Failed {
                        error: TaskError {
                            code: "boom".to_string(),
                            message: "it broke".to_string(),
                        },
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = store.cancel("t1", None).await.unwrap_err();
        assert!(matches!(err, A2aError::TaskNotCancelable { .. }));
    }

    #[tokio::test]
    async fn updated_at_strictly_increases() {
        let store = store();
        let t0 = store.send(send_params("t1", "a"), false).await.unwrap().task;
        let t1 = store.send(send_params("t1", "b"), false).await.unwrap().task;
        let t2 = store.send(send_params("t1", "c"), false).await.unwrap().task;
        assert!(t1.updated_at > t0.updated_at);
        assert!(t2.updated_at > t1.updated_at);
        assert_eq!(t2.created_at, t0.created_at);
    }

    #[tokio::test]
    async fn history_length_trims_to_most_recent() {
        let store = store();
        for i in 0..5 {
            store.send(send_params("t1", &format!("turn {i}")), false).await.unwrap();
        }

        let task = store.get("t1", Some(2)).await.unwrap();
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.history[1].parts, vec![Part::text("turn 4")]);

        // Requesting more than exists returns everything; the store keeps it all.
        let task = store.get("t1", Some(100)).await.unwrap();
        assert_eq!(task.history.len(), 5);
    }

    #[tokio::test]
    async fn push_config_round_trip_and_validation() {
        let store = store();
        store.send(send_params("t1", "hello"), false).await.unwrap();

        assert!(store.get_push_notification_config("t1").await.unwrap().is_none());

        let config = TaskPushNotificationConfig {
            id: "t1".to_string(),
            push_notification_config: PushNotificationConfig {
                url: "https://client.example/hook".to_string(),
                token: Some("tok".to_string()),
                authentication: None,
            },
        };
        store.set_push_notification_config(config.clone()).await.unwrap();
        assert_eq!(
            store.get_push_notification_config("t1").await.unwrap(),
            Some(config.push_notification_config)
        );

        let invalid = TaskPushNotificationConfig {
            id: "t1".to_string(),
            push_notification_config: PushNotificationConfig {
                url: String::new(),
                token: None,
                authentication: None,
            },
        };
        let err = store.set_push_notification_config(invalid).await.unwrap_err();
        assert!(matches!(err, A2aError::InvalidParams { .. }));
    }
}

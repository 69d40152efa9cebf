//! The seam between the protocol engine and agent business logic.
//!
//! The dispatcher spawns [`AgentExecutor::on_send`] after every accepted
//! send, never awaiting it inline, so request latency is independent of
//! agent run time. The executor reports progress through an [`AgentHandle`],
//! which funnels everything into [`TaskStore::append_agent_update`] so the
//! usual atomicity and event-ordering rules apply.

use std::sync::Arc;

use a2a_types::{Artifact, Message, Part, Task, TaskError};
use async_trait::async_trait;

use crate::errors::Result;
use crate::task::lifecycle::StatusEvent;
use crate::task::store::{AgentUpdate, TaskStore};

/// Agent business logic plugged into the engine.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Invoked (spawned) after a task is created or receives a new turn.
    /// `task` is a snapshot taken at the time of the send.
    async fn on_send(&self, task: Task, updates: AgentHandle);

    /// Invoked (spawned) after a task is canceled, for cleanup. The default
    /// does nothing.
    async fn on_cancel(&self, _task: Task) {}
}

/// A task-scoped handle the executor uses to report progress.
#[derive(Clone)]
pub struct AgentHandle {
    task_id: String,
    store: Arc<dyn TaskStore>,
}

impl AgentHandle {
    pub fn new(task_id: impl Into<String>, store: Arc<dyn TaskStore>) -> Self {
        Self {
            task_id: task_id.into(),
            store,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Marks the task as working.
    pub async fn working(&self, reason: Option<String>) -> Result<Task> {
        self.update(AgentUpdate {
            status: Some(StatusEvent::Working { reason }),
            ..Default::default()
        })
        .await
    }

    /// Pauses the task until the client sends another turn.
    pub async fn input_required(&self, reason: Option<String>) -> Result<Task> {
        self.update(AgentUpdate {
            status: Some(StatusEvent::InputRequired { reason }),
            ..Default::default()
        })
        .await
    }

    /// Completes the task, optionally with a final agent message.
    pub async fn completed(&self, message: Option<Message>) -> Result<Task> {
        self.update(AgentUpdate {
            message,
            status: Some(StatusEvent::Completed),
            ..Default::default()
        })
        .await
    }

    /// Fails the task with the given error.
    pub async fn failed(&self, error: TaskError) -> Result<Task> {
        self.update(AgentUpdate {
            status: Some(StatusEvent::Failed { error }),
            ..Default::default()
        })
        .await
    }

    /// Appends an agent message to the conversation without changing state.
    pub async fn reply(&self, text: impl Into<String>) -> Result<Task> {
        self.update(AgentUpdate {
            message: Some(Message::agent(vec![Part::text(text)])),
            ..Default::default()
        })
        .await
    }

    /// Adds or replaces an artifact at its index.
    pub async fn add_artifact(&self, artifact: Artifact) -> Result<Task> {
        self.update(AgentUpdate {
            artifacts: vec![artifact],
            ..Default::default()
        })
        .await
    }

    /// Applies a raw update batch, for progress shapes the helpers above
    /// don't cover (e.g. artifacts plus a status change in one atomic step).
    pub async fn update(&self, update: AgentUpdate) -> Result<Task> {
        self.store.append_agent_update(&self.task_id, update).await
    }
}

/// An executor that does nothing. For tests, and for deployments where task
/// progress is driven externally through the store.
pub struct NoopExecutor;

#[async_trait]
impl AgentExecutor for NoopExecutor {
    async fn on_send(&self, _task: Task, _updates: AgentHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::hub::SubscriptionHub;
    use crate::task::store::InMemoryTaskStore;
    use a2a_types::{TaskState, TasksSendParams};

    fn handle() -> (Arc<InMemoryTaskStore>, AgentHandle) {
        let store = Arc::new(InMemoryTaskStore::new(Arc::new(SubscriptionHub::new(16))));
        let handle = AgentHandle::new("t1", store.clone() as Arc<dyn TaskStore>);
        (store, handle)
    }

    #[tokio::test]
    async fn handle_drives_the_task_to_completion() {
        let (store, handle) = handle();
        store
            .send(
                TasksSendParams::new("t1", Message::user(vec![Part::text("go")])),
                false,
            )
            .await
            .unwrap();

        handle.working(None).await.unwrap();
        handle
            .add_artifact(Artifact::new(0, "answer", vec![Part::text("42")]))
            .await
            .unwrap();
        let task = handle
            .completed(Some(Message::agent(vec![Part::text("done")])))
            .await
            .unwrap();

        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.artifacts.len(), 1);
        assert_eq!(task.history.len(), 2);
    }

    #[tokio::test]
    async fn failed_records_the_task_error() {
        let (store, handle) = handle();
        store
            .send(
                TasksSendParams::new("t1", Message::user(vec![Part::text("go")])),
                false,
            )
            .await
            .unwrap();

        handle.working(None).await.unwrap();
        let task = handle
            .failed(TaskError {
                code: "upstream_timeout".to_string(),
                message: "backend did not answer".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(task.status.error.as_ref().unwrap().code, "upstream_timeout");
    }
}

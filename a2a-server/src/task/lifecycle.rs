//! The task state machine.
//!
//! [`transition`] is a pure function: it looks at the current state (or its
//! absence) and a status event and either yields the next [`TaskStatus`] or
//! an error, without touching any storage. The store applies the result
//! atomically; on error the stored task is untouched.

use a2a_types::{TaskError, TaskState, TaskStatus};
use chrono::{DateTime, Utc};

use crate::errors::{A2aError, Result};

/// A requested change to a task's lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// Create the task. Only valid when no task exists yet.
    Submit,
    /// Resume a paused task with new client input.
    Continue,
    /// The agent has started (or is still) working.
    Working { reason: Option<String> },
    /// The agent needs more input from the client.
    InputRequired { reason: Option<String> },
    /// The task finished successfully.
    Completed,
    /// The task failed.
    Failed { error: TaskError },
    /// The task was canceled.
    Canceled { reason: Option<String> },
}

impl StatusEvent {
    /// A short name for logs and error detail.
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::Submit => "submit",
            StatusEvent::Continue => "continue",
            StatusEvent::Working { .. } => "working",
            StatusEvent::InputRequired { .. } => "input-required",
            StatusEvent::Completed => "completed",
            StatusEvent::Failed { .. } => "failed",
            StatusEvent::Canceled { .. } => "canceled",
        }
    }
}

/// Computes the next status for a task, or rejects the event.
///
/// `current` is `None` when no task exists yet (only `Submit` applies).
/// Terminal states have no outgoing transitions: a `Canceled` event against
/// one yields [`A2aError::TaskNotCancelable`] so the wire surface can
/// distinguish it; every other unmatched pair yields
/// [`A2aError::InvalidTransition`].
pub fn transition(
    task_id: &str,
    current: Option<&TaskState>,
    event: &StatusEvent,
    now: DateTime<Utc>,
) -> Result<TaskStatus> {
    let next = match (current, event) {
        (None, StatusEvent::Submit) => status(TaskState::Submitted, now, None, None),

        (Some(TaskState::InputRequired), StatusEvent::Continue) => {
            status(TaskState::Working, now, None, None)
        }

        (
            Some(TaskState::Submitted | TaskState::Working),
            StatusEvent::Working { reason },
        ) => status(TaskState::Working, now, reason.clone(), None),

        (Some(TaskState::Working), StatusEvent::InputRequired { reason }) => {
            status(TaskState::InputRequired, now, reason.clone(), None)
        }

        (
            Some(TaskState::Working | TaskState::InputRequired),
            StatusEvent::Completed,
        ) => status(TaskState::Completed, now, None, None),

        (
            Some(TaskState::Submitted | TaskState::Working | TaskState::InputRequired),
            StatusEvent::Failed { error },
        ) => status(TaskState::Failed, now, None, Some(error.clone())),

        (
            Some(TaskState::Submitted | TaskState::Working | TaskState::InputRequired),
            StatusEvent::Canceled { reason },
        ) => status(TaskState::Canceled, now, reason.clone(), None),

        (Some(state), StatusEvent::Canceled { .. }) if state.is_terminal() => {
            return Err(A2aError::TaskNotCancelable {
                task_id: task_id.to_string(),
                state: *state,
            });
        }

        (from, event) => {
            return Err(A2aError::InvalidTransition {
                from: from.copied(),
                event: event.name().to_string(),
            });
        }
    };
    Ok(next)
}

fn status(
    state: TaskState,
    timestamp: DateTime<Utc>,
    reason: Option<String>,
    error: Option<TaskError>,
) -> TaskStatus {
    TaskStatus {
        state,
        timestamp,
        reason,
        error,
    }
}

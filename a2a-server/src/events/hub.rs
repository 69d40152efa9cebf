//! Per-task subscription fan-out.
//!
//! Each subscriber gets its own bounded `mpsc` channel carrying
//! `Result<TaskUpdateEvent, A2aError>`. Publication never blocks: events are
//! pushed with `try_send`, and a subscriber whose buffer is full is
//! unregistered on the spot and handed a final `Err` from a spawned task.
//! A final status event closes every stream for its task and clears the
//! registry entry, so resubscribing after that observes no replay.

use std::sync::atomic::{AtomicU64, Ordering};

use a2a_types::TaskUpdateEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::errors::A2aError;

/// What a subscriber receives: protocol events, or a single terminal error
/// when the hub had to drop the subscription.
pub type UpdateItem = Result<TaskUpdateEvent, A2aError>;

/// The stream handed to streaming method callers.
pub type UpdateStream = ReceiverStream<UpdateItem>;

struct Subscriber {
    key: u64,
    tx: mpsc::Sender<UpdateItem>,
}

/// Fan-out registry for task update streams.
pub struct SubscriptionHub {
    subscribers: DashMap<String, Vec<Subscriber>>,
    buffer_size: usize,
    next_key: AtomicU64,
}

impl SubscriptionHub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer_size: buffer_size.max(1),
            next_key: AtomicU64::new(0),
        }
    }

    /// Registers a new subscriber for a task and returns its stream.
    ///
    /// Task existence is the store's concern; callers check it before
    /// registering.
    pub fn subscribe(&self, task_id: &str) -> UpdateStream {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        let mut entry = self.subscribers.entry(task_id.to_string()).or_default();
        // Dead senders from dropped receivers would otherwise linger until
        // the next publish for this task.
        entry.retain(|sub| !sub.tx.is_closed());
        entry.push(Subscriber { key, tx });
        debug!(task_id, key, "subscriber registered");
        ReceiverStream::new(rx)
    }

    /// Returns a stream that delivers the given items and then closes,
    /// without touching the registry. Used for terminal-status replay on
    /// resubscribe.
    pub fn replay(items: Vec<UpdateItem>) -> UpdateStream {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            // Capacity covers every item, so this cannot fail.
            let _ = tx.try_send(item);
        }
        ReceiverStream::new(rx)
    }

    /// Delivers an event to every live subscriber of a task.
    ///
    /// Must be called under the task's store lock so per-task event order
    /// equals mutation order. Closed receivers are swept; full receivers are
    /// dropped with a final error delivered out-of-band. If the event is
    /// final the whole registry entry is removed afterwards, closing every
    /// remaining stream.
    pub fn publish(&self, task_id: &str, event: TaskUpdateEvent) {
        let is_final = event.is_final();

        if let Some(mut entry) = self.subscribers.get_mut(task_id) {
            entry.retain(|sub| match sub.tx.try_send(Ok(event.clone())) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(task_id, key = sub.key, "subscriber gone, sweeping");
                    false
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(task_id, key = sub.key, "subscriber lagged, dropping");
                    let tx = sub.tx.clone();
                    let lag_err = A2aError::SubscriberLagged {
                        task_id: task_id.to_string(),
                    };
                    // The buffer is full, so the error has to wait for the
                    // consumer to drain a slot; that wait happens off the
                    // publish path.
                    tokio::spawn(async move {
                        let _ = tx.send(Err(lag_err)).await;
                    });
                    false
                }
            });
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.subscribers.remove_if(task_id, |_, subs| subs.is_empty());
            }
        }

        if is_final {
            // Dropping the senders closes every remaining stream.
            self.subscribers.remove(task_id);
            debug!(task_id, "task reached terminal state, streams closed");
        }
    }

    /// The number of live subscribers for a task.
    pub fn subscriber_count(&self, task_id: &str) -> usize {
        self.subscribers
            .get(task_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Closes every stream and clears the registry.
    pub fn shutdown(&self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_types::{TaskState, TaskStatus, TaskStatusUpdateEvent};
    use chrono::Utc;
    use tokio_stream::StreamExt;

    fn status_event(task_id: &str, state: TaskState, is_final: bool) -> TaskUpdateEvent {
        TaskUpdateEvent::Status(TaskStatusUpdateEvent {
            id: task_id.to_string(),
            status: TaskStatus {
                state,
                timestamp: Utc::now(),
                reason: None,
                error: None,
            },
            is_final,
        })
    }

    #[tokio::test]
    async fn delivers_events_in_publish_order() {
        let hub = SubscriptionHub::new(8);
        let mut stream = hub.subscribe("t1");

        hub.publish("t1", status_event("t1", TaskState::Submitted, false));
        hub.publish("t1", status_event("t1", TaskState::Working, false));

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        match (first, second) {
            (TaskUpdateEvent::Status(a), TaskUpdateEvent::Status(b)) => {
                assert_eq!(a.status.state, TaskState::Submitted);
                assert_eq!(b.status.state, TaskState::Working);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[tokio::test]
    async fn final_event_closes_all_streams() {
        let hub = SubscriptionHub::new(8);
        let mut a = hub.subscribe("t1");
        let mut b = hub.subscribe("t1");

        hub.publish("t1", status_event("t1", TaskState::Completed, true));

        assert!(a.next().await.unwrap().unwrap().is_final());
        assert!(b.next().await.unwrap().unwrap().is_final());
        assert!(a.next().await.is_none());
        assert!(b.next().await.is_none());
        assert_eq!(hub.subscriber_count("t1"), 0);
    }

    #[tokio::test]
    async fn events_are_isolated_per_task() {
        let hub = SubscriptionHub::new(8);
        let mut a = hub.subscribe("t1");
        let _b = hub.subscribe("t2");

        hub.publish("t1", status_event("t1", TaskState::Working, false));
        hub.publish("t2", status_event("t2", TaskState::Working, false));

        let event = a.next().await.unwrap().unwrap();
        assert_eq!(event.task_id(), "t1");
    }

    #[tokio::test]
    async fn slow_subscriber_is_dropped_with_an_error() {
        let hub = SubscriptionHub::new(1);
        let mut slow = hub.subscribe("t1");
        let mut fast = hub.subscribe("t1");

        // First event fills the slow subscriber's single-slot buffer; the
        // second overflows it. The fast subscriber drains as it goes.
        hub.publish("t1", status_event("t1", TaskState::Submitted, false));
        assert!(fast.next().await.unwrap().is_ok());
        hub.publish("t1", status_event("t1", TaskState::Working, false));
        assert!(fast.next().await.unwrap().is_ok());

        assert_eq!(hub.subscriber_count("t1"), 1);

        // The slow stream still holds the buffered event, then the lag error,
        // then closes.
        assert!(slow.next().await.unwrap().is_ok());
        let err = slow.next().await.unwrap().unwrap_err();
        assert!(matches!(err, A2aError::SubscriberLagged { .. }));
        assert!(slow.next().await.is_none());

        // The fast subscriber keeps receiving.
        hub.publish("t1", status_event("t1", TaskState::Completed, true));
        assert!(fast.next().await.unwrap().unwrap().is_final());
    }

    #[tokio::test]
    async fn dropped_receiver_is_swept_on_publish() {
        let hub = SubscriptionHub::new(8);
        let stream = hub.subscribe("t1");
        drop(stream);

        hub.publish("t1", status_event("t1", TaskState::Working, false));
        assert_eq!(hub.subscriber_count("t1"), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_is_swept_on_next_subscribe() {
        let hub = SubscriptionHub::new(8);
        let stream = hub.subscribe("t1");
        drop(stream);
        assert_eq!(hub.subscriber_count("t1"), 1);

        let _live = hub.subscribe("t1");
        assert_eq!(hub.subscriber_count("t1"), 1);
    }

    #[tokio::test]
    async fn replay_delivers_items_then_closes() {
        let mut stream =
            SubscriptionHub::replay(vec![Ok(status_event("t1", TaskState::Completed, true))]);
        assert!(stream.next().await.unwrap().unwrap().is_final());
        assert!(stream.next().await.is_none());
    }
}

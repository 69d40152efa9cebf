//! Engine configuration.

/// Static configuration for an [`crate::server::A2aServer`].
///
/// The capability flags mirror the agent card's `streaming` and
/// `pushNotifications` entries; the engine rejects the corresponding methods
/// when a flag is off.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether `tasks/sendSubscribe` and `tasks/resubscribe` are available.
    pub streaming: bool,
    /// Whether push notification configuration is accepted.
    pub push_notifications: bool,
    /// Per-subscriber event buffer size. A subscriber that falls this many
    /// events behind is dropped.
    pub subscriber_buffer: usize,
    /// Whether a resubscribe against a terminal task delivers the terminal
    /// status once before closing, instead of closing immediately.
    pub replay_terminal_on_resubscribe: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            streaming: true,
            push_notifications: true,
            subscriber_buffer: 32,
            replay_terminal_on_resubscribe: true,
        }
    }
}

impl ServerConfig {
    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }

    pub fn with_push_notifications(mut self, enabled: bool) -> Self {
        self.push_notifications = enabled;
        self
    }

    pub fn with_subscriber_buffer(mut self, size: usize) -> Self {
        self.subscriber_buffer = size;
        self
    }

    pub fn with_replay_terminal_on_resubscribe(mut self, enabled: bool) -> Self {
        self.replay_terminal_on_resubscribe = enabled;
        self
    }
}

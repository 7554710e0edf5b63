//! Room configuration

use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Default depth of a subscriber's delivery queue
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Configuration applied to every room created by a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    /// Maximum number of messages retained for replay (0 disables history)
    pub history_capacity: usize,

    /// Per-subscriber delivery queue depth; a full queue drops new messages
    pub channel_capacity: usize,

    /// Maximum number of history messages replayed to a joiner (None = all)
    pub replay_limit: Option<usize>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            replay_limit: None,
        }
    }
}

impl RoomConfig {
    /// Set the history capacity
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the delivery queue depth
    ///
    /// Clamped to at least 1.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Limit how many history messages a joiner receives
    pub fn replay_limit(mut self, limit: usize) -> Self {
        self.replay_limit = Some(limit);
        self
    }

    /// Number of history messages handed to a joiner
    pub(crate) fn replay_count(&self) -> usize {
        self.replay_limit.unwrap_or(self.history_capacity)
    }
}

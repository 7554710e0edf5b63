//! Message history buffer for late-joiner replay
//!
//! When a subscriber joins an existing room it receives the most recent
//! messages before any live traffic. The buffer keeps at most `capacity`
//! messages and evicts the oldest first.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::registry::message::Message;

/// Default number of messages kept per room
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Bounded, insertion-ordered message history
#[derive(Debug)]
pub struct HistoryBuffer {
    /// Maximum number of retained messages
    capacity: usize,
    /// Retained messages, oldest at the front
    messages: VecDeque<Arc<Message>>,
    /// Number of messages evicted over the buffer's lifetime
    evicted: u64,
}

impl HistoryBuffer {
    /// Create a buffer with the default capacity (1000 messages)
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a buffer holding at most `capacity` messages
    ///
    /// A capacity of 0 retains nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            evicted: 0,
        }
    }

    /// Append a message at the tail
    ///
    /// Returns the evicted head if the append pushed the buffer past capacity.
    pub fn append(&mut self, message: Arc<Message>) -> Option<Arc<Message>> {
        if self.capacity == 0 {
            self.evicted += 1;
            return Some(message);
        }

        let evicted = if self.messages.len() >= self.capacity {
            self.evicted += 1;
            self.messages.pop_front()
        } else {
            None
        };

        self.messages.push_back(message);
        evicted
    }

    /// Get the most recent `count` messages, oldest first
    ///
    /// The returned vector is independent of the buffer.
    pub fn recent(&self, count: usize) -> Vec<Arc<Message>> {
        let take = count.min(self.messages.len());
        let skip = self.messages.len() - take;
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages evicted so far
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//! Identifier and message types for room routing
//!
//! This module defines the keys used to address rooms and subscribers and the
//! messages that are broadcast to them.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

fn non_empty(value: String, field: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::invalid(field))
    } else {
        Ok(value)
    }
}

/// Unique identifier for a room
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Create a room id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        non_empty(id.into(), "room_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a subscriber, unique within its room
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Create a subscriber id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        non_empty(id.into(), "subscriber_id").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Allocate the next identifier from the process-wide counter
    pub fn next() -> Self {
        Self(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Identifier of one accepted join
///
/// A subscriber that joins twice gets two distinct session ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate the next identifier from the process-wide counter
    pub fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Kind of a broadcast message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    /// Regular chat text
    #[default]
    Text,
    /// A subscriber joined the room
    JoinNotice,
    /// A subscriber left the room
    LeaveNotice,
    /// Out-of-band notice from the surrounding system
    System,
}

/// A message broadcast to the subscribers of a room
///
/// Messages are shared as `Arc<Message>` once created, so every subscriber
/// and the history buffer see the same immutable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier assigned at creation
    pub id: MessageId,
    /// Room the message belongs to
    pub room_id: RoomId,
    /// Author; never receives its own message
    pub author_id: SubscriberId,
    /// Author's display name at send time
    pub author_name: String,
    /// Text content
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Kind tag
    pub kind: MessageKind,
}

impl Message {
    /// Create a message of any kind
    pub fn new(
        kind: MessageKind,
        room_id: RoomId,
        author_id: SubscriberId,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::next(),
            room_id,
            author_id,
            author_name: author_name.into(),
            content: content.into(),
            created_at: Utc::now(),
            kind,
        }
    }

    /// Create a text message
    pub fn text(
        room_id: RoomId,
        author_id: SubscriberId,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(MessageKind::Text, room_id, author_id, author_name, content)
    }

    /// Create the notice announcing that a subscriber joined
    pub fn join_notice(room_id: RoomId, subscriber_id: SubscriberId, name: &str) -> Self {
        let content = format!("{} joined the room", name);
        Self::new(MessageKind::JoinNotice, room_id, subscriber_id, name, content)
    }

    /// Create the notice announcing that a subscriber left
    pub fn leave_notice(room_id: RoomId, subscriber_id: SubscriberId, name: &str) -> Self {
        let content = format!("{} left the room", name);
        Self::new(MessageKind::LeaveNotice, room_id, subscriber_id, name, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_reject_empty() {
        assert_eq!(RoomId::new(""), Err(Error::invalid("room_id")));
        assert_eq!(RoomId::new("   "), Err(Error::invalid("room_id")));
        assert_eq!(SubscriberId::new(""), Err(Error::invalid("subscriber_id")));
        assert_eq!(RoomId::new("lobby").unwrap().as_str(), "lobby");
    }

    #[test]
    fn test_message_ids_are_unique_and_increasing() {
        let room = RoomId::new("r").unwrap();
        let author = SubscriberId::new("a").unwrap();

        let first = Message::text(room.clone(), author.clone(), "A", "one");
        let second = Message::text(room, author, "A", "two");

        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::next();
        let b = SessionId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_notice_content() {
        let room = RoomId::new("R1").unwrap();
        let alice = SubscriberId::new("a").unwrap();

        let joined = Message::join_notice(room.clone(), alice.clone(), "Alice");
        assert_eq!(joined.kind, MessageKind::JoinNotice);
        assert_eq!(joined.content, "Alice joined the room");
        assert_eq!(joined.author_id, alice);

        let left = Message::leave_notice(room, alice, "Alice");
        assert_eq!(left.kind, MessageKind::LeaveNotice);
        assert_eq!(left.content, "Alice left the room");
    }

    #[test]
    fn test_default_kind_is_text() {
        assert_eq!(MessageKind::default(), MessageKind::Text);
    }
}

//! Request and response shapes exchanged with the transport layer

use crate::error::{Error, Result};
use crate::registry::message::{MessageId, MessageKind, RoomId, SubscriberId};
use crate::stats::{RoomStats, RoomSummary};

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid(field))
    } else {
        Ok(())
    }
}

/// Join a room and open a push stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub room_id: String,
    pub subscriber_id: String,
    pub display_name: String,
}

impl JoinRequest {
    pub fn new(
        room_id: impl Into<String>,
        subscriber_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            subscriber_id: subscriber_id.into(),
            display_name: display_name.into(),
        }
    }

    /// Check that all three fields are present
    pub(crate) fn validate(self) -> Result<(RoomId, SubscriberId, String)> {
        let room_id = RoomId::new(self.room_id)?;
        let subscriber_id = SubscriberId::new(self.subscriber_id)?;
        require(&self.display_name, "display_name")?;
        Ok((room_id, subscriber_id, self.display_name))
    }
}

/// Send a message to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub room_id: String,
    pub author_id: String,
    pub content: String,
    /// Defaults to [`MessageKind::Text`]
    pub kind: Option<MessageKind>,
}

impl SendRequest {
    pub fn new(
        room_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            kind: None,
        }
    }

    /// Set the message kind
    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub(crate) fn validate(self) -> Result<(RoomId, SubscriberId, String, MessageKind)> {
        let room_id = RoomId::new(self.room_id)?;
        let author_id = SubscriberId::new(self.author_id).map_err(|_| Error::invalid("author_id"))?;
        require(&self.content, "content")?;
        Ok((room_id, author_id, self.content, self.kind.unwrap_or_default()))
    }
}

/// List every room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListRoomsRequest;

/// Describe one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfoRequest {
    pub room_id: String,
}

impl RoomInfoRequest {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
        }
    }
}

/// Acknowledgement of an accepted send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendAck {
    pub success: bool,
    pub message_id: MessageId,
}

/// Detailed view of one room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    pub summary: RoomSummary,
    /// Current members, sorted
    pub subscriber_ids: Vec<SubscriberId>,
    pub stats: RoomStats,
}

//! Chat service
//!
//! Validates requests coming from the transport layer and routes them to the
//! registry and its rooms.

use std::sync::Arc;

use crate::error::Result;
use crate::registry::message::{Message, RoomId, SubscriberId};
use crate::registry::{RoomConfig, RoomRegistry};
use crate::stats::RoomSummary;

use super::request::{
    JoinRequest, ListRoomsRequest, RoomInfo, RoomInfoRequest, SendAck, SendRequest,
};
use super::subscription::Subscription;

/// Entry point for join, send, leave and query requests
#[derive(Debug, Clone)]
pub struct ChatService {
    registry: Arc<RoomRegistry>,
}

impl ChatService {
    /// Create a service with default room configuration
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    /// Create a service with custom room configuration
    pub fn with_config(config: RoomConfig) -> Self {
        Self::from_registry(Arc::new(RoomRegistry::with_config(config)))
    }

    /// Create a service over an existing registry
    pub fn from_registry(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Get a reference to the room registry
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Join a room, creating it on first reference
    pub async fn join(&self, request: JoinRequest) -> Result<Subscription> {
        let (room_id, subscriber_id, display_name) = request.validate()?;

        let room = self.registry.get_or_create(&room_id).await;
        let handle = room.join(subscriber_id, display_name).await;

        Ok(Subscription::new(handle, Arc::clone(&self.registry)))
    }

    /// Send a message to a room, creating it on first reference
    ///
    /// The author's display name is taken from the room membership when the
    /// author is joined, otherwise the author id is used.
    pub async fn send(&self, request: SendRequest) -> Result<SendAck> {
        let (room_id, author_id, content, kind) = request.validate()?;

        let room = self.registry.get_or_create(&room_id).await;
        let author_name = match room.member(&author_id).await {
            Ok(member) => member.display_name,
            Err(_) => author_id.to_string(),
        };

        let message = Message::new(kind, room_id, author_id, author_name, content);
        let message_id = message.id;
        room.broadcast(message).await;

        Ok(SendAck {
            success: true,
            message_id,
        })
    }

    /// Leave a room
    ///
    /// Fails with `RoomNotFound` for an unknown room. Leaving a room the
    /// subscriber is not in is a no-op and returns `Ok(false)`.
    pub async fn leave(&self, room_id: &str, subscriber_id: &str) -> Result<bool> {
        let room_id = RoomId::new(room_id)?;
        let subscriber_id = SubscriberId::new(subscriber_id)?;

        let room = self.registry.get(&room_id).await?;
        Ok(room.leave(&subscriber_id).await)
    }

    /// Summaries of every room
    pub async fn list_rooms(&self, _request: ListRoomsRequest) -> Vec<RoomSummary> {
        self.registry.list().await
    }

    /// Details of one room, without creating it
    pub async fn room_info(&self, request: RoomInfoRequest) -> Result<RoomInfo> {
        let room_id = RoomId::new(request.room_id)?;
        let room = self.registry.get(&room_id).await?;

        Ok(RoomInfo {
            summary: room.summary().await,
            subscriber_ids: room.subscriber_ids().await,
            stats: room.stats().await,
        })
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}

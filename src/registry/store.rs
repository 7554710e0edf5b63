//! Room registry implementation
//!
//! The central registry that owns every room and resolves room ids for join,
//! send and informational requests.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::stats::RoomSummary;

use super::config::RoomConfig;
use super::message::RoomId;
use super::room::Room;

/// Central registry for all rooms
///
/// The map has its own `RwLock`, separate from every room's lock. Room locks
/// are only taken after the registry lock has been released.
///
/// Rooms are created on first reference and never removed.
#[derive(Debug)]
pub struct RoomRegistry {
    /// Map of room id to room
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,

    /// Configuration for newly created rooms
    config: RoomConfig,
}

impl RoomRegistry {
    /// Create a new registry with default room configuration
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    /// Create a new registry with custom room configuration
    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the room configuration
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Get a room, creating it if it does not exist
    ///
    /// Concurrent first access for the same id always yields the same room.
    pub async fn get_or_create(&self, id: &RoomId) -> Arc<Room> {
        if let Some(room) = self.rooms.read().await.get(id) {
            return Arc::clone(room);
        }

        let mut rooms = self.rooms.write().await;
        let mut created = false;
        let room = rooms
            .entry(id.clone())
            .or_insert_with(|| {
                created = true;
                Arc::new(Room::new(id.clone(), self.config.clone()))
            })
            .clone();

        if created {
            tracing::info!(
                room = %id,
                name = %room.name(),
                rooms = rooms.len(),
                "Room created"
            );
        }

        room
    }

    /// Get an existing room without creating it
    pub async fn get(&self, id: &RoomId) -> Result<Arc<Room>> {
        self.rooms
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::RoomNotFound(id.clone()))
    }

    /// Snapshot of every room, sorted by id
    pub async fn list(&self) -> Vec<RoomSummary> {
        // Release the registry lock before touching room locks.
        let rooms: Vec<Arc<Room>> = self.rooms.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            summaries.push(room.summary().await);
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Get total number of rooms
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::message::{Message, SubscriberId};

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_room() {
        let registry = RoomRegistry::new();

        let first = registry.get_or_create(&room_id("lobby")).await;
        let second = registry.get_or_create(&room_id("lobby")).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.room_count().await, 1);
        assert_eq!(first.name(), "Room lobby");
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let registry = RoomRegistry::new();

        let result = registry.get(&room_id("missing")).await;
        assert_eq!(result.unwrap_err(), Error::RoomNotFound(room_id("missing")));
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_reports_subscribers() {
        let registry = RoomRegistry::new();

        let lobby = registry.get_or_create(&room_id("lobby")).await;
        let _empty = registry.get_or_create(&room_id("empty")).await;
        let _alice = lobby.join(SubscriberId::new("a").unwrap(), "Alice").await;
        let _bob = lobby.join(SubscriberId::new("b").unwrap(), "Bob").await;

        let list = registry.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, room_id("empty"));
        assert_eq!(list[0].subscriber_count, 0);
        assert_eq!(list[1].id, room_id("lobby"));
        assert_eq!(list[1].subscriber_count, 2);
    }

    #[tokio::test]
    async fn test_empty_rooms_are_kept() {
        let registry = RoomRegistry::new();
        let room = registry.get_or_create(&room_id("lobby")).await;

        let alice = SubscriberId::new("a").unwrap();
        let _handle = room.join(alice.clone(), "Alice").await;
        room.leave(&alice).await;

        assert!(registry.get(&room_id("lobby")).await.is_ok());
        assert_eq!(registry.list().await[0].subscriber_count, 0);
    }

    #[tokio::test]
    async fn test_rooms_use_registry_config() {
        let config = RoomConfig::default().history_capacity(2);
        let registry = RoomRegistry::with_config(config);
        let room = registry.get_or_create(&room_id("small")).await;

        for n in 0..5 {
            let message = Message::text(
                room.id().clone(),
                SubscriberId::new("a").unwrap(),
                "A",
                n.to_string(),
            );
            room.broadcast(message).await;
        }

        assert_eq!(room.recent_history(10).await.len(), 2);
        assert_eq!(room.stats().await.history_capacity, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_creates_one_room() {
        let registry = Arc::new(RoomRegistry::new());
        let mut tasks = Vec::new();

        for _ in 0..50 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                registry.get_or_create(&RoomId::new("hot").unwrap()).await
            }));
        }

        let mut rooms = Vec::new();
        for task in tasks {
            rooms.push(task.await.unwrap());
        }

        assert_eq!(registry.room_count().await, 1);
        assert!(rooms.iter().all(|room| Arc::ptr_eq(room, &rooms[0])));
    }
}

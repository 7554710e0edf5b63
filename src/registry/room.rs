//! Room state and broadcast dispatch
//!
//! A room owns its membership map and its message history behind a single
//! `RwLock`. Every mutation (join, leave, broadcast) takes the write lock, and
//! a broadcast appends to history and fans out inside the same critical
//! section, so each subscriber sees messages in history order.
//!
//! Fan-out uses `try_send` on each subscriber's bounded queue. It never waits
//! on a subscriber, so holding the lock during fan-out cannot stall the room
//! behind a slow consumer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::history::HistoryBuffer;
use crate::session::{MemberInfo, SessionHandle, SubscriberSession};
use crate::stats::{DispatchReport, RoomStats, RoomSummary};

use super::config::RoomConfig;
use super::message::{Message, RoomId, SessionId, SubscriberId};

/// Mutable state guarded by the room lock
#[derive(Debug)]
struct RoomState {
    /// Sessions currently eligible to receive broadcasts
    members: HashMap<SubscriberId, SubscriberSession>,
    /// Replay window for late joiners
    history: HistoryBuffer,
    /// Messages appended since creation
    messages_total: u64,
    /// Skipped best-effort deliveries
    dropped_deliveries: u64,
}

impl RoomState {
    /// Append to history, then offer the message to every member except `exclude`
    fn dispatch(
        &mut self,
        room: &RoomId,
        message: Arc<Message>,
        exclude: Option<&SubscriberId>,
    ) -> DispatchReport {
        self.history.append(Arc::clone(&message));
        self.messages_total += 1;

        let mut report = DispatchReport::default();
        for (id, member) in &self.members {
            if exclude == Some(id) {
                continue;
            }

            match member.deliver(&message) {
                Ok(()) => report.delivered += 1,
                Err(reason) => {
                    report.skipped += 1;
                    tracing::trace!(
                        room = %room,
                        subscriber = %id,
                        message = %message.id,
                        reason = ?reason,
                        "Delivery skipped"
                    );
                }
            }
        }
        self.dropped_deliveries += report.skipped as u64;

        report
    }

    /// Remove a member, assert its cancellation and announce the departure
    fn remove_member(&mut self, room: &RoomId, subscriber_id: &SubscriberId) -> bool {
        let Some(session) = self.members.remove(subscriber_id) else {
            return false;
        };
        session.cancel();

        let notice = Message::leave_notice(
            room.clone(),
            subscriber_id.clone(),
            session.display_name(),
        );
        let report = self.dispatch(room, Arc::new(notice), None);

        tracing::info!(
            room = %room,
            subscriber = %subscriber_id,
            session = %session.session_id(),
            subscribers = self.members.len(),
            notified = report.delivered,
            "Subscriber left"
        );
        true
    }
}

/// A chat room: membership, history and the broadcast dispatcher
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    name: String,
    created_at: DateTime<Utc>,
    config: RoomConfig,
    state: RwLock<RoomState>,
}

impl Room {
    /// Create an empty room; its name is derived from the id
    pub(crate) fn new(id: RoomId, config: RoomConfig) -> Self {
        let name = format!("Room {}", id);
        let state = RoomState {
            members: HashMap::new(),
            history: HistoryBuffer::with_capacity(config.history_capacity),
            messages_total: 0,
            dropped_deliveries: 0,
        };

        Self {
            id,
            name,
            created_at: Utc::now(),
            config,
            state: RwLock::new(state),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Join the room
    ///
    /// Registers a new session under `subscriber_id` and returns its handle.
    /// The handle first yields the current history, then live messages. A join
    /// notice is appended to history and sent to every other member.
    ///
    /// If a session is already registered under the same id it is replaced
    /// and its cancellation signal asserted, which ends its stream.
    pub async fn join(
        &self,
        subscriber_id: SubscriberId,
        display_name: impl Into<String>,
    ) -> SessionHandle {
        let display_name = display_name.into();
        let mut state = self.state.write().await;

        let replay = state.history.recent(self.config.replay_count());
        let replay_len = replay.len();
        let (session, handle) = SubscriberSession::open(
            self.id.clone(),
            subscriber_id.clone(),
            display_name.clone(),
            self.config.channel_capacity,
            replay,
        );
        let session_id = session.session_id();

        if let Some(previous) = state.members.insert(subscriber_id.clone(), session) {
            previous.cancel();
            tracing::warn!(
                room = %self.id,
                subscriber = %subscriber_id,
                previous = %previous.session_id(),
                session = %session_id,
                "Session superseded by a new join"
            );
        }

        let notice = Message::join_notice(self.id.clone(), subscriber_id.clone(), &display_name);
        let report = state.dispatch(&self.id, Arc::new(notice), Some(&subscriber_id));

        tracing::info!(
            room = %self.id,
            subscriber = %subscriber_id,
            session = %session_id,
            subscribers = state.members.len(),
            replay = replay_len,
            notified = report.delivered,
            "Subscriber joined"
        );

        handle
    }

    /// Leave the room
    ///
    /// Removes the subscriber, cancels its session and sends a leave notice to
    /// the remaining members. Returns `false` (and does nothing) if the
    /// subscriber is not registered.
    pub async fn leave(&self, subscriber_id: &SubscriberId) -> bool {
        let mut state = self.state.write().await;
        let removed = state.remove_member(&self.id, subscriber_id);

        if !removed {
            tracing::debug!(
                room = %self.id,
                subscriber = %subscriber_id,
                "Leave ignored, subscriber not registered"
            );
        }
        removed
    }

    /// Leave the room only if `session_id` is still the registered session
    ///
    /// Used by session cleanup so that a superseded handle cannot remove the
    /// session that replaced it.
    pub async fn leave_session(&self, subscriber_id: &SubscriberId, session_id: SessionId) -> bool {
        let mut state = self.state.write().await;

        let current = state.members.get(subscriber_id).map(|s| s.session_id());
        if current != Some(session_id) {
            tracing::debug!(
                room = %self.id,
                subscriber = %subscriber_id,
                session = %session_id,
                "Leave ignored, session no longer registered"
            );
            return false;
        }

        state.remove_member(&self.id, subscriber_id)
    }

    /// Broadcast a message to every member except its author
    ///
    /// The message is appended to history first. Delivery is best-effort:
    /// members whose queue is full, closed or cancelled are skipped and stay
    /// registered. Never fails.
    pub async fn broadcast(&self, message: Message) -> DispatchReport {
        let author = message.author_id.clone();
        let message_id = message.id;

        let mut state = self.state.write().await;
        let report = state.dispatch(&self.id, Arc::new(message), Some(&author));

        tracing::debug!(
            room = %self.id,
            author = %author,
            message = %message_id,
            delivered = report.delivered,
            skipped = report.skipped,
            "Message broadcast"
        );

        report
    }

    /// Get the most recent `count` messages, oldest first
    pub async fn recent_history(&self, count: usize) -> Vec<Arc<Message>> {
        self.state.read().await.history.recent(count)
    }

    /// Number of registered subscribers
    pub async fn subscriber_count(&self) -> usize {
        self.state.read().await.members.len()
    }

    /// Registered subscriber ids, sorted
    pub async fn subscriber_ids(&self) -> Vec<SubscriberId> {
        let state = self.state.read().await;
        let mut ids: Vec<SubscriberId> = state.members.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Look up one member
    pub async fn member(&self, subscriber_id: &SubscriberId) -> Result<MemberInfo> {
        let state = self.state.read().await;
        state
            .members
            .get(subscriber_id)
            .map(SubscriberSession::info)
            .ok_or_else(|| Error::SubscriberNotFound {
                room: self.id.clone(),
                subscriber: subscriber_id.clone(),
            })
    }

    /// Listing entry for this room
    pub async fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            subscriber_count: self.subscriber_count().await,
            created_at: self.created_at,
        }
    }

    /// Room statistics
    pub async fn stats(&self) -> RoomStats {
        let state = self.state.read().await;
        RoomStats {
            subscriber_count: state.members.len(),
            history_len: state.history.len(),
            history_capacity: state.history.capacity(),
            messages_total: state.messages_total,
            messages_evicted: state.history.evicted(),
            dropped_deliveries: state.dropped_deliveries,
        }
    }
}

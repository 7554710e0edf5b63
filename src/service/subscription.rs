//! Subscription: a session handle bound to the registry it came from
//!
//! The subscription reaches its room through the registry by id, never by
//! holding the room itself. Dropping an open subscription schedules a leave
//! on the current tokio runtime, which is how a vanished connection releases
//! its membership.

use std::sync::Arc;

use crate::registry::message::{Message, RoomId, SessionId, SubscriberId};
use crate::registry::RoomRegistry;
use crate::session::{SessionHandle, SessionPhase};

/// Leave `room_id` if `session_id` is still the registered session
async fn leave_session(
    registry: &RoomRegistry,
    room_id: &RoomId,
    subscriber_id: &SubscriberId,
    session_id: SessionId,
) -> bool {
    match registry.get(room_id).await {
        Ok(room) => room.leave_session(subscriber_id, session_id).await,
        Err(_) => false,
    }
}

/// A joined subscriber's push stream
#[derive(Debug)]
pub struct Subscription {
    handle: SessionHandle,
    registry: Arc<RoomRegistry>,
    closed: bool,
}

impl Subscription {
    pub(crate) fn new(handle: SessionHandle, registry: Arc<RoomRegistry>) -> Self {
        Self {
            handle,
            registry,
            closed: false,
        }
    }

    /// Receive the next message, or `None` once the session has terminated
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.handle.recv().await
    }

    /// Take the next message without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        self.handle.try_recv()
    }

    /// Leave the room
    ///
    /// Returns `false` if this session had already been removed or replaced.
    pub async fn close(mut self) -> bool {
        self.closed = true;
        leave_session(
            &self.registry,
            self.handle.room_id(),
            self.handle.subscriber_id(),
            self.handle.session_id(),
        )
        .await
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn phase(&self) -> SessionPhase {
        self.handle.phase()
    }

    pub fn room_id(&self) -> &RoomId {
        self.handle.room_id()
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        self.handle.subscriber_id()
    }

    pub fn session_id(&self) -> SessionId {
        self.handle.session_id()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.closed || self.handle.phase().is_terminated() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                room = %self.handle.room_id(),
                subscriber = %self.handle.subscriber_id(),
                "Subscription dropped outside a runtime, leave skipped"
            );
            return;
        };

        let registry = Arc::clone(&self.registry);
        let room_id = self.handle.room_id().clone();
        let subscriber_id = self.handle.subscriber_id().clone();
        let session_id = self.handle.session_id();

        runtime.spawn(async move {
            leave_session(&registry, &room_id, &subscriber_id, session_id).await;
        });
    }
}

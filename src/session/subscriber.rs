//! Room-side subscriber session
//!
//! The membership record a room keeps for each joined subscriber: identity,
//! the sending half of its delivery queue and its cancellation signal. The
//! receiving halves live in the [`SessionHandle`] given to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};

use crate::registry::message::{Message, RoomId, SessionId, SubscriberId};

use super::handle::SessionHandle;

/// Why a message was not handed to a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Delivery queue is full (slow consumer)
    Full,
    /// Receiving side was dropped
    Closed,
    /// Cancellation signal already asserted
    Cancelled,
}

/// Snapshot of one room member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub subscriber_id: SubscriberId,
    pub display_name: String,
    pub session_id: SessionId,
    pub joined_at: DateTime<Utc>,
    pub cancelled: bool,
}

/// Membership record for one joined subscriber
#[derive(Debug)]
pub struct SubscriberSession {
    session_id: SessionId,
    subscriber_id: SubscriberId,
    display_name: String,
    joined_at: DateTime<Utc>,
    tx: mpsc::Sender<Arc<Message>>,
    cancel: watch::Sender<bool>,
}

impl SubscriberSession {
    /// Create a session and the caller-side handle paired with it
    ///
    /// `replay` is delivered by the handle ahead of anything sent through the
    /// queue, so it is never subject to the queue bound.
    pub(crate) fn open(
        room_id: RoomId,
        subscriber_id: SubscriberId,
        display_name: String,
        channel_capacity: usize,
        replay: Vec<Arc<Message>>,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        let (cancel, cancel_rx) = watch::channel(false);
        let session_id = SessionId::next();

        let handle = SessionHandle::new(
            session_id,
            room_id,
            subscriber_id.clone(),
            display_name.clone(),
            replay,
            rx,
            cancel_rx,
        );

        let session = Self {
            session_id,
            subscriber_id,
            display_name,
            joined_at: Utc::now(),
            tx,
            cancel,
        };

        (session, handle)
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the cancellation signal has been asserted
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Assert the cancellation signal
    ///
    /// Callers remove the session from the membership map first.
    pub(crate) fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Hand a message to the delivery queue without waiting
    pub(crate) fn deliver(&self, message: &Arc<Message>) -> Result<(), DeliveryFailure> {
        if self.is_cancelled() {
            return Err(DeliveryFailure::Cancelled);
        }

        self.tx
            .try_send(Arc::clone(message))
            .map_err(|err| match err {
                TrySendError::Full(_) => DeliveryFailure::Full,
                TrySendError::Closed(_) => DeliveryFailure::Closed,
            })
    }

    pub fn info(&self) -> MemberInfo {
        MemberInfo {
            subscriber_id: self.subscriber_id.clone(),
            display_name: self.display_name.clone(),
            session_id: self.session_id,
            joined_at: self.joined_at,
            cancelled: self.is_cancelled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_session(capacity: usize) -> (SubscriberSession, SessionHandle) {
        SubscriberSession::open(
            RoomId::new("room").unwrap(),
            SubscriberId::new("alice").unwrap(),
            "Alice".to_string(),
            capacity,
            Vec::new(),
        )
    }

    fn make_message() -> Arc<Message> {
        Arc::new(Message::text(
            RoomId::new("room").unwrap(),
            SubscriberId::new("bob").unwrap(),
            "Bob",
            "hello",
        ))
    }

    #[tokio::test]
    async fn test_deliver_reaches_handle() {
        let (session, mut handle) = open_session(4);

        session.deliver(&make_message()).unwrap();

        let received = handle.recv().await.unwrap();
        assert_eq!(received.content, "hello");
        assert_eq!(handle.session_id(), session.session_id());
    }

    #[test]
    fn test_deliver_full_queue() {
        let (session, _handle) = open_session(1);

        assert!(session.deliver(&make_message()).is_ok());
        assert_eq!(session.deliver(&make_message()), Err(DeliveryFailure::Full));
    }

    #[test]
    fn test_deliver_closed_queue() {
        let (session, handle) = open_session(4);
        drop(handle);

        assert_eq!(session.deliver(&make_message()), Err(DeliveryFailure::Closed));
    }

    #[test]
    fn test_deliver_after_cancel() {
        let (session, _handle) = open_session(4);

        session.cancel();

        assert!(session.is_cancelled());
        assert!(session.info().cancelled);
        assert_eq!(
            session.deliver(&make_message()),
            Err(DeliveryFailure::Cancelled)
        );
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (session, _handle) = open_session(0);
        assert!(session.deliver(&make_message()).is_ok());
    }
}

//! Caller-side session handle
//!
//! The handle is the receiving end of a joined subscriber's push stream. It
//! yields the history replay first, then live messages, and ends once the
//! session is cancelled or its room drops the delivery queue.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::registry::message::{Message, RoomId, SessionId, SubscriberId};

use super::state::SessionPhase;

/// Push stream for one joined subscriber
///
/// Holds no reference to its room; leaving goes through the registry by id.
#[derive(Debug)]
pub struct SessionHandle {
    session_id: SessionId,
    room_id: RoomId,
    subscriber_id: SubscriberId,
    display_name: String,
    replay: VecDeque<Arc<Message>>,
    rx: mpsc::Receiver<Arc<Message>>,
    cancel: watch::Receiver<bool>,
    phase: SessionPhase,
}

impl SessionHandle {
    pub(crate) fn new(
        session_id: SessionId,
        room_id: RoomId,
        subscriber_id: SubscriberId,
        display_name: String,
        replay: Vec<Arc<Message>>,
        rx: mpsc::Receiver<Arc<Message>>,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self {
            session_id,
            room_id,
            subscriber_id,
            display_name,
            phase: SessionPhase::initial(replay.len()),
            replay: replay.into(),
            rx,
            cancel,
        }
    }

    /// Receive the next message
    ///
    /// Replay messages come first. Afterwards this waits for either a live
    /// message or the cancellation signal, whichever happens first. Returns
    /// `None` once the session is terminated, and on every call after that.
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        if self.phase.is_terminated() || self.observe_cancel() {
            return None;
        }

        if let Some(message) = self.replay.pop_front() {
            if self.replay.is_empty() {
                self.phase.activate();
            }
            return Some(message);
        }
        self.phase.activate();

        // Cancellation wins over queued messages.
        let next = tokio::select! {
            biased;
            _ = self.cancel.changed() => None,
            message = self.rx.recv() => message,
        };

        if next.is_none() {
            self.phase.terminate();
            tracing::debug!(
                room = %self.room_id,
                subscriber = %self.subscriber_id,
                session = %self.session_id,
                "Session stream ended"
            );
        }
        next
    }

    /// Take the next message without waiting
    ///
    /// Returns `None` when nothing is ready. A cancelled session is
    /// terminated here the same way `recv` terminates it.
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        if self.phase.is_terminated() || self.observe_cancel() {
            return None;
        }

        if let Some(message) = self.replay.pop_front() {
            if self.replay.is_empty() {
                self.phase.activate();
            }
            return Some(message);
        }
        self.phase.activate();

        self.rx.try_recv().ok()
    }

    /// Terminate the session if the room has cancelled it
    ///
    /// Pending replay is discarded along with anything still queued.
    fn observe_cancel(&mut self) -> bool {
        if !*self.cancel.borrow() {
            return false;
        }
        self.replay.clear();
        self.phase.terminate();
        true
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        &self.subscriber_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Replay messages not yet received
    pub fn pending_replay(&self) -> usize {
        self.replay.len()
    }

    /// Whether the room has asserted this session's cancellation signal
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::subscriber::SubscriberSession;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn make_message(content: &str) -> Arc<Message> {
        Arc::new(Message::text(
            RoomId::new("room").unwrap(),
            SubscriberId::new("bob").unwrap(),
            "Bob",
            content,
        ))
    }

    fn open_with_replay(replay: Vec<Arc<Message>>) -> (SubscriberSession, SessionHandle) {
        SubscriberSession::open(
            RoomId::new("room").unwrap(),
            SubscriberId::new("alice").unwrap(),
            "Alice".to_string(),
            8,
            replay,
        )
    }

    #[tokio::test]
    async fn test_replay_precedes_live_messages() {
        let replay = vec![make_message("old 1"), make_message("old 2")];
        let (session, mut handle) = open_with_replay(replay);

        session.deliver(&make_message("live")).unwrap();

        assert_eq!(handle.phase(), SessionPhase::Joining);
        assert_eq!(handle.pending_replay(), 2);

        assert_eq!(handle.recv().await.unwrap().content, "old 1");
        assert_eq!(handle.phase(), SessionPhase::Joining);
        assert_eq!(handle.recv().await.unwrap().content, "old 2");
        assert_eq!(handle.phase(), SessionPhase::Active);
        assert_eq!(handle.recv().await.unwrap().content, "live");
    }

    #[tokio::test]
    async fn test_recv_waits_for_message() {
        let (session, mut handle) = open_with_replay(Vec::new());

        {
            let mut recv = task::spawn(handle.recv());
            assert_pending!(recv.poll());

            session.deliver(&make_message("hi")).unwrap();
            assert!(recv.is_woken());
            let received = match recv.poll() {
                std::task::Poll::Ready(message) => message.map(|m| m.content.clone()),
                std::task::Poll::Pending => panic!("message not ready"),
            };
            assert_eq!(received.as_deref(), Some("hi"));
        }
    }

    #[tokio::test]
    async fn test_cancel_terminates_waiting_recv() {
        let (session, mut handle) = open_with_replay(Vec::new());

        {
            let mut recv = task::spawn(handle.recv());
            assert_pending!(recv.poll());

            session.cancel();
            assert!(recv.is_woken());
            assert_ready_eq!(recv.poll(), None);
        }

        assert_eq!(handle.phase(), SessionPhase::Terminated);
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_terminated_stays_terminated() {
        let (session, mut handle) = open_with_replay(Vec::new());

        session.cancel();
        assert!(handle.recv().await.is_none());

        // Queue is still open, but the session never reactivates.
        assert!(handle.recv().await.is_none());
        assert!(handle.try_recv().is_none());
        assert_eq!(handle.phase(), SessionPhase::Terminated);
    }

    #[tokio::test]
    async fn test_cancel_discards_pending_replay() {
        let replay = vec![make_message("old 1"), make_message("old 2")];
        let (session, mut handle) = open_with_replay(replay);

        session.cancel();

        assert!(handle.recv().await.is_none());
        assert_eq!(handle.pending_replay(), 0);
        assert_eq!(handle.phase(), SessionPhase::Terminated);
    }

    #[test]
    fn test_try_recv_terminates_on_cancel() {
        let (session, mut handle) = open_with_replay(vec![make_message("old")]);
        session.deliver(&make_message("live")).unwrap();

        session.cancel();

        assert!(handle.try_recv().is_none());
        assert_eq!(handle.phase(), SessionPhase::Terminated);
        assert_eq!(handle.pending_replay(), 0);
    }

    #[tokio::test]
    async fn test_dropped_session_ends_stream() {
        let (session, mut handle) = open_with_replay(vec![make_message("old")]);
        drop(session);

        assert_eq!(handle.recv().await.unwrap().content, "old");
        assert!(handle.recv().await.is_none());
        assert_eq!(handle.phase(), SessionPhase::Terminated);
    }

    #[test]
    fn test_try_recv() {
        let (session, mut handle) = open_with_replay(vec![make_message("old")]);

        assert_eq!(handle.try_recv().unwrap().content, "old");
        assert!(handle.try_recv().is_none());
        assert_eq!(handle.phase(), SessionPhase::Active);

        session.deliver(&make_message("live")).unwrap();
        assert_eq!(handle.try_recv().unwrap().content, "live");
    }
}

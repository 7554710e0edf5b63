//! roomcast: multi-room real-time broadcast core
//!
//! A registry of chat rooms, each fanning messages out to many concurrently
//! connected subscribers over long-lived push streams, with a bounded
//! per-room history that is replayed to late joiners.
//!
//! # Example
//!
//! ```no_run
//! use roomcast::{ChatService, JoinRequest, SendRequest};
//!
//! # async fn run() -> roomcast::Result<()> {
//! let service = ChatService::new();
//!
//! let mut alice = service.join(JoinRequest::new("lobby", "a", "Alice")).await?;
//! let mut bob = service.join(JoinRequest::new("lobby", "b", "Bob")).await?;
//!
//! service.send(SendRequest::new("lobby", "a", "hi")).await?;
//!
//! // Bob sees the history replay first, then "hi".
//! while let Some(message) = bob.recv().await {
//!     println!("{}: {}", message.author_name, message.content);
//! }
//! # let _ = alice.recv().await;
//! # Ok(())
//! # }
//! ```
//!
//! Delivery is best-effort: a subscriber whose queue is full or closed
//! misses the message instead of slowing down the room.

pub mod error;
pub mod history;
pub mod registry;
pub mod service;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use history::HistoryBuffer;
pub use registry::{
    Message, MessageId, MessageKind, Room, RoomConfig, RoomId, RoomRegistry, SessionId,
    SubscriberId,
};
pub use service::{
    ChatService, JoinRequest, ListRoomsRequest, RoomInfo, RoomInfoRequest, SendAck, SendRequest,
    Subscription,
};
pub use session::{SessionHandle, SessionPhase};
pub use stats::{RoomStats, RoomSummary};

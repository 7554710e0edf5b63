//! Room registry for multi-room fan-out
//!
//! The registry owns every room and routes join and send requests to them.
//! Each room fans messages out to its subscribers through bounded per-session
//! `tokio::sync::mpsc` queues fed with `try_send`, so a slow subscriber loses
//! messages instead of stalling the room.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<RoomRegistry>
//!                     ┌─────────────────────────┐
//!                     │ rooms: HashMap<RoomId,  │
//!                     │   Arc<Room> {           │
//!                     │     members,            │
//!                     │     history,            │
//!                     │   }                     │
//!                     │ >                       │
//!                     └───────────┬─────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!      [Sender]             [Subscriber]            [Subscriber]
//!   room.broadcast()        handle.recv()           handle.recv()
//!         │                       ▲                       ▲
//!         └──► history.append ──► try_send ───────────────┘
//! ```
//!
//! # Shared Messages
//!
//! Messages are wrapped in `Arc` once, so the history buffer and every
//! subscriber queue share the same allocation.

pub mod config;
pub mod message;
pub mod room;
pub mod store;

pub use config::RoomConfig;
pub use message::{Message, MessageId, MessageKind, RoomId, SessionId, SubscriberId};
pub use room::Room;
pub use store::RoomRegistry;

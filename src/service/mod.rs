//! Service facade for the transport layer
//!
//! The transport (WebSocket, gRPC, TCP or anything else) hands requests to
//! [`ChatService`] and forwards what [`Subscription::recv`] yields to its
//! client. Authentication, persistence and wire encoding stay outside.

pub mod chat;
pub mod request;
pub mod subscription;

pub use chat::ChatService;
pub use request::{
    JoinRequest, ListRoomsRequest, RoomInfo, RoomInfoRequest, SendAck, SendRequest,
};
pub use subscription::Subscription;

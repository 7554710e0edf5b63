//! Error types
//!
//! Errors returned by room, registry and service operations. Delivery
//! failures and history eviction are deliberately absent: both are absorbed
//! silently by the dispatcher.

use crate::registry::message::{RoomId, SubscriberId};

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for broadcast core operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required identifier or content field was empty
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
    },
    /// Room is not registered
    RoomNotFound(RoomId),
    /// Subscriber is not a member of the room
    SubscriberNotFound {
        /// Room that was searched
        room: RoomId,
        /// Subscriber that was not found
        subscriber: SubscriberId,
    },
}

impl Error {
    /// Shorthand for an empty-field error
    pub fn invalid(field: &'static str) -> Self {
        Error::InvalidInput { field }
    }

    /// Whether this error reports a missing room or subscriber
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::RoomNotFound(_) | Error::SubscriberNotFound { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInput { field } => write!(f, "Invalid input: {} must not be empty", field),
            Error::RoomNotFound(room) => write!(f, "Room not found: {}", room),
            Error::SubscriberNotFound { room, subscriber } => {
                write!(f, "Subscriber not found: {} in room {}", subscriber, room)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_not_not_found() {
        let err = Error::invalid("room_id");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Invalid input: room_id must not be empty");
    }

    #[test]
    fn test_not_found_display() {
        let room = RoomId::new("lobby").unwrap();
        let subscriber = SubscriberId::new("alice").unwrap();

        let err = Error::RoomNotFound(room.clone());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Room not found: lobby");

        let err = Error::SubscriberNotFound { room, subscriber };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Subscriber not found: alice in room lobby");
    }
}

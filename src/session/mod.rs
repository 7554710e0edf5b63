//! Subscriber sessions
//!
//! A session is split in two halves when a subscriber joins a room:
//!
//! - [`SubscriberSession`]: kept in the room's membership map; owns the
//!   sending side of the delivery queue and the cancellation signal.
//! - [`SessionHandle`]: returned to the caller; yields the history replay and
//!   then live messages until the session terminates.

pub mod handle;
pub mod state;
pub mod subscriber;

pub use handle::SessionHandle;
pub use state::SessionPhase;
pub use subscriber::{DeliveryFailure, MemberInfo, SubscriberSession};

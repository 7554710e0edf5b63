//! Session state machine
//!
//! Tracks a subscriber session from join to termination.

/// Subscriber session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Registered, history replay not yet fully delivered
    Joining,
    /// Replay delivered, receiving live messages
    Active,
    /// Cancelled, left or disconnected (absorbing)
    Terminated,
}

impl SessionPhase {
    /// Initial phase for a session with `pending_replay` messages to deliver
    pub fn initial(pending_replay: usize) -> Self {
        if pending_replay == 0 {
            SessionPhase::Active
        } else {
            SessionPhase::Joining
        }
    }

    /// Replay finished
    pub fn activate(&mut self) {
        if *self == SessionPhase::Joining {
            *self = SessionPhase::Active;
        }
    }

    /// End the session; no later transition leaves this phase
    pub fn terminate(&mut self) {
        *self = SessionPhase::Terminated;
    }

    pub fn is_active(&self) -> bool {
        *self == SessionPhase::Active
    }

    pub fn is_terminated(&self) -> bool {
        *self == SessionPhase::Terminated
    }
}

//! Statistics and summaries for rooms

use chrono::{DateTime, Utc};

use crate::registry::message::RoomId;

/// Listing entry for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// Room identifier
    pub id: RoomId,
    /// Human-readable name
    pub name: String,
    /// Live subscriber count at snapshot time
    pub subscriber_count: usize,
    /// When the room was created
    pub created_at: DateTime<Utc>,
}

/// Room-level statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomStats {
    /// Current members
    pub subscriber_count: usize,
    /// Messages retained in history
    pub history_len: usize,
    /// History capacity
    pub history_capacity: usize,
    /// Messages appended since creation, notices included
    pub messages_total: u64,
    /// Messages evicted from history
    pub messages_evicted: u64,
    /// Best-effort deliveries that were skipped
    pub dropped_deliveries: u64,
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Subscribers whose queue accepted the message
    pub delivered: usize,
    /// Subscribers skipped (full, closed or cancelled)
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_stats_default() {
        let stats = RoomStats::default();
        assert_eq!(stats.subscriber_count, 0);
        assert_eq!(stats.messages_total, 0);
        assert_eq!(stats.dropped_deliveries, 0);
    }

    #[test]
    fn test_dispatch_report_default() {
        let report = DispatchReport::default();
        assert_eq!(report.delivered, 0);
        assert_eq!(report.skipped, 0);
    }
}

//! Room statistics and listing summaries

pub mod metrics;

pub use metrics::{DispatchReport, RoomStats, RoomSummary};

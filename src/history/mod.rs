//! Bounded message history
//!
//! Rooms keep a capped window of recent messages so that late joiners can be
//! caught up before live delivery starts.

pub mod buffer;

pub use buffer::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};

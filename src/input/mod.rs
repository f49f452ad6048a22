//! Input edge-state tracking
//!
//! Converts the raw boolean stream delivered by the window driver into
//! stable per-frame press/release/hold semantics.

pub mod channel;
pub mod tracker;

pub use channel::{Button, Key, ScrollAxis};
pub use tracker::InputTracker;

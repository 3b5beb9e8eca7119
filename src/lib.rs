//! Spaced-repetition scheduling engine for the Recall flashcard app.
//!
//! Pure computation only: the crate owns no storage and performs no I/O.
//! The caller reads a card's [`CardState`], fills in `elapsed_days` from the
//! last-reviewed timestamp, applies one rating with
//! [`Scheduler::update_state`] (or [`Scheduler::schedule`] to also get the
//! next-due instant and a review-log record), and persists the returned
//! value wholesale as the new authoritative state.
//!
//! Review events for a single card must be applied one at a time; different
//! cards can be scheduled concurrently since the engine holds no mutable
//! state.

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::{Result, SchedulerError};
pub use scheduler::{Scheduler, SchedulingResult};
pub use types::{CardSchedule, CardState, CardStatus, Rating, ReviewEvent};

//! Core types for the scheduling engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

pub(crate) const MS_PER_DAY: f64 = 86_400_000.0;

/// Card learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Ordinal weight (1-4). Used for display and review logs, never by the
    /// transition logic.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(SchedulerError::InvalidRating(other)),
        }
    }
}

/// Card memory state.
///
/// The one persistent entity the engine operates on. Mutated exactly once
/// per review by [`Scheduler::update_state`]; the caller persists the
/// returned value wholesale as the new authoritative state.
///
/// [`Scheduler::update_state`]: crate::scheduler::Scheduler::update_state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    pub status: CardStatus,
    /// Memory-decay time constant in days. Always >= 1.
    pub stability: f64,
    /// Retention difficulty in [1, 10].
    pub difficulty: f64,
    /// Days since the last review, supplied by the caller before scheduling
    /// and zeroed on every update.
    pub elapsed_days: f64,
    /// Interval until the next review, in days. Sub-day while learning
    /// (1/1440 is one minute).
    pub scheduled_days: f64,
    /// Total rating events applied.
    pub reps: u32,
    /// "Again" ratings received while in review.
    pub lapses: u32,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            status: CardStatus::New,
            stability: 1.0,
            difficulty: 5.0,
            elapsed_days: 0.0,
            scheduled_days: 0.0,
            reps: 0,
            lapses: 0,
        }
    }
}

impl CardState {
    /// Concrete next-review instant for a card whose state was produced at
    /// `now`.
    pub fn next_review_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::milliseconds((self.scheduled_days.max(0.0) * MS_PER_DAY) as i64)
    }
}

/// Review timestamps persisted alongside the card state.
///
/// A `None` next-review means the card has never been scheduled and is due
/// immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CardSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

impl CardSchedule {
    /// Whether the card is eligible for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review {
            Some(due) => due <= now,
            None => true,
        }
    }

    /// Days since the last review, 0 for a never-reviewed card. This is the
    /// `elapsed_days` input the caller writes into [`CardState`] before
    /// scheduling.
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> f64 {
        match self.last_reviewed {
            Some(last) => {
                (now.signed_duration_since(last).num_milliseconds() as f64 / MS_PER_DAY).max(0.0)
            }
            None => 0.0,
        }
    }
}

/// Review-log record for one rating event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub rating: Rating,
    pub reviewed_at: DateTime<Utc>,
    pub interval_before: f64,
    pub interval_after: f64,
    pub stability_before: f64,
    pub stability_after: f64,
    pub difficulty_before: f64,
    pub difficulty_after: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rating_values_are_ordinal() {
        assert_eq!(Rating::Again.to_value(), 1);
        assert_eq!(Rating::Hard.to_value(), 2);
        assert_eq!(Rating::Good.to_value(), 3);
        assert_eq!(Rating::Easy.to_value(), 4);
    }

    #[test]
    fn rating_from_value_round_trips() {
        for rating in [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy] {
            assert_eq!(Rating::try_from(rating.to_value()), Ok(rating));
        }
    }

    #[test]
    fn rating_rejects_out_of_range_values() {
        assert_eq!(Rating::try_from(0), Err(SchedulerError::InvalidRating(0)));
        assert_eq!(Rating::try_from(5), Err(SchedulerError::InvalidRating(5)));
    }

    #[test]
    fn card_state_serializes_snake_case() {
        let state = CardState::default();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"status\":\"new\""));
        assert!(json.contains("\"scheduled_days\":0.0"));

        let back: CardState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn next_review_at_offsets_by_scheduled_days() {
        let now = Utc::now();
        let state = CardState {
            scheduled_days: 2.5,
            ..Default::default()
        };
        let next = state.next_review_at(now);
        let offset_ms = next.signed_duration_since(now).num_milliseconds() as f64;
        assert!((offset_ms - 2.5 * MS_PER_DAY).abs() < 1.0);
    }

    #[test]
    fn sub_day_interval_lands_within_the_day() {
        let now = Utc::now();
        let state = CardState {
            scheduled_days: 10.0 / 1440.0,
            ..Default::default()
        };
        let next = state.next_review_at(now);
        assert_eq!(next.signed_duration_since(now).num_minutes(), 10);
    }

    #[test]
    fn never_reviewed_card_is_due() {
        let schedule = CardSchedule::default();
        assert!(schedule.is_due(Utc::now()));
        assert_eq!(schedule.elapsed_days(Utc::now()), 0.0);
    }

    #[test]
    fn card_due_only_after_next_review_passes() {
        let now = Utc::now();
        let schedule = CardSchedule {
            last_reviewed: Some(now - Duration::days(3)),
            next_review: Some(now + Duration::hours(1)),
        };
        assert!(!schedule.is_due(now));
        assert!(schedule.is_due(now + Duration::hours(2)));
    }

    #[test]
    fn elapsed_days_measured_from_last_review() {
        let now = Utc::now();
        let schedule = CardSchedule {
            last_reviewed: Some(now - Duration::days(3)),
            next_review: Some(now),
        };
        assert!((schedule.elapsed_days(now) - 3.0).abs() < 1e-9);
        // Clock skew never produces a negative elapsed time.
        assert_eq!(schedule.elapsed_days(now - Duration::days(5)), 0.0);
    }
}

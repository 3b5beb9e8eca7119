//! Spaced-repetition scheduler.
//!
//! FSRS-family memory model:
//! - Stability (S): days until recall probability decays to the 90% target
//! - Difficulty (D): per-card scalar 1-10
//! - Retrievability (R): probability of recall at review time
//!
//! This is the simplified two-weight variant the app has always shipped.
//! Persisted schedules depend on its exact constants and clamps, so the
//! formulas stay as-is rather than tracking published FSRS revisions.

use chrono::{DateTime, Utc};

use crate::types::{CardState, CardStatus, Rating, ReviewEvent};

/// Hard ceiling on intervals and stability growth, in days (6 months).
const MAX_INTERVAL_DAYS: f64 = 180.0;
/// Stability floor; logarithms are only taken at or above this.
const MIN_STABILITY: f64 = 1.0;

const ONE_MINUTE: f64 = 1.0 / 1440.0;
const FIVE_MINUTES: f64 = 5.0 / 1440.0;
const TEN_MINUTES: f64 = 10.0 / 1440.0;

/// Result of scheduling a card after a review.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub new_state: CardState,
    pub next_due: DateTime<Utc>,
    /// Log record for the review session's history.
    pub event: ReviewEvent,
}

/// Scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Weight on the retrievability term of the stability update.
    pub w0: f64,
    /// Weight on the log-stability term of the stability update.
    pub w1: f64,
    /// Target recall probability when converting stability to an interval.
    pub request_retention: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            w0: 1.0,
            w1: 1.0,
            request_retention: 0.9,
        }
    }
}

impl Scheduler {
    /// Initial state for a new card.
    pub fn initial_state(&self) -> CardState {
        CardState::default()
    }

    /// Compute the card's next memory state after one rating.
    ///
    /// Total over its input domain: out-of-range numbers are clamped, never
    /// rejected. `elapsed_days` is read from the input state (the caller
    /// derives it from the last-reviewed timestamp) and zeroed in the output.
    pub fn update_state(&self, state: &CardState, rating: Rating) -> CardState {
        let next = if state.status == CardStatus::New || state.reps == 0 {
            Self::first_review(state, rating)
        } else {
            match state.status {
                CardStatus::Learning | CardStatus::Relearning => {
                    Self::learning_step(state, rating)
                }
                _ => self.review_step(state, rating),
            }
        };

        tracing::debug!(
            from = ?state.status,
            to = ?next.status,
            rating = rating.to_value(),
            stability = next.stability,
            scheduled_days = next.scheduled_days,
            "card rescheduled"
        );

        next
    }

    /// Apply one rating and derive the concrete next-due instant plus the
    /// review-log record.
    pub fn schedule(
        &self,
        state: &CardState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> SchedulingResult {
        let new_state = self.update_state(state, rating);
        let next_due = new_state.next_review_at(now);
        let event = ReviewEvent {
            rating,
            reviewed_at: now,
            interval_before: state.scheduled_days,
            interval_after: new_state.scheduled_days,
            stability_before: state.stability,
            stability_after: new_state.stability,
            difficulty_before: state.difficulty,
            difficulty_after: new_state.difficulty,
        };

        SchedulingResult {
            new_state,
            next_due,
            event,
        }
    }

    /// First rating of a card: short learning steps, stability reset to 1.
    fn first_review(state: &CardState, rating: Rating) -> CardState {
        let (status, scheduled_days) = match rating {
            Rating::Again => (CardStatus::Learning, ONE_MINUTE),
            Rating::Hard => (CardStatus::Review, FIVE_MINUTES),
            Rating::Good => (CardStatus::Review, TEN_MINUTES),
            Rating::Easy => (CardStatus::Review, 1.0),
        };

        CardState {
            status,
            stability: MIN_STABILITY,
            elapsed_days: 0.0,
            scheduled_days,
            reps: 1,
            ..*state
        }
    }

    /// Learning and relearning share the same short-interval on-ramp.
    fn learning_step(state: &CardState, rating: Rating) -> CardState {
        let (status, scheduled_days) = match rating {
            Rating::Again => (state.status, ONE_MINUTE),
            // Hard repeats the step without graduating.
            Rating::Hard => (state.status, TEN_MINUTES),
            Rating::Good | Rating::Easy => (CardStatus::Review, 1.0),
        };

        CardState {
            status,
            elapsed_days: 0.0,
            scheduled_days,
            reps: state.reps + 1,
            ..*state
        }
    }

    /// Review-state transitions: the only branch where the memory model
    /// actually moves.
    fn review_step(&self, state: &CardState, rating: Rating) -> CardState {
        let stability = state.stability.max(MIN_STABILITY);
        let retrievability = Self::retrievability(state.elapsed_days, stability);

        match rating {
            Rating::Again => CardState {
                status: CardStatus::Relearning,
                stability: (stability * 0.5).max(MIN_STABILITY),
                difficulty: (state.difficulty + 1.0).min(10.0),
                elapsed_days: 0.0,
                scheduled_days: ONE_MINUTE,
                reps: state.reps + 1,
                lapses: state.lapses + 1,
            },
            Rating::Hard => {
                let stability =
                    (self.stability_update(retrievability, stability) * 0.8).max(MIN_STABILITY);
                let interval =
                    (state.scheduled_days * 1.2).min(self.interval_from_stability(stability));
                Self::reviewed(state, stability, (state.difficulty - 0.5).max(1.0), interval)
            }
            Rating::Good => {
                let stability = self.stability_update(retrievability, stability);
                let interval =
                    (state.scheduled_days * 2.0).min(self.interval_from_stability(stability));
                Self::reviewed(state, stability, state.difficulty, interval)
            }
            Rating::Easy => {
                let stability = self.stability_update(retrievability, stability) * 1.3;
                let interval =
                    (state.scheduled_days * 2.5).min(self.interval_from_stability(stability));
                Self::reviewed(state, stability, (state.difficulty - 1.0).max(1.0), interval)
            }
        }
    }

    fn reviewed(state: &CardState, stability: f64, difficulty: f64, interval: f64) -> CardState {
        CardState {
            status: CardStatus::Review,
            stability,
            difficulty,
            elapsed_days: 0.0,
            scheduled_days: interval.min(MAX_INTERVAL_DAYS),
            reps: state.reps + 1,
            lapses: state.lapses,
        }
    }

    /// R = 0.9^(elapsed / S): recall probability on the 90%-retention decay
    /// curve.
    fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
        let decay = 0.9_f64.ln() * elapsed_days.max(0.0) / stability.max(MIN_STABILITY);
        decay.exp()
    }

    /// S' = S * (1 + e^w0 * (11 - R) + w1 * ln S), clamped to [1, 180].
    fn stability_update(&self, retrievability: f64, stability: f64) -> f64 {
        let s = stability.max(MIN_STABILITY);
        let growth = 1.0 + self.w0.exp() * (11.0 - retrievability) + self.w1 * s.ln();
        (s * growth).clamp(MIN_STABILITY, MAX_INTERVAL_DAYS)
    }

    /// I = round(S * ln(retention) / ln 0.9), clamped to [1, 180].
    fn interval_from_stability(&self, stability: f64) -> f64 {
        let interval = stability.max(MIN_STABILITY) * self.request_retention.ln() / 0.9_f64.ln();
        interval.round().clamp(1.0, MAX_INTERVAL_DAYS)
    }
}

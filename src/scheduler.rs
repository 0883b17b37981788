use chrono::NaiveDate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_INITIAL_EASE, DEFAULT_MIN_EASE, SchedulerConfig};
use crate::date::{add_days, format_date};
use crate::error::Result;
use crate::mastery::{MasteryStatus, mastery_status_with_threshold};
use crate::preview::{IntervalPreview, format_interval};
use crate::quality::{Quality, QualityLabel};

/// Per-item progress snapshot, as persisted by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    pub ease_factor: f64,
    /// Days until the next review. 0 means due now.
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse.
    pub repetition: u32,
}

impl Default for MemoryState {
    /// A brand-new item that has never been reviewed.
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_INITIAL_EASE,
            interval: 0,
            repetition: 0,
        }
    }
}

impl MemoryState {
    /// Builds a state from raw stored columns using the default SM-2
    /// constants. Negative counts become 0, a non-finite ease becomes the
    /// initial ease and a low one is raised to the floor. A scheduler with a
    /// custom config should use [`Scheduler::state_from_stored`].
    pub fn from_stored(ease_factor: f64, interval: i64, repetition: i64) -> Self {
        normalize_stored(
            ease_factor,
            interval,
            repetition,
            DEFAULT_MIN_EASE,
            DEFAULT_INITIAL_EASE,
        )
    }
}

fn normalize_stored(
    ease_factor: f64,
    interval: i64,
    repetition: i64,
    min_ease: f64,
    initial_ease: f64,
) -> MemoryState {
    let ease_factor = if ease_factor.is_finite() {
        ease_factor.max(min_ease)
    } else {
        initial_ease
    };
    MemoryState {
        ease_factor,
        interval: interval.clamp(0, u32::MAX.into()) as u32,
        repetition: repetition.clamp(0, u32::MAX.into()) as u32,
    }
}

/// Result of a review: the new state plus the day it is next due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    #[serde(flatten)]
    pub state: MemoryState,
    pub next_review: NaiveDate,
}

impl ReviewOutcome {
    /// `YYYY-MM-DD`, the form storage compares against "today".
    pub fn next_review_string(&self) -> String {
        format_date(self.next_review)
    }
}

/// How an item with no progress record is scheduled on its first review.
///
/// Words and sentences deliberately differ. A word is always shown again
/// tomorrow, whatever the answer. A sentence answered wrongly on first sight
/// stays due today with a lowered ease.
///
/// The policy only covers that first review. Once an item has a record, words
/// and sentences alike go through [`Scheduler::compute_review`], where a lapse
/// is due again tomorrow. There is no separate sentence recurrence with
/// same-day lapses or a flat `-0.2` ease penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstReviewPolicy {
    /// `interval = 1`, `repetition = 1`, initial ease. Quality is ignored.
    Word,
    /// Success: `interval = 1`, `repetition = 1`, initial ease.
    /// Miss: `interval = 0`, `repetition = 0`, `sentence_lapse_ease`.
    Sentence,
}

/// SM-2 scheduler. Immutable once built and safe to share between threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Like [`MemoryState::from_stored`], but normalizes against this
    /// scheduler's floor and initial ease.
    pub fn state_from_stored(
        &self,
        ease_factor: f64,
        interval: i64,
        repetition: i64,
    ) -> MemoryState {
        normalize_stored(
            ease_factor,
            interval,
            repetition,
            self.config.min_ease,
            self.config.initial_ease,
        )
    }

    /// The SM-2 recurrence without date arithmetic.
    ///
    /// A lapse resets `repetition` to 0 and the interval to 1. A success steps
    /// through 1 day, 6 days, then `round(interval * ease)` (half away from
    /// zero). The ease update always starts from the ease passed in.
    pub fn next_state(&self, quality: impl Into<Quality>, state: &MemoryState) -> MemoryState {
        let quality = quality.into();
        let (interval, repetition) = if quality.is_lapse() {
            debug!(
                "lapse at quality {quality}: repetition {} -> 0, interval {} -> 1",
                state.repetition, state.interval
            );
            (1, 0)
        } else {
            let interval = match state.repetition {
                0 => 1,
                1 => 6,
                _ => grow_interval(state.interval, state.ease_factor),
            };
            (interval, state.repetition.saturating_add(1))
        };
        let ease_factor = self
            .config
            .round_ease(self.next_ease(state.ease_factor, quality))
            .max(self.config.min_ease);
        let next = MemoryState {
            ease_factor,
            interval,
            repetition,
        };
        trace!("quality {quality}: {state:?} -> {next:?}");
        next
    }

    pub fn compute_review(
        &self,
        quality: impl Into<Quality>,
        state: &MemoryState,
        today: NaiveDate,
    ) -> ReviewOutcome {
        outcome(self.next_state(quality, state), today)
    }

    /// Schedules an item that has no memory state yet. See [`FirstReviewPolicy`].
    pub fn first_review(
        &self,
        policy: FirstReviewPolicy,
        quality: impl Into<Quality>,
        today: NaiveDate,
    ) -> ReviewOutcome {
        let quality = quality.into();
        let state = match policy {
            FirstReviewPolicy::Sentence if quality.is_lapse() => MemoryState {
                ease_factor: self.config.sentence_lapse_ease,
                interval: 0,
                repetition: 0,
            },
            FirstReviewPolicy::Word | FirstReviewPolicy::Sentence => MemoryState {
                ease_factor: self.config.initial_ease,
                interval: 1,
                repetition: 1,
            },
        };
        debug!("first review ({policy:?}) at quality {quality}: {state:?}");
        outcome(state, today)
    }

    /// What each answer button would do to `state`. Nothing is mutated.
    pub fn preview(&self, state: &MemoryState) -> IntervalPreview {
        let interval_for =
            |label: QualityLabel| format_interval(self.next_state(label, state).interval);
        IntervalPreview {
            again: interval_for(QualityLabel::Again),
            hard: interval_for(QualityLabel::Hard),
            good: interval_for(QualityLabel::Good),
            easy: interval_for(QualityLabel::Easy),
        }
    }

    pub fn mastery_status(&self, interval: u32) -> MasteryStatus {
        mastery_status_with_threshold(interval, self.config.mastered_interval)
    }

    fn next_ease(&self, ease_factor: f64, quality: Quality) -> f64 {
        let miss = 5.0 - f64::from(quality.value());
        let ease = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        ease.max(self.config.min_ease)
    }
}

fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    // float to int casts saturate, and NaN becomes 0
    (f64::from(interval) * ease_factor).round() as u32
}

fn outcome(state: MemoryState, today: NaiveDate) -> ReviewOutcome {
    ReviewOutcome {
        state,
        next_review: add_days(today, state.interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use crate::quality::CoarseAnswer;
    use crate::test_helpers::{TestHelper, date};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn state(ease_factor: f64, interval: u32, repetition: u32) -> MemoryState {
        MemoryState {
            ease_factor,
            interval,
            repetition,
        }
    }

    #[test]
    fn first_success_from_scratch() {
        let today = date(2024, 5, 1);
        let outcome = Scheduler::default().compute_review(4, &MemoryState::default(), today);
        assert_eq!(
            outcome,
            ReviewOutcome {
                state: state(2.5, 1, 1),
                next_review: date(2024, 5, 2),
            }
        );
        assert_eq!(outcome.next_review_string(), "2024-05-02");
    }

    #[test]
    fn two_good_reviews_give_one_then_six_days() {
        let scheduler = Scheduler::default();
        let first = scheduler.next_state(QualityLabel::Good, &MemoryState::default());
        let second = scheduler.next_state(QualityLabel::Good, &first);
        assert_eq!([first.interval, second.interval], [1, 6]);
        assert_eq!([first.repetition, second.repetition], [1, 2]);
    }

    #[test]
    fn good_review_multiplies_by_ease() {
        let today = date(2024, 5, 1);
        let outcome = Scheduler::default().compute_review(4, &state(2.5, 6, 2), today);
        assert_eq!(outcome.state, state(2.5, 15, 3));
        assert_eq!(outcome.next_review, date(2024, 5, 16));
    }

    #[test]
    fn good_leaves_ease_unchanged() {
        let scheduler = Scheduler::default();
        for ease in [1.3, 1.75, 2.5, 3.1] {
            assert_eq!(scheduler.next_state(4, &state(ease, 10, 4)).ease_factor, ease);
        }
    }

    #[test]
    fn ease_change_per_quality() {
        let scheduler = Scheduler::default();
        let eases = (0..=5)
            .map(|q| scheduler.next_state(q, &state(2.5, 6, 2)).ease_factor)
            .collect::<Vec<_>>();
        eases.assert_approx_eq([1.7, 1.96, 2.18, 2.36, 2.5, 2.6]);
    }

    #[test]
    fn again_resets_and_lowers_ease() {
        let scheduler = Scheduler::default();
        let today = date(2024, 5, 1);
        for prior in [state(2.5, 0, 0), state(2.5, 6, 2), state(2.1, 180, 9)] {
            let outcome = scheduler.compute_review(QualityLabel::Again, &prior, today);
            assert_eq!(outcome.state.interval, 1);
            assert_eq!(outcome.state.repetition, 0);
            assert!(outcome.state.ease_factor < prior.ease_factor);
            assert_eq!(outcome.next_review, date(2024, 5, 2));
        }
        let floored = scheduler.next_state(0, &state(1.5, 30, 5));
        assert_eq!(floored.ease_factor, DEFAULT_MIN_EASE);
    }

    #[test]
    fn every_lapse_quality_resets() {
        let scheduler = Scheduler::default();
        for q in 0..3 {
            let next = scheduler.next_state(q, &state(2.5, 45, 7));
            assert_eq!((next.interval, next.repetition), (1, 0), "quality {q}");
        }
        let missed = scheduler.next_state(CoarseAnswer::MissedIt, &state(2.5, 45, 7));
        assert_eq!((missed.interval, missed.repetition), (1, 0));
    }

    #[test]
    fn first_success_after_reset_ignores_old_interval() {
        let scheduler = Scheduler::default();
        for interval in [0, 1, 6, 300] {
            assert_eq!(scheduler.next_state(4, &state(2.5, interval, 0)).interval, 1);
        }
    }

    #[test]
    fn quality_is_clamped() {
        let scheduler = Scheduler::default();
        let today = date(2024, 5, 1);
        let prior = state(2.2, 12, 3);
        assert_eq!(
            scheduler.compute_review(-5, &prior, today),
            scheduler.compute_review(0, &prior, today)
        );
        assert_eq!(
            scheduler.compute_review(99, &prior, today),
            scheduler.compute_review(5, &prior, today)
        );
    }

    #[test]
    fn ease_floor_and_independence_hold_for_random_inputs() {
        let scheduler = Scheduler::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let quality: i64 = rng.random_range(-3..=8);
            let ease = rng.random_range(1.3..4.0);
            let a = scheduler.next_state(
                quality,
                &state(ease, rng.random_range(0..400), rng.random_range(0..20)),
            );
            let b = scheduler.next_state(
                quality,
                &state(ease, rng.random_range(0..400), rng.random_range(0..20)),
            );
            assert!(a.ease_factor >= DEFAULT_MIN_EASE, "{quality} {ease}");
            assert_eq!(a.ease_factor, b.ease_factor);
        }
    }

    #[test]
    fn long_run_trajectory() {
        let scheduler = Scheduler::default();
        let mut current = MemoryState::default();
        let mut intervals = vec![];
        for q in [4, 4, 4, 5, 3, 0, 4, 4, 4] {
            current = scheduler.next_state(q, &current);
            intervals.push(current.interval);
        }
        // 15 * 2.5 = 37.5 -> 38, 38 * 2.6 = 98.8 -> 99, 6 * 1.66 = 9.96 -> 10
        assert_eq!(intervals, [1, 6, 15, 38, 99, 1, 1, 6, 10]);
        assert_eq!(current.ease_factor, 1.66);
    }

    #[test]
    fn full_precision_when_rounding_is_disabled() -> Result<()> {
        let scheduler = Scheduler::new(SchedulerConfig {
            ease_decimals: None,
            ..Default::default()
        })?;
        let next = scheduler.next_state(0, &MemoryState::default());
        assert_eq!(next.ease_factor, 1.7000000000000002);
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Scheduler::new(SchedulerConfig {
            min_ease: 3.0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfig { .. }));
    }

    #[test]
    fn word_bootstrap_ignores_quality() {
        let scheduler = Scheduler::default();
        let today = date(2024, 5, 31);
        for q in 0..=5 {
            let outcome = scheduler.first_review(FirstReviewPolicy::Word, q, today);
            assert_eq!(outcome.state, state(2.5, 1, 1));
            assert_eq!(outcome.next_review, date(2024, 6, 1));
        }
    }

    #[test]
    fn sentence_bootstrap_branches_on_quality() {
        let scheduler = Scheduler::default();
        let today = date(2024, 5, 31);

        let hit = scheduler.first_review(FirstReviewPolicy::Sentence, 3, today);
        assert_eq!(hit.state, state(2.5, 1, 1));
        assert_eq!(hit.next_review, date(2024, 6, 1));

        let miss = scheduler.first_review(FirstReviewPolicy::Sentence, 2, today);
        assert_eq!(miss.state, state(2.0, 0, 0));
        assert_eq!(miss.next_review, today);
    }

    #[test]
    fn preview_matches_compute_review() {
        let scheduler = Scheduler::default();
        let current = state(2.5, 6, 2);
        let before = current;
        let preview = scheduler.preview(&current);
        assert_eq!(current, before);
        assert_eq!(
            preview,
            IntervalPreview {
                again: "1d".into(),
                hard: "2w".into(),
                good: "2w".into(),
                easy: "2w".into(),
            }
        );
        assert_eq!(preview.iter().count(), 4);

        let fresh = scheduler.preview(&MemoryState::default());
        assert!(fresh.iter().all(|(_, label)| label == "1d"));

        // growth uses the ease from before the review, so hard, good and easy agree
        let mature = scheduler.preview(&state(2.5, 100, 5));
        assert_eq!([mature.hard, mature.good, mature.easy], ["8mo", "8mo", "8mo"]);
    }

    #[test]
    fn preview_fields_match_their_buttons() {
        use strum::IntoEnumIterator;

        let scheduler = Scheduler::default();
        let current = state(1.3, 40, 4);
        let preview = scheduler.preview(&current);
        assert_eq!(preview.again, "1d");
        assert_eq!(preview.good, "2mo");
        for label in QualityLabel::iter() {
            let expected = format_interval(scheduler.next_state(label, &current).interval);
            assert_eq!(preview.get(label), expected, "{label}");
        }
    }

    #[test]
    fn serializes_like_storage_expects() {
        let outcome = Scheduler::default().compute_review(4, &state(2.5, 6, 2), date(2024, 5, 1));
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "easeFactor": 2.5,
                "interval": 15,
                "repetition": 3,
                "nextReview": "2024-05-16",
            })
        );
    }

    #[test]
    fn stored_values_are_normalized() {
        assert_eq!(MemoryState::from_stored(2.3, -4, -1), state(2.3, 0, 0));
        assert_eq!(MemoryState::from_stored(f64::NAN, 3, 1), state(2.5, 3, 1));
        assert_eq!(MemoryState::from_stored(0.4, 3, 1), state(1.3, 3, 1));
        assert_eq!(
            MemoryState::from_stored(2.5, i64::MAX, 2).interval,
            u32::MAX
        );
    }

    #[test]
    fn stored_values_follow_custom_config() -> Result<()> {
        let scheduler = Scheduler::new(SchedulerConfig {
            initial_ease: 2.8,
            min_ease: 1.5,
            ..Default::default()
        })?;
        assert_eq!(scheduler.state_from_stored(1.4, 3, 1), state(1.5, 3, 1));
        assert_eq!(scheduler.state_from_stored(f64::INFINITY, -2, 1), state(2.8, 0, 1));
        assert_eq!(
            Scheduler::default().state_from_stored(0.4, 3, 1),
            MemoryState::from_stored(0.4, 3, 1)
        );
        Ok(())
    }

    #[test]
    fn established_sentence_lapse_is_due_tomorrow() {
        let scheduler = Scheduler::default();
        let first = scheduler.first_review(FirstReviewPolicy::Sentence, 4, date(2024, 1, 1));
        let lapse = scheduler.compute_review(0, &first.state, date(2024, 1, 2));
        assert_eq!(lapse.state, state(1.7, 1, 0));
        assert_eq!(lapse.next_review, date(2024, 1, 3));
    }

    #[test]
    fn mastery_uses_configured_threshold() -> Result<()> {
        let scheduler = Scheduler::new(SchedulerConfig {
            mastered_interval: 30,
            ..Default::default()
        })?;
        assert_eq!(scheduler.mastery_status(21), MasteryStatus::Learning);
        assert_eq!(Scheduler::default().mastery_status(21), MasteryStatus::Mastered);
        Ok(())
    }

    #[test]
    fn scheduler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scheduler>();
    }
}

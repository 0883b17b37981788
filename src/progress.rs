use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::mastery::MasteryStatus;
use crate::quality::Quality;
use crate::scheduler::{FirstReviewPolicy, MemoryState, ReviewOutcome, Scheduler};

/// The progress record kept for one word or sentence.
///
/// `times_seen` counts every exposure and is never reset, unlike
/// `state.repetition`, which drops to 0 on a lapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    #[serde(flatten)]
    pub state: MemoryState,
    pub next_review: NaiveDate,
    pub times_seen: u32,
    pub times_correct: u32,
    pub last_review: Option<NaiveDate>,
}

impl ItemProgress {
    /// An item is due on or after its review date.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }

    pub fn mastery(&self, scheduler: &Scheduler) -> MasteryStatus {
        scheduler.mastery_status(self.state.interval)
    }

    /// Share of exposures answered correctly, or `None` if never seen.
    pub fn accuracy(&self) -> Option<f64> {
        (self.times_seen > 0).then(|| f64::from(self.times_correct) / f64::from(self.times_seen))
    }

    fn record(&mut self, outcome: ReviewOutcome, quality: Quality, today: NaiveDate) {
        self.state = outcome.state;
        self.next_review = outcome.next_review;
        self.times_seen = self.times_seen.saturating_add(1);
        if quality.is_success() {
            self.times_correct = self.times_correct.saturating_add(1);
        }
        self.last_review = Some(today);
    }
}

impl Scheduler {
    /// Applies one review to an item, bootstrapping it with `policy` when it
    /// has no progress record yet.
    pub fn review_item(
        &self,
        policy: FirstReviewPolicy,
        existing: Option<&ItemProgress>,
        quality: impl Into<Quality>,
        today: NaiveDate,
    ) -> ItemProgress {
        let quality = quality.into();
        match existing {
            Some(progress) => {
                let mut progress = progress.clone();
                let outcome = self.compute_review(quality, &progress.state, today);
                progress.record(outcome, quality, today);
                progress
            }
            None => {
                let outcome = self.first_review(policy, quality, today);
                ItemProgress {
                    state: outcome.state,
                    next_review: outcome.next_review,
                    // first exposures count as seen, never as correct
                    times_seen: 1,
                    times_correct: 0,
                    last_review: Some(today),
                }
            }
        }
    }

    /// Folds a chronological review history into the resulting progress
    /// record. The first entry bootstraps the item.
    pub fn replay(
        &self,
        policy: FirstReviewPolicy,
        reviews: &[(NaiveDate, Quality)],
    ) -> Option<ItemProgress> {
        let progress = reviews.iter().fold(None, |progress, &(day, quality)| {
            Some(self.review_item(policy, progress.as_ref(), quality, day))
        });
        if let Some(progress) = &progress {
            debug!("replayed {} reviews: {:?}", reviews.len(), progress.state);
        }
        progress
    }
}

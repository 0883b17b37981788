use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::config::DEFAULT_MASTERED_INTERVAL;

/// UI label derived from an item's interval. Never stored: a lapse moves a
/// mastered item straight back to `New` because its interval drops to 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MasteryStatus {
    New,
    Learning,
    Mastered,
}

/// Classifies with the default 21-day mastery threshold.
pub fn mastery_status(interval: u32) -> MasteryStatus {
    mastery_status_with_threshold(interval, DEFAULT_MASTERED_INTERVAL)
}

pub(crate) fn mastery_status_with_threshold(interval: u32, mastered_interval: u32) -> MasteryStatus {
    if interval <= 1 {
        MasteryStatus::New
    } else if interval < mastered_interval {
        MasteryStatus::Learning
    } else {
        MasteryStatus::Mastered
    }
}

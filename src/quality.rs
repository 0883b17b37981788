//! Recall quality on the 0-5 SM-2 scale.
//!
//! - 0: complete blackout
//! - 1: incorrect, but the answer was recognised once shown
//! - 2: incorrect, but the answer seemed easy once shown
//! - 3: correct with serious difficulty
//! - 4: correct after some hesitation
//! - 5: perfect recall

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Result, SchedulerError, UnknownQualitySnafu};

/// A quality rating, always within `0..=5`.
///
/// Construction from any integer clamps instead of failing, so a UI sending
/// `-5` is treated as a blackout and `99` as perfect recall.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: Quality = Quality(0);
    pub const MAX: Quality = Quality(5);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 5) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Quality 3 and above counts as a successful recall.
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }

    pub fn is_lapse(self) -> bool {
        !self.is_success()
    }
}

impl From<i64> for Quality {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Quality {
    fn from(value: i32) -> Self {
        Self::new(value.into())
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self::new(value.into())
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts either a button label (`"good"`, case-insensitive) or an integer,
/// which is clamped like any other numeric quality.
impl FromStr for Quality {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(label) = trimmed.parse::<QualityLabel>() {
            return Ok(label.into());
        }
        trimmed
            .parse::<i64>()
            .map(Quality::new)
            .map_err(|_| UnknownQualitySnafu { input: s }.build())
    }
}

/// The four answer buttons of the fine-grained review UI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QualityLabel {
    Again,
    Hard,
    Good,
    Easy,
}

impl QualityLabel {
    pub fn quality(self) -> Quality {
        match self {
            QualityLabel::Again => Quality(0),
            QualityLabel::Hard => Quality(3),
            QualityLabel::Good => Quality(4),
            QualityLabel::Easy => Quality(5),
        }
    }
}

impl From<QualityLabel> for Quality {
    fn from(label: QualityLabel) -> Self {
        label.quality()
    }
}

/// The two-button "got it / missed it" UI. It never produces a blackout:
/// a miss is reported as quality 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoarseAnswer {
    GotIt,
    MissedIt,
}

impl From<bool> for CoarseAnswer {
    fn from(correct: bool) -> Self {
        if correct {
            CoarseAnswer::GotIt
        } else {
            CoarseAnswer::MissedIt
        }
    }
}

impl From<CoarseAnswer> for Quality {
    fn from(answer: CoarseAnswer) -> Self {
        match answer {
            CoarseAnswer::GotIt => Quality(4),
            CoarseAnswer::MissedIt => Quality(2),
        }
    }
}

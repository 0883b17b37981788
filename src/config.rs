use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidConfigSnafu, Result};

pub const DEFAULT_INITIAL_EASE: f64 = 2.5;
pub const DEFAULT_MIN_EASE: f64 = 1.3;
pub const DEFAULT_SENTENCE_LAPSE_EASE: f64 = 2.0;
pub const DEFAULT_MASTERED_INTERVAL: u32 = 21;
const MAX_EASE_DECIMALS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Ease factor given to an item on its first review.
    pub initial_ease: f64,
    /// Floor applied to every computed ease factor.
    pub min_ease: f64,
    /// Ease factor of a sentence whose very first review was a miss.
    pub sentence_lapse_ease: f64,
    /// Decimal places kept when storing the ease factor. `None` keeps full precision.
    pub ease_decimals: Option<u32>,
    /// Interval (in days) from which an item counts as mastered.
    pub mastered_interval: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_INITIAL_EASE,
            min_ease: DEFAULT_MIN_EASE,
            sentence_lapse_ease: DEFAULT_SENTENCE_LAPSE_EASE,
            ease_decimals: Some(2),
            mastered_interval: DEFAULT_MASTERED_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        let invalid = |reason: String| InvalidConfigSnafu { reason }.fail();
        for (name, value) in [
            ("initial_ease", self.initial_ease),
            ("min_ease", self.min_ease),
            ("sentence_lapse_ease", self.sentence_lapse_ease),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be a positive number, got {value}"));
            }
        }
        if self.initial_ease < self.min_ease {
            return invalid(format!(
                "initial_ease {} is below min_ease {}",
                self.initial_ease, self.min_ease
            ));
        }
        if self.sentence_lapse_ease < self.min_ease {
            return invalid(format!(
                "sentence_lapse_ease {} is below min_ease {}",
                self.sentence_lapse_ease, self.min_ease
            ));
        }
        if self.mastered_interval <= 1 {
            return invalid(format!(
                "mastered_interval must be above 1 day, got {}",
                self.mastered_interval
            ));
        }
        if let Some(decimals) = self.ease_decimals.filter(|d| *d > MAX_EASE_DECIMALS) {
            return invalid(format!(
                "ease_decimals must be at most {MAX_EASE_DECIMALS}, got {decimals}"
            ));
        }
        if *self != Self::default() {
            info!("scheduler config: {self:?}");
        }
        Ok(())
    }

    /// Storage rounding of an ease factor. Not part of the recurrence itself.
    pub(crate) fn round_ease(&self, ease: f64) -> f64 {
        match self.ease_decimals {
            Some(2) => ease.to_2_decimal(),
            Some(decimals) => {
                let scale = 10f64.powi(decimals as i32);
                (ease * scale).round() / scale
            }
            None => ease,
        }
    }
}

trait Round {
    fn to_2_decimal(self) -> f64;
}

impl Round for f64 {
    fn to_2_decimal(self) -> f64 {
        (self * 100.0).round() / 100.0
    }
}

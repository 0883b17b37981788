use serde::{Deserialize, Serialize};

use crate::quality::QualityLabel;

/// Short label for an interval, as shown under each answer button.
///
/// Weeks, months and years are rounded to the nearest whole unit, so 10 days
/// shows as `1w` and 11 days as `2w`.
pub fn format_interval(days: u32) -> String {
    let n = days as f64;
    match days {
        1 => "1d".to_string(),
        0..7 => format!("{days}d"),
        7..30 => format!("{}w", (n / 7.0).round()),
        30..365 => format!("{}mo", (n / 30.0).round()),
        _ => format!("{}y", (n / 365.0).round()),
    }
}

/// The interval each answer button would produce, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPreview {
    pub again: String,
    pub hard: String,
    pub good: String,
    pub easy: String,
}

impl IntervalPreview {
    pub fn get(&self, label: QualityLabel) -> &str {
        match label {
            QualityLabel::Again => &self.again,
            QualityLabel::Hard => &self.hard,
            QualityLabel::Good => &self.good,
            QualityLabel::Easy => &self.easy,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (QualityLabel, &str)> {
        [
            (QualityLabel::Again, self.again.as_str()),
            (QualityLabel::Hard, self.hard.as_str()),
            (QualityLabel::Good, self.good.as_str()),
            (QualityLabel::Easy, self.easy.as_str()),
        ]
        .into_iter()
    }
}

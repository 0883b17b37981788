mod config;
mod date;
mod error;
mod mastery;
mod preview;
mod progress;
mod quality;
mod scheduler;
mod session;
#[cfg(test)]
mod test_helpers;

pub use config::{
    DEFAULT_INITIAL_EASE, DEFAULT_MASTERED_INTERVAL, DEFAULT_MIN_EASE,
    DEFAULT_SENTENCE_LAPSE_EASE, SchedulerConfig,
};
pub use date::{format_date, parse_date, today_in, today_utc};
pub use error::{Result, SchedulerError};
pub use mastery::{MasteryStatus, mastery_status};
pub use preview::{IntervalPreview, format_interval};
pub use progress::ItemProgress;
pub use quality::{CoarseAnswer, Quality, QualityLabel};
pub use scheduler::{FirstReviewPolicy, MemoryState, ReviewOutcome, Scheduler};
pub use session::{DEFAULT_DAILY_NEW_LIMIT, SessionSettings, Streak};

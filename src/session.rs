//! Study-session bookkeeping that sits above the scheduler: the daily streak
//! and the cap on new items. Neither feeds back into review intervals.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_NEW_LIMIT: u32 = 20;

/// Consecutive calendar days with at least one study action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current: u32,
    pub last_study_date: Option<NaiveDate>,
}

impl Streak {
    /// Records study on `today` and returns the updated streak length.
    pub fn record_study(&mut self, today: NaiveDate) -> u32 {
        match self.last_study_date {
            Some(last) if last == today => {}
            Some(last) if last.succ_opt() == Some(today) => {
                self.current = self.current.saturating_add(1);
            }
            _ => {
                if self.current > 0 {
                    debug!("streak of {} broken on {today}", self.current);
                }
                self.current = 1;
            }
        }
        self.last_study_date = Some(today);
        self.current
    }

    /// Whether the streak can still be extended, i.e. the last study day is
    /// today or yesterday.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.last_study_date
            .is_some_and(|last| last == today || last.succ_opt() == Some(today))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSettings {
    pub daily_new_limit: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            daily_new_limit: DEFAULT_DAILY_NEW_LIMIT,
        }
    }
}

impl SessionSettings {
    pub fn new_items_remaining(&self, introduced_today: u32) -> u32 {
        self.daily_new_limit.saturating_sub(introduced_today)
    }
}

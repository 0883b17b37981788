//! Calendar-day helpers. Review dates carry no time of day and are exchanged
//! with storage as `YYYY-MM-DD` strings, which compare correctly as text.

use chrono::{Days, NaiveDate, TimeZone, Utc};
use snafu::ResultExt;

use crate::error::{InvalidDateSnafu, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).context(InvalidDateSnafu { input })
}

/// Today's date on the UTC calendar.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Today's date on the calendar of `tz`. Use the same zone the storage layer
/// uses for its "due on or before today" comparison.
pub fn today_in<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// `date + days`, saturating at the last representable date.
pub(crate) fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(days.into()))
        .unwrap_or(NaiveDate::MAX)
}

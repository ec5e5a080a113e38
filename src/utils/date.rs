use chrono::{Days, Local, NaiveDate};

use crate::error::{Result, TrackerError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current local calendar date. Only the binary should call this; engine
/// functions take `today` as an argument.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_string() -> String {
    format_date(today())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(s.to_string()))
}

/// Shift a date by `days` (negative goes back in time). `None` past the
/// representable calendar range.
pub fn checked_offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Like [`checked_offset_days`], saturating at the calendar bounds.
pub fn offset_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_offset_days(date, days).unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Whole days from `start` to `end`; negative when `end` precedes `start`.
pub fn days_between(end: NaiveDate, start: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// The `n` calendar days ending at `today`, oldest first. Stops early at
/// the start of the representable calendar.
pub fn last_n_days(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = (0..n as i64)
        .map_while(|back| checked_offset_days(today, -back))
        .collect();
    days.reverse();
    days
}

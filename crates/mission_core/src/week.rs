use chrono::{Datelike, Days, NaiveDate};

/// Monday of the ISO week containing `date`. Sundays belong to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

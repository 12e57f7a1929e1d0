use std::iter::successors;
use time::{Date, Duration, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Column headers for a Monday-first week
pub(crate) const WEEKDAY_LABELS: [&str; DAYS_IN_WEEK] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub(crate) trait WeekdayExt {
    /// Column of the weekday in a Monday-first week: Monday is 0, Sunday is 6
    fn index_from_monday(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index_from_monday(&self) -> u8 {
        self.number_days_from_monday()
    }
}

/// Returns the Monday of the week containing `date`, or `None` if that Monday
/// is before the start of time.
///
/// Both the month and week grids are aligned with this, so the two views can
/// never disagree about where a week begins.
pub(crate) fn week_start(date: Date) -> Option<Date> {
    date.checked_sub(Duration::days(i64::from(
        date.weekday().index_from_monday(),
    )))
}

/// Returns the first day of the month containing `date`
pub(crate) fn first_of_month(date: Date) -> Date {
    Date::from_calendar_date(date.year(), date.month(), 1)
        .expect("the first day of a month should always be a valid date")
}

pub(crate) fn is_same_date(d1: Date, d2: Date) -> bool {
    d1.year() == d2.year() && d1.month() == d2.month() && d1.day() == d2.day()
}

/// Iterates over `date` and every following day until the end of time
pub(crate) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    iter_days_from(date).skip(1)
}

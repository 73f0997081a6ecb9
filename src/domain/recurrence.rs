//! Month-grained recurrence matching.
//!
//! A rule is matched against calendar months, never individual days: any date
//! inside the target month gives the same answer.

use chrono::{Datelike, Days, NaiveDate};

use super::transaction::{Frequency, TransactionRule};

/// Months since year 0, so that consecutive calendar months differ by one.
fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// Truncate a date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.day0() as u64)
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()
}

/// Whole calendar months from `from` to `to`, clamped at zero.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    (month_ordinal(to) - month_ordinal(from)).max(0) as u32
}

/// Whether `rule` contributes its amount in the month containing `month`.
///
/// Disabled rules are not filtered here; the simulator drops them up front.
pub fn is_active_in_month(rule: &TransactionRule, month: NaiveDate) -> bool {
    let target = month_ordinal(month);
    if target < month_ordinal(rule.start_date) {
        return false;
    }
    if let Some(end) = rule.end_date {
        if target > month_ordinal(end) {
            return false;
        }
    }

    match rule.frequency {
        Frequency::Once => months_between(rule.start_date, month) == 0,
        Frequency::Monthly => true,
        Frequency::Yearly => months_between(rule.start_date, month) % 12 == 0,
    }
}

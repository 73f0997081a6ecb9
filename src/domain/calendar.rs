//! Day-level view of when rules fall due within a month.
//!
//! Unlike the simulator, which only looks at calendar months, the calendar
//! matches on the exact day of `start_date`.

use chrono::{Datelike, NaiveDate};

use super::point::DataPoint;
use super::recurrence::first_of_month;
use super::transaction::{Frequency, TransactionRule};

/// Whether `rule` falls due on `date`. A monthly rule starting on the 31st
/// skips months without a 31st.
pub fn is_due_on(rule: &TransactionRule, date: NaiveDate) -> bool {
    if date < rule.start_date {
        return false;
    }
    if let Some(end) = rule.end_date {
        if date > end {
            return false;
        }
    }

    match rule.frequency {
        Frequency::Once => date == rule.start_date,
        Frequency::Monthly => date.day() == rule.start_date.day(),
        Frequency::Yearly => {
            date.day() == rule.start_date.day() && date.month() == rule.start_date.month()
        }
    }
}

pub fn transactions_due_on(rules: &[TransactionRule], date: NaiveDate) -> Vec<&TransactionRule> {
    rules.iter().filter(|r| is_due_on(r, date)).collect()
}

#[derive(Debug, Clone)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub due: Vec<&'a TransactionRule>,
}

#[derive(Debug, Clone)]
pub struct CalendarMonth<'a> {
    pub month: NaiveDate,
    pub days: Vec<CalendarDay<'a>>,
    /// The simulated point for this month, when it falls inside the projection.
    pub summary: Option<&'a DataPoint>,
}

impl<'a> CalendarMonth<'a> {
    pub fn build(
        rules: &'a [TransactionRule],
        month: NaiveDate,
        monthly_series: &'a [DataPoint],
    ) -> Self {
        let month = first_of_month(month);
        let days = month
            .iter_days()
            .take_while(|d| d.month() == month.month())
            .map(|date| CalendarDay {
                date,
                due: transactions_due_on(rules, date),
            })
            .collect();
        let summary = monthly_series
            .iter()
            .find(|p| first_of_month(p.date) == month);

        CalendarMonth {
            month,
            days,
            summary,
        }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Days with at least one rule due.
    pub fn busy_days(&self) -> impl Iterator<Item = &CalendarDay<'a>> {
        self.days.iter().filter(|d| !d.due.is_empty())
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days.last().map(|d| d.date).unwrap_or(self.month)
    }
}

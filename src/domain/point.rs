//! Per-period output record shared by the simulator, aggregator and display transform.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One month or one year of the projection.
///
/// `cash`, `invested` and `total` are end-of-period snapshots rounded to whole
/// currency units. `total_expense` is stored negative. `flows` holds the signed
/// amount per transaction id (income positive, expense negative), including the
/// synthetic investment-return id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPoint {
    pub date: NaiveDate,
    pub label: String,
    pub cash: f64,
    pub invested: f64,
    pub total: f64,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_cash_flow: f64,
    pub investment_return: f64,
    pub income_breakdown: BTreeMap<String, f64>,
    pub expense_breakdown: BTreeMap<String, f64>,
    pub flows: BTreeMap<String, f64>,
}

impl DataPoint {
    /// A point with zeroed flows and empty breakdowns.
    pub fn empty(date: NaiveDate, label: impl Into<String>) -> Self {
        DataPoint {
            date,
            label: label.into(),
            cash: 0.0,
            invested: 0.0,
            total: 0.0,
            total_income: 0.0,
            total_expense: 0.0,
            net_cash_flow: 0.0,
            investment_return: 0.0,
            income_breakdown: BTreeMap::new(),
            expense_breakdown: BTreeMap::new(),
            flows: BTreeMap::new(),
        }
    }
}

/// `"Jan 2025"` style label for a month.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Round to the nearest integer with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let nearest = value.round();
    if (nearest - value).abs() == 0.5 {
        value.ceil()
    } else {
        nearest
    }
}

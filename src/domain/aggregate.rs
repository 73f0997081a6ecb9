//! Collapses the monthly series into reporting periods.

use chrono::Datelike;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::point::DataPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimePeriod {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePeriod::Monthly => write!(f, "monthly"),
            TimePeriod::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(TimePeriod::Monthly),
            "yearly" => Ok(TimePeriod::Yearly),
            other => Err(format!("unknown period '{other}' (expected monthly or yearly)")),
        }
    }
}

/// Monthly is the identity. Yearly groups by calendar year: balances take the
/// last month of the year, flows and breakdowns are summed.
pub fn aggregate(series: &[DataPoint], period: TimePeriod) -> Vec<DataPoint> {
    match period {
        TimePeriod::Monthly => series.to_vec(),
        TimePeriod::Yearly => aggregate_yearly(series),
    }
}

fn aggregate_yearly(series: &[DataPoint]) -> Vec<DataPoint> {
    let mut years: BTreeMap<i32, DataPoint> = BTreeMap::new();

    for point in series {
        let year = point.date.year();
        let bucket = years
            .entry(year)
            .or_insert_with(|| DataPoint::empty(point.date, year.to_string()));

        bucket.cash = point.cash;
        bucket.invested = point.invested;
        bucket.total = point.total;
        bucket.total_income += point.total_income;
        bucket.total_expense += point.total_expense;
        bucket.net_cash_flow += point.net_cash_flow;
        bucket.investment_return += point.investment_return;

        add_into(&mut bucket.income_breakdown, &point.income_breakdown);
        add_into(&mut bucket.expense_breakdown, &point.expense_breakdown);
        add_into(&mut bucket.flows, &point.flows);
    }

    tracing::debug!(months = series.len(), years = years.len(), "aggregated yearly");
    years.into_values().collect()
}

fn add_into(target: &mut BTreeMap<String, f64>, source: &BTreeMap<String, f64>) {
    for (id, amount) in source {
        *target.entry(id.clone()).or_insert(0.0) += amount;
    }
}

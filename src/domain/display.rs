//! Relative (per-period) and absolute (running cumulative) views of a series.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::point::DataPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DisplayMode {
    #[default]
    Relative,
    Absolute,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Relative => write!(f, "relative"),
            DisplayMode::Absolute => write!(f, "absolute"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relative" => Ok(DisplayMode::Relative),
            "absolute" => Ok(DisplayMode::Absolute),
            other => Err(format!("unknown mode '{other}' (expected relative or absolute)")),
        }
    }
}

pub fn transform(series: &[DataPoint], mode: DisplayMode) -> Vec<DataPoint> {
    match mode {
        DisplayMode::Relative => series.to_vec(),
        DisplayMode::Absolute => cumulative(series),
    }
}

/// Running sums of the flow fields. Wealth fields (`cash`, `invested`,
/// `total`) are already cumulative and pass through untouched.
///
/// Each transaction id has one signed running total shared by the income and
/// expense views, so an id seen in both roles nets the two against each other.
fn cumulative(series: &[DataPoint]) -> Vec<DataPoint> {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut net_cash_flow = 0.0;
    let mut investment_return = 0.0;
    let mut running: HashMap<String, f64> = HashMap::new();

    series
        .iter()
        .map(|point| {
            total_income += point.total_income;
            total_expense += point.total_expense;
            net_cash_flow += point.net_cash_flow;
            investment_return += point.investment_return;

            let mut income_breakdown = BTreeMap::new();
            let mut expense_breakdown = BTreeMap::new();
            let mut flows = point.flows.clone();

            for (id, amount) in &point.income_breakdown {
                let sum = running.entry(id.clone()).or_insert(0.0);
                *sum += amount;
                income_breakdown.insert(id.clone(), *sum);
                flows.insert(id.clone(), *sum);
            }
            for (id, amount) in &point.expense_breakdown {
                let sum = running.entry(id.clone()).or_insert(0.0);
                *sum -= amount;
                expense_breakdown.insert(id.clone(), sum.abs());
                flows.insert(id.clone(), *sum);
            }

            DataPoint {
                total_income,
                total_expense,
                net_cash_flow,
                investment_return,
                income_breakdown,
                expense_breakdown,
                flows,
                ..point.clone()
            }
        })
        .collect()
}

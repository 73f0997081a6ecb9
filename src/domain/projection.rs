//! End-to-end projection: validate, simulate, aggregate, transform.

use chrono::NaiveDate;

use super::aggregate::{aggregate, TimePeriod};
use super::display::{transform, DisplayMode};
use super::error::FincastError;
use super::point::DataPoint;
use super::settings::ProjectionSettings;
use super::simulation::simulate;
use super::transaction::{validate_transactions, TransactionRule};

/// Both series a caller renders: the display series for the chosen period and
/// mode, and the raw monthly series it was derived from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub period: TimePeriod,
    pub mode: DisplayMode,
    pub series: Vec<DataPoint>,
    pub monthly: Vec<DataPoint>,
}

pub fn project(
    rules: &[TransactionRule],
    settings: &ProjectionSettings,
    start: NaiveDate,
    period: TimePeriod,
    mode: DisplayMode,
) -> Result<Projection, FincastError> {
    settings.ensure_finite()?;
    settings.ensure_horizon(start)?;
    validate_transactions(rules)?;

    let monthly = simulate(rules, settings, start);
    let series = transform(&aggregate(&monthly, period), mode);

    if let Some(last) = monthly.last() {
        if last.total < 0.0 {
            tracing::warn!(total = last.total, label = %last.label, "projection ends with negative wealth");
        }
    }
    tracing::info!(
        months = monthly.len(),
        points = series.len(),
        %period,
        %mode,
        "projection complete"
    );

    Ok(Projection {
        period,
        mode,
        series,
        monthly,
    })
}

/// Headline figures over the whole horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub months: usize,
    pub final_cash: f64,
    pub final_invested: f64,
    pub final_total: f64,
    pub total_income: f64,
    pub total_expense: f64,
    pub total_investment_return: f64,
}

impl Summary {
    pub fn compute(monthly: &[DataPoint]) -> Self {
        let last = monthly.last();
        Summary {
            months: monthly.len(),
            final_cash: last.map(|p| p.cash).unwrap_or(0.0),
            final_invested: last.map(|p| p.invested).unwrap_or(0.0),
            final_total: last.map(|p| p.total).unwrap_or(0.0),
            total_income: monthly.iter().map(|p| p.total_income).sum(),
            total_expense: monthly.iter().map(|p| p.total_expense).sum(),
            total_investment_return: monthly.iter().map(|p| p.investment_return).sum(),
        }
    }
}

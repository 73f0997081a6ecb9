//! Monthly cash-flow and investment simulation.
//!
//! Running balances are carried at full precision; only the emitted points are
//! rounded.

use chrono::{Months, NaiveDate};

use super::point::{month_label, round_half_up, DataPoint};
use super::recurrence::{first_of_month, is_active_in_month};
use super::settings::{ProjectionSettings, MAX_PROJECTION_YEARS};
use super::transaction::{TransactionRule, INVESTMENT_RETURN_ID};

/// Unrounded cash and invested balances carried from month to month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balances {
    pub cash: f64,
    pub invested: f64,
}

impl Balances {
    pub fn from_settings(settings: &ProjectionSettings) -> Self {
        let (cash, invested) = settings.split_initial_balance();
        Balances { cash, invested }
    }

    pub fn total(&self) -> f64 {
        self.cash + self.invested
    }

    /// Credits one month of return to the invested balance and returns it.
    pub fn apply_return(&mut self, return_fraction: f64) -> f64 {
        let earned = self.invested * return_fraction;
        self.invested += earned;
        earned
    }

    /// Moves invested money into negative cash, up to the whole invested
    /// balance. Returns the amount withdrawn.
    pub fn cover_deficit(&mut self) -> f64 {
        if self.cash >= 0.0 || self.invested <= 0.0 {
            return 0.0;
        }
        let withdrawn = (-self.cash).min(self.invested);
        self.invested -= withdrawn;
        self.cash += withdrawn;
        withdrawn
    }

    /// Invests the allocated share of a positive net cash flow. Returns the
    /// amount moved from cash.
    pub fn sweep_surplus(&mut self, net_cash_flow: f64, allocation_fraction: f64) -> f64 {
        if net_cash_flow <= 0.0 {
            return 0.0;
        }
        let amount = net_cash_flow * allocation_fraction;
        if amount <= 0.0 {
            return 0.0;
        }
        self.cash -= amount;
        self.invested += amount;
        amount
    }
}

/// Runs the projection for `settings.projection_years * 12` months starting
/// with the month containing `start`. Disabled rules are ignored.
///
/// Stops at the end of the supported calendar; `project` rejects such
/// horizons before simulating.
pub fn simulate(
    rules: &[TransactionRule],
    settings: &ProjectionSettings,
    start: NaiveDate,
) -> Vec<DataPoint> {
    let enabled: Vec<&TransactionRule> = rules.iter().filter(|r| r.enabled).collect();
    let first_month = first_of_month(start);
    let month_count = settings.month_count();

    tracing::debug!(
        months = month_count,
        rules = enabled.len(),
        skipped = rules.len() - enabled.len(),
        start = %first_month,
        "simulating projection"
    );

    let mut balances = Balances::from_settings(settings);
    let mut series = Vec::with_capacity(month_count.min(MAX_PROJECTION_YEARS as usize * 12));

    for i in 0..month_count {
        let Some(month) = first_month.checked_add_months(Months::new(i as u32)) else {
            tracing::warn!(month_index = i, "projection horizon exceeds calendar range");
            break;
        };
        series.push(simulate_month(&enabled, settings, &mut balances, month, i == 0));
    }

    series
}

fn simulate_month(
    rules: &[&TransactionRule],
    settings: &ProjectionSettings,
    balances: &mut Balances,
    month: NaiveDate,
    is_first: bool,
) -> DataPoint {
    let mut point = DataPoint::empty(month, month_label(month));
    let mut transaction_income = 0.0;
    let mut transaction_expense = 0.0;

    for rule in rules.iter().filter(|r| is_active_in_month(r, month)) {
        if rule.is_income() {
            transaction_income += rule.amount;
            point.income_breakdown.insert(rule.id.clone(), rule.amount);
        } else {
            transaction_expense += rule.amount;
            point.expense_breakdown.insert(rule.id.clone(), rule.amount);
        }
        point.flows.insert(rule.id.clone(), rule.signed_amount());
    }

    // The first month is "now" and earns nothing.
    let investment_return = if is_first {
        0.0
    } else {
        balances.apply_return(settings.return_fraction())
    };

    let net_cash_flow = transaction_income - transaction_expense;
    balances.cash += net_cash_flow;

    let withdrawn = balances.cover_deficit();
    if withdrawn > 0.0 {
        tracing::trace!(month = %month, withdrawn, "covered cash deficit from investments");
    }
    balances.sweep_surplus(net_cash_flow, settings.allocation_fraction());

    if investment_return > 0.0 {
        point
            .income_breakdown
            .insert(INVESTMENT_RETURN_ID.to_string(), investment_return);
        point
            .flows
            .insert(INVESTMENT_RETURN_ID.to_string(), investment_return);
    }

    point.total_income = transaction_income + investment_return.max(0.0);
    point.total_expense = -transaction_expense;
    point.net_cash_flow = point.total_income - transaction_expense;
    point.investment_return = round_half_up(investment_return);
    point.cash = round_half_up(balances.cash);
    point.invested = round_half_up(balances.invested);
    point.total = round_half_up(balances.total());
    point
}

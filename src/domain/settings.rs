//! Scalar simulation parameters.

use chrono::{Months, NaiveDate};

use super::error::FincastError;
use super::recurrence::first_of_month;

/// Longest horizon a projection may cover.
pub const MAX_PROJECTION_YEARS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionSettings {
    /// Total starting wealth; may be negative.
    pub initial_balance: f64,
    pub projection_years: u32,
    /// Percent per month, e.g. 0.5 means 0.5%.
    pub monthly_return_rate: f64,
    /// Percent (0-100) of the initial balance and of monthly surplus that is invested.
    pub investment_allocation: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        ProjectionSettings {
            initial_balance: 10_000.0,
            projection_years: 10,
            monthly_return_rate: 0.5,
            investment_allocation: 75.0,
        }
    }
}

impl ProjectionSettings {
    pub fn month_count(&self) -> usize {
        self.projection_years as usize * 12
    }

    pub fn allocation_fraction(&self) -> f64 {
        self.investment_allocation / 100.0
    }

    pub fn return_fraction(&self) -> f64 {
        self.monthly_return_rate / 100.0
    }

    /// Splits the initial balance into `(cash, invested)`.
    pub fn split_initial_balance(&self) -> (f64, f64) {
        let invested = self.initial_balance * self.allocation_fraction();
        (self.initial_balance - invested, invested)
    }

    /// Rejects NaN and infinite values; everything finite is accepted.
    pub fn ensure_finite(&self) -> Result<(), FincastError> {
        let fields = [
            ("initial_balance", self.initial_balance),
            ("monthly_return_rate", self.monthly_return_rate),
            ("investment_allocation", self.investment_allocation),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(FincastError::NonFinite {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Rejects horizons longer than [`MAX_PROJECTION_YEARS`] or whose last
    /// month, counted from `start`, falls outside the supported calendar.
    pub fn ensure_horizon(&self, start: NaiveDate) -> Result<(), FincastError> {
        let years = self.projection_years;
        if years > MAX_PROJECTION_YEARS {
            return Err(FincastError::HorizonOutOfRange {
                years,
                reason: format!("at most {MAX_PROJECTION_YEARS} years are supported"),
            });
        }
        let last_offset = (years * 12).saturating_sub(1);
        if first_of_month(start)
            .checked_add_months(Months::new(last_offset))
            .is_none()
        {
            return Err(FincastError::HorizonOutOfRange {
                years,
                reason: format!("last month starting from {start} is past the calendar range"),
            });
        }
        Ok(())
    }
}

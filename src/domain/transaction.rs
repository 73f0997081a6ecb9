//! Recurring income/expense rules.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::FincastError;

/// Synthetic breakdown id under which monthly investment returns are reported.
pub const INVESTMENT_RETURN_ID: &str = "investmentReturn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Frequency {
    Once,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Once => write!(f, "once"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(Frequency::Once),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!("unknown frequency '{other}'")),
        }
    }
}

/// A recurring or one-time cash-flow definition.
///
/// `amount` is always a positive magnitude; the sign comes from `kind`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionRule {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub color: Option<String>,
    pub enabled: bool,
}

impl TransactionRule {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        kind: TransactionType,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        TransactionRule {
            id: id.into(),
            description: String::new(),
            amount,
            kind,
            frequency,
            start_date,
            end_date: None,
            color: None,
            enabled: true,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Positive for income, negative for expense.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Checks a rule snapshot before it is handed to the simulator.
pub fn validate_transactions(rules: &[TransactionRule]) -> Result<(), FincastError> {
    let mut seen = HashSet::new();

    for rule in rules {
        let invalid = |reason: &str| FincastError::TransactionInvalid {
            id: rule.id.clone(),
            reason: reason.to_string(),
        };

        if rule.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if rule.id == INVESTMENT_RETURN_ID {
            return Err(invalid("id is reserved for investment returns"));
        }
        if !seen.insert(rule.id.as_str()) {
            return Err(invalid("duplicate id"));
        }
        if !rule.amount.is_finite() || rule.amount <= 0.0 {
            return Err(invalid("amount must be a positive number"));
        }
        if let Some(end) = rule.end_date {
            if end < rule.start_date {
                return Err(invalid("end_date is before start_date"));
            }
        }
    }

    Ok(())
}

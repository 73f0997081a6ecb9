#![allow(dead_code)]

use chrono::NaiveDate;
use fincast::domain::error::FincastError;
use fincast::domain::projection::Projection;
use fincast::domain::settings::ProjectionSettings;
pub use fincast::domain::transaction::{Frequency, TransactionRule, TransactionType};
use fincast::ports::report_port::ReportPort;
use fincast::ports::transaction_port::TransactionPort;
use std::cell::RefCell;

pub struct MockTransactionPort {
    pub rules: Vec<TransactionRule>,
    pub error: Option<String>,
}

impl MockTransactionPort {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            error: None,
        }
    }

    pub fn with_rule(mut self, rule: TransactionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TransactionPort for MockTransactionPort {
    fn load_transactions(&self) -> Result<Vec<TransactionRule>, FincastError> {
        if let Some(reason) = &self.error {
            return Err(FincastError::TransactionParse {
                line: 1,
                reason: reason.clone(),
            });
        }
        Ok(self.rules.clone())
    }
}

/// Records every projection handed to it instead of writing a file.
pub struct RecordingReportPort {
    pub calls: RefCell<Vec<(Projection, String)>>,
    pub fail: bool,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        projection: &Projection,
        _settings: &ProjectionSettings,
        output_path: &str,
    ) -> Result<(), FincastError> {
        if self.fail {
            return Err(FincastError::Report {
                reason: "disk full".into(),
            });
        }
        self.calls
            .borrow_mut()
            .push((projection.clone(), output_path.to_string()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn settings(initial: f64, years: u32, rate: f64, allocation: f64) -> ProjectionSettings {
    ProjectionSettings {
        initial_balance: initial,
        projection_years: years,
        monthly_return_rate: rate,
        investment_allocation: allocation,
    }
}

pub fn income(id: &str, amount: f64, frequency: Frequency, start: NaiveDate) -> TransactionRule {
    TransactionRule::new(id, amount, TransactionType::Income, frequency, start)
}

pub fn expense(id: &str, amount: f64, frequency: Frequency, start: NaiveDate) -> TransactionRule {
    TransactionRule::new(id, amount, TransactionType::Expense, frequency, start)
}

pub const CSV_HEADER: &str =
    "id,description,amount,type,frequency,start_date,end_date,color,enabled\n";

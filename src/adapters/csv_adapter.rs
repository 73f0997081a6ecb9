//! CSV file transaction adapter.
//!
//! Expected columns, in order:
//! `id,description,amount,type,frequency,start_date,end_date,color,enabled`.
//! `end_date` and `color` may be empty; an empty `enabled` means enabled.

use crate::domain::error::FincastError;
use crate::domain::transaction::{Frequency, TransactionRule, TransactionType};
use crate::ports::transaction_port::TransactionPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(content: &str) -> Result<Vec<TransactionRule>, FincastError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut rules = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let line = index + 1;
            let err = |reason: String| FincastError::TransactionParse { line, reason };

            let record = result.map_err(|e| err(format!("CSV parse error: {}", e)))?;
            let field = |i: usize, name: &str| column(&record, i, name, line);

            let id = field(0, "id")?.to_string();
            let description = field(1, "description")?.to_string();
            let amount: f64 = field(2, "amount")?
                .parse()
                .map_err(|e| err(format!("invalid amount: {}", e)))?;
            let kind: TransactionType = field(3, "type")?.parse().map_err(err)?;
            let frequency: Frequency = field(4, "frequency")?.parse().map_err(err)?;
            let start_date = parse_date(field(5, "start_date")?)
                .map_err(|e| err(format!("invalid start_date: {}", e)))?;
            let end_date = match record.get(6).filter(|s| !s.is_empty()) {
                Some(s) => {
                    Some(parse_date(s).map_err(|e| err(format!("invalid end_date: {}", e)))?)
                }
                None => None,
            };
            let color = record
                .get(7)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let enabled = match record.get(8).filter(|s| !s.is_empty()) {
                Some(s) => parse_enabled(s)
                    .ok_or_else(|| err(format!("invalid enabled value '{}'", s)))?,
                None => true,
            };

            rules.push(TransactionRule {
                id,
                description,
                amount,
                kind,
                frequency,
                start_date,
                end_date,
                color,
                enabled,
            });
        }

        Ok(rules)
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, FincastError> {
    record
        .get(index)
        .ok_or_else(|| FincastError::TransactionParse {
            line,
            reason: format!("missing {} column", name),
        })
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

fn parse_enabled(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl TransactionPort for CsvAdapter {
    fn load_transactions(&self) -> Result<Vec<TransactionRule>, FincastError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FincastError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            ))
        })?;
        let rules = Self::parse(&content)?;
        tracing::debug!(path = %self.path.display(), rules = rules.len(), "loaded transactions");
        Ok(rules)
    }
}

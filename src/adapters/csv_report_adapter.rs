//! CSV report adapter implementing ReportPort.
//!
//! One row per display point. Fixed columns come first, then one `flow_<id>`
//! column per transaction id seen anywhere in the series, left blank where
//! absent.

use std::collections::BTreeSet;
use std::io::Write;

use crate::domain::error::FincastError;
use crate::domain::point::DataPoint;
use crate::domain::projection::Projection;
use crate::domain::settings::ProjectionSettings;
use crate::ports::report_port::ReportPort;

const FIXED_COLUMNS: [&str; 9] = [
    "date",
    "label",
    "cash",
    "invested",
    "total",
    "total_income",
    "total_expense",
    "net_cash_flow",
    "investment_return",
];

const FLOW_PREFIX: &str = "flow_";

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    /// Writes `series` as CSV to any writer.
    pub fn write_series<W: Write>(series: &[DataPoint], writer: W) -> Result<(), FincastError> {
        let flow_ids: BTreeSet<&str> = series
            .iter()
            .flat_map(|p| p.flows.keys().map(String::as_str))
            .collect();

        let mut wtr = csv::Writer::from_writer(writer);
        let header = FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(flow_ids.iter().map(|id| format!("{FLOW_PREFIX}{id}")));
        wtr.write_record(header).map_err(report_error)?;

        for point in series {
            let mut row = vec![
                point.date.format("%Y-%m-%d").to_string(),
                point.label.clone(),
                format_amount(point.cash),
                format_amount(point.invested),
                format_amount(point.total),
                format_amount(point.total_income),
                format_amount(point.total_expense),
                format_amount(point.net_cash_flow),
                format_amount(point.investment_return),
            ];
            row.extend(
                flow_ids
                    .iter()
                    .map(|id| point.flows.get(*id).map(|v| format_amount(*v)).unwrap_or_default()),
            );
            wtr.write_record(&row).map_err(report_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn report_error(e: csv::Error) -> FincastError {
    FincastError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

/// Two decimals, without a trailing `.00` for whole amounts.
fn format_amount(value: f64) -> String {
    let s = format!("{:.2}", value);
    match s.strip_suffix(".00") {
        Some(whole) if whole == "-0" => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => s,
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        projection: &Projection,
        settings: &ProjectionSettings,
        output_path: &str,
    ) -> Result<(), FincastError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_series(&projection.series, file)?;
        tracing::info!(
            path = output_path,
            rows = projection.series.len(),
            years = settings.projection_years,
            period = %projection.period,
            mode = %projection.mode,
            "report written"
        );
        Ok(())
    }
}

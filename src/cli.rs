//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregate::TimePeriod;
use crate::domain::calendar::CalendarMonth;
use crate::domain::config_validation::validate_projection_config;
use crate::domain::display::DisplayMode;
use crate::domain::error::FincastError;
use crate::domain::projection::{project, Summary};
use crate::domain::recurrence::{first_of_month, parse_month};
use crate::domain::settings::ProjectionSettings;
use crate::domain::transaction::{validate_transactions, TransactionRule};
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::transaction_port::TransactionPort;

const DEFAULT_OUTPUT: &str = "projection.csv";

#[derive(Parser, Debug)]
#[command(name = "fincast", about = "Recurring cash-flow and wealth projection")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a projection and write the report
    Project {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        transactions: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// monthly or yearly
        #[arg(long)]
        period: Option<String>,
        /// relative or absolute
        #[arg(long)]
        mode: Option<String>,
        /// First projected month, YYYY-MM
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration and its transactions
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        transactions: Option<PathBuf>,
    },
    /// Show which transactions fall due on each day of a month
    Calendar {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        transactions: Option<PathBuf>,
        /// Month to show, YYYY-MM
        #[arg(long)]
        month: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&cli.log_level);

    match cli.command {
        Command::Project {
            config,
            transactions,
            output,
            period,
            mode,
            start,
            dry_run,
        } => {
            let overrides = Overrides {
                transactions,
                output,
                period,
                mode,
                start,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_project(&config, &overrides)
            }
        }
        Command::Validate {
            config,
            transactions,
        } => run_validate(&config, transactions.as_ref()),
        Command::Calendar {
            config,
            transactions,
            month,
        } => run_calendar(&config, transactions.as_ref(), &month),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub transactions: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub period: Option<String>,
    pub mode: Option<String>,
    pub start: Option<String>,
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FincastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<ProjectionSettings, FincastError> {
    let defaults = ProjectionSettings::default();
    let years = config.get_int(
        "projection",
        "projection_years",
        defaults.projection_years as i64,
    );
    let projection_years =
        u32::try_from(years).map_err(|_| FincastError::ConfigInvalid {
            section: "projection".into(),
            key: "projection_years".into(),
            reason: "projection_years must be a non-negative whole number".into(),
        })?;

    let settings = ProjectionSettings {
        initial_balance: config.get_double(
            "projection",
            "initial_balance",
            defaults.initial_balance,
        ),
        projection_years,
        monthly_return_rate: config.get_double(
            "projection",
            "monthly_return_rate",
            defaults.monthly_return_rate,
        ),
        investment_allocation: config.get_double(
            "projection",
            "investment_allocation",
            defaults.investment_allocation,
        ),
    };
    settings.ensure_finite()?;
    Ok(settings)
}

pub fn resolve_start(
    start_override: Option<&str>,
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<NaiveDate, FincastError> {
    let (value, source) = match start_override {
        Some(s) => (Some(s.to_string()), "--start"),
        None => (config.get_string("projection", "start_month"), "start_month"),
    };
    match value {
        Some(s) => parse_month(&s).ok_or_else(|| FincastError::ConfigInvalid {
            section: "projection".into(),
            key: source.into(),
            reason: format!("invalid month '{s}', expected YYYY-MM"),
        }),
        None => Ok(first_of_month(today)),
    }
}

pub fn resolve_period(
    period_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<TimePeriod, FincastError> {
    match period_override
        .map(str::to_string)
        .or_else(|| config.get_string("report", "period"))
    {
        Some(s) => s.parse().map_err(|reason| FincastError::ConfigInvalid {
            section: "report".into(),
            key: "period".into(),
            reason,
        }),
        None => Ok(TimePeriod::default()),
    }
}

pub fn resolve_mode(
    mode_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<DisplayMode, FincastError> {
    match mode_override
        .map(str::to_string)
        .or_else(|| config.get_string("report", "mode"))
    {
        Some(s) => s.parse().map_err(|reason| FincastError::ConfigInvalid {
            section: "report".into(),
            key: "mode".into(),
            reason,
        }),
        None => Ok(DisplayMode::default()),
    }
}

/// The transactions file from the command line, or `[data] transactions`
/// resolved relative to the config file.
pub fn resolve_transactions_path(
    path_override: Option<&PathBuf>,
    config: &dyn ConfigPort,
    config_path: &Path,
) -> Result<PathBuf, FincastError> {
    if let Some(p) = path_override {
        return Ok(p.clone());
    }
    let configured = config
        .get_string("data", "transactions")
        .ok_or_else(|| FincastError::ConfigMissing {
            section: "data".into(),
            key: "transactions".into(),
        })?;
    let path = PathBuf::from(configured.trim());
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(config_path
        .parent()
        .map(|dir| dir.join(&path))
        .unwrap_or(path))
}

pub fn resolve_output(output_override: Option<&PathBuf>, config: &dyn ConfigPort) -> PathBuf {
    output_override
        .cloned()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Everything a projection run needs, resolved from config and overrides.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub name: String,
    pub settings: ProjectionSettings,
    pub start: NaiveDate,
    pub period: TimePeriod,
    pub mode: DisplayMode,
    pub transactions_path: PathBuf,
    pub output: PathBuf,
}

pub fn build_run_plan(
    config: &dyn ConfigPort,
    config_path: &Path,
    overrides: &Overrides,
    today: NaiveDate,
) -> Result<RunPlan, FincastError> {
    validate_projection_config(config)?;
    let settings = build_settings(config)?;
    let start = resolve_start(overrides.start.as_deref(), config, today)?;
    settings.ensure_horizon(start)?;
    Ok(RunPlan {
        name: config
            .get_string("projection", "name")
            .unwrap_or_else(|| "Unnamed".to_string()),
        settings,
        start,
        period: resolve_period(overrides.period.as_deref(), config)?,
        mode: resolve_mode(overrides.mode.as_deref(), config)?,
        transactions_path: resolve_transactions_path(
            overrides.transactions.as_ref(),
            config,
            config_path,
        )?,
        output: resolve_output(overrides.output.as_ref(), config),
    })
}

fn load_plan(config_path: &Path, overrides: &Overrides) -> Result<RunPlan, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    build_run_plan(&adapter, config_path, overrides, today()).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_project(config_path: &Path, overrides: &Overrides) -> ExitCode {
    // Stage 1: Load config and resolve the run plan
    let plan = match load_plan(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };
    eprintln!("Projection: {}", plan.name);

    // Stages 2-5: Load transactions, project, summarise, write report
    let transaction_port = CsvAdapter::new(plan.transactions_path.clone());
    run_projection_pipeline(&transaction_port, &CsvReportAdapter, &plan)
}

pub fn run_projection_pipeline(
    transaction_port: &dyn TransactionPort,
    report_port: &dyn ReportPort,
    plan: &RunPlan,
) -> ExitCode {
    // Stage 2: Load transactions
    let rules = match transaction_port.load_transactions() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let disabled = rules.iter().filter(|r| !r.enabled).count();
    if disabled > 0 {
        tracing::warn!(disabled, "disabled transactions are excluded from the projection");
    }

    // Stage 3: Run projection
    eprintln!(
        "Projecting {} years from {} ({} transactions, {} disabled)",
        plan.settings.projection_years,
        plan.start.format("%Y-%m"),
        rules.len(),
        disabled,
    );
    let projection = match project(&rules, &plan.settings, plan.start, plan.period, plan.mode) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Print console summary to stderr
    print_summary(&Summary::compute(&projection.monthly));

    // Stage 5: Write report
    let output = plan.output.display().to_string();
    match report_port.write(&projection, &plan.settings, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn print_summary(summary: &Summary) {
    eprintln!("\n=== Projection Summary ===");
    eprintln!("Months:           {}", summary.months);
    eprintln!("Final Cash:       {:.0}", summary.final_cash);
    eprintln!("Final Invested:   {:.0}", summary.final_invested);
    eprintln!("Final Total:      {:.0}", summary.final_total);
    eprintln!("Total Income:     {:.2}", summary.total_income);
    eprintln!("Total Expense:    {:.2}", summary.total_expense);
    eprintln!("Investment Gains: {:.0}", summary.total_investment_return);
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let plan = match load_plan(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");

    let rules = match load_and_validate(&plan.transactions_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    eprintln!("\nProjection: {}", plan.name);
    eprintln!("  initial_balance:       {}", plan.settings.initial_balance);
    eprintln!("  projection_years:      {}", plan.settings.projection_years);
    eprintln!("  monthly_return_rate:   {}%", plan.settings.monthly_return_rate);
    eprintln!("  investment_allocation: {}%", plan.settings.investment_allocation);
    eprintln!("  start:                 {}", plan.start.format("%Y-%m"));
    eprintln!("  period / mode:         {} / {}", plan.period, plan.mode);
    eprintln!("  transactions:          {} ({})", rules.len(), plan.transactions_path.display());
    eprintln!("  output:                {}", plan.output.display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn load_and_validate(path: &Path) -> Result<Vec<TransactionRule>, ExitCode> {
    let rules = CsvAdapter::new(path.to_path_buf())
        .load_transactions()
        .and_then(|rules| validate_transactions(&rules).map(|()| rules));
    rules.map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_validate(config_path: &Path, transactions: Option<&PathBuf>) -> ExitCode {
    let overrides = Overrides {
        transactions: transactions.cloned(),
        ..Overrides::default()
    };
    let plan = match load_plan(config_path, &overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };

    eprintln!("Validating transactions: {}", plan.transactions_path.display());
    let rules = match load_and_validate(&plan.transactions_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    for rule in &rules {
        let end = rule
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "open".to_string());
        let state = if rule.enabled { "" } else { " (disabled)" };
        eprintln!(
            "  {}: {} {} {} from {} to {}{}",
            rule.id, rule.frequency, rule.kind, rule.amount, rule.start_date, end, state
        );
    }

    eprintln!("\nConfiguration and {} transactions are valid.", rules.len());
    ExitCode::SUCCESS
}

/// One stdout line per due transaction, then the month's simulated totals.
pub fn format_calendar(calendar: &CalendarMonth<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for day in calendar.busy_days() {
        for rule in &day.due {
            lines.push(format!(
                "{}  {:<16} {:>12.2}  {}",
                day.date,
                rule.id,
                rule.signed_amount(),
                rule.description
            ));
        }
    }
    if let Some(point) = calendar.summary {
        lines.push(format!(
            "{}  income {:.2}  expense {:.2}  net {:.2}  return {:.0}",
            point.label,
            point.total_income,
            point.total_expense,
            point.net_cash_flow,
            point.investment_return
        ));
    }
    lines
}

fn run_calendar(config_path: &Path, transactions: Option<&PathBuf>, month: &str) -> ExitCode {
    let Some(month) = parse_month(month) else {
        eprintln!("error: invalid --month '{month}', expected YYYY-MM");
        return ExitCode::from(2);
    };
    let overrides = Overrides {
        transactions: transactions.cloned(),
        ..Overrides::default()
    };
    let plan = match load_plan(config_path, &overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let rules = match load_and_validate(&plan.transactions_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let projection = match project(
        &rules,
        &plan.settings,
        plan.start,
        TimePeriod::Monthly,
        DisplayMode::Relative,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let calendar = CalendarMonth::build(&rules, month, &projection.monthly);
    eprintln!(
        "Calendar {} to {}: {} of {} days with transactions",
        calendar.month,
        calendar.last_day(),
        calendar.busy_days().count(),
        calendar.day_count()
    );
    if calendar.summary.is_none() {
        eprintln!("warning: {} is outside the projection horizon", month.format("%Y-%m"));
    }
    for line in format_calendar(&calendar) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

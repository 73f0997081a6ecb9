//! CLI integration tests for the project, validate, and calendar commands.
//!
//! Tests cover:
//! - Settings parsing with defaults (build_settings)
//! - Start month, period, mode, and path resolution with overrides
//! - Run plan assembly from real INI files on disk
//! - Full pipeline with mock ports
//! - Dry-run and end-to-end runs writing a CSV report
//! - Calendar formatting

mod common;

use approx::assert_relative_eq;
use common::*;
use fincast::adapters::file_config_adapter::FileConfigAdapter;
use fincast::cli::{self, Cli, Command, Overrides};
use fincast::domain::aggregate::TimePeriod;
use fincast::domain::calendar::CalendarMonth;
use fincast::domain::display::DisplayMode;
use fincast::domain::error::FincastError;
use fincast::domain::simulation::simulate;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}

fn is_success(code: std::process::ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", std::process::ExitCode::SUCCESS)
}

const VALID_INI: &str = r#"
[projection]
name = Household plan
initial_balance = 20000
projection_years = 2
monthly_return_rate = 0.4
investment_allocation = 60
start_month = 2025-03

[data]
transactions = rules.csv

[report]
period = yearly
mode = absolute
output = out.csv
"#;

const RULES_CSV: &str = "id,description,amount,type,frequency,start_date,end_date,color,enabled\n\
salary,Salary,4000,income,monthly,2025-01-01,,#22c55e,true\n\
rent,Rent,1500,expense,monthly,2025-01-01,,#ef4444,true\n\
insurance,Car insurance,600,expense,yearly,2024-05-12,,,true\n";

mod settings_parsing {
    use super::*;

    #[test]
    fn build_settings_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let s = cli::build_settings(&adapter).unwrap();

        assert_relative_eq!(s.initial_balance, 20_000.0);
        assert_eq!(s.projection_years, 2);
        assert_relative_eq!(s.monthly_return_rate, 0.4);
        assert_relative_eq!(s.investment_allocation, 60.0);
    }

    #[test]
    fn build_settings_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[projection]\nname = x\n").unwrap();
        let s = cli::build_settings(&adapter).unwrap();

        assert_relative_eq!(s.initial_balance, 10_000.0);
        assert_eq!(s.projection_years, 10);
        assert_relative_eq!(s.monthly_return_rate, 0.5);
        assert_relative_eq!(s.investment_allocation, 75.0);
    }

    #[test]
    fn build_settings_rejects_negative_years() {
        let adapter =
            FileConfigAdapter::from_string("[projection]\nprojection_years = -1\n").unwrap();
        let result = cli::build_settings(&adapter);
        assert!(matches!(result, Err(FincastError::ConfigInvalid { .. })));
    }
}

mod resolution {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn start_from_config_month() {
        let adapter = config(VALID_INI);
        let start = cli::resolve_start(None, &adapter, date(2030, 1, 1)).unwrap();
        assert_eq!(start, date(2025, 3, 1));
    }

    #[test]
    fn start_override_takes_precedence() {
        let adapter = config(VALID_INI);
        let start = cli::resolve_start(Some("2027-11"), &adapter, date(2030, 1, 1)).unwrap();
        assert_eq!(start, date(2027, 11, 1));
    }

    #[test]
    fn start_defaults_to_current_month() {
        let adapter = config("[projection]\n");
        let start = cli::resolve_start(None, &adapter, date(2026, 8, 19)).unwrap();
        assert_eq!(start, date(2026, 8, 1));
    }

    #[test]
    fn start_invalid_override() {
        let adapter = config("[projection]\n");
        assert!(cli::resolve_start(Some("March"), &adapter, date(2026, 8, 19)).is_err());
    }

    #[test]
    fn period_and_mode_from_config_and_overrides() {
        let adapter = config(VALID_INI);
        assert_eq!(cli::resolve_period(None, &adapter).unwrap(), TimePeriod::Yearly);
        assert_eq!(
            cli::resolve_period(Some("monthly"), &adapter).unwrap(),
            TimePeriod::Monthly
        );
        assert_eq!(cli::resolve_mode(None, &adapter).unwrap(), DisplayMode::Absolute);
        assert_eq!(
            cli::resolve_mode(Some("Relative"), &adapter).unwrap(),
            DisplayMode::Relative
        );
        assert!(cli::resolve_mode(Some("cumulative"), &adapter).is_err());
    }

    #[test]
    fn period_and_mode_defaults() {
        let adapter = config("[report]\n");
        assert_eq!(cli::resolve_period(None, &adapter).unwrap(), TimePeriod::Monthly);
        assert_eq!(cli::resolve_mode(None, &adapter).unwrap(), DisplayMode::Relative);
    }

    #[test]
    fn transactions_path_relative_to_config() {
        let adapter = config(VALID_INI);
        let path = cli::resolve_transactions_path(
            None,
            &adapter,
            Path::new("/home/user/plans/fincast.ini"),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/home/user/plans/rules.csv"));
    }

    #[test]
    fn transactions_path_override() {
        let adapter = config(VALID_INI);
        let over = PathBuf::from("other.csv");
        let path =
            cli::resolve_transactions_path(Some(&over), &adapter, Path::new("cfg.ini")).unwrap();
        assert_eq!(path, over);
    }

    #[test]
    fn transactions_path_missing() {
        let adapter = config("[projection]\n");
        let result = cli::resolve_transactions_path(None, &adapter, Path::new("cfg.ini"));
        assert!(matches!(result, Err(FincastError::ConfigMissing { .. })));
    }

    #[test]
    fn output_resolution() {
        let adapter = config(VALID_INI);
        assert_eq!(cli::resolve_output(None, &adapter), PathBuf::from("out.csv"));
        let over = PathBuf::from("x.csv");
        assert_eq!(cli::resolve_output(Some(&over), &adapter), over);
        let empty = config("[report]\n");
        assert_eq!(
            cli::resolve_output(None, &empty),
            PathBuf::from("projection.csv")
        );
    }

    #[test]
    fn run_plan_rejects_out_of_range_allocation() {
        let adapter = config("[projection]\ninvestment_allocation = 140\n[data]\ntransactions = r.csv\n");
        let result = cli::build_run_plan(
            &adapter,
            Path::new("cfg.ini"),
            &Overrides::default(),
            date(2025, 1, 1),
        );
        assert!(matches!(result, Err(FincastError::ConfigInvalid { .. })));
    }

    #[test]
    fn run_plan_rejects_overlong_horizon() {
        let adapter = config(
            "[projection]\nprojection_years = 357913941\n[data]\ntransactions = r.csv\n",
        );
        let result = cli::build_run_plan(
            &adapter,
            Path::new("cfg.ini"),
            &Overrides::default(),
            date(2025, 1, 1),
        );
        assert!(matches!(result, Err(FincastError::ConfigInvalid { key, .. }) if key == "projection_years"));
    }

    #[test]
    fn run_plan_collects_everything() {
        let adapter = config(VALID_INI);
        let plan = cli::build_run_plan(
            &adapter,
            Path::new("/plans/fincast.ini"),
            &Overrides {
                mode: Some("relative".into()),
                ..Overrides::default()
            },
            date(2030, 1, 1),
        )
        .unwrap();

        assert_eq!(plan.name, "Household plan");
        assert_eq!(plan.start, date(2025, 3, 1));
        assert_eq!(plan.period, TimePeriod::Yearly);
        assert_eq!(plan.mode, DisplayMode::Relative);
        assert_eq!(plan.transactions_path, PathBuf::from("/plans/rules.csv"));
        assert_eq!(plan.output, PathBuf::from("out.csv"));
    }
}

mod pipeline_mock {
    use super::*;

    fn plan() -> cli::RunPlan {
        cli::RunPlan {
            name: "test".into(),
            settings: settings(10_000.0, 2, 0.5, 75.0),
            start: date(2025, 1, 1),
            period: TimePeriod::Yearly,
            mode: DisplayMode::Relative,
            transactions_path: PathBuf::from("unused.csv"),
            output: PathBuf::from("report.csv"),
        }
    }

    #[test]
    fn pipeline_writes_projection_to_report_port() {
        let start = date(2025, 1, 1);
        let port = MockTransactionPort::new()
            .with_rule(income("salary", 3_000.0, Frequency::Monthly, start))
            .with_rule(expense("rent", 1_000.0, Frequency::Monthly, start));
        let report = RecordingReportPort::new();

        let code = cli::run_projection_pipeline(&port, &report, &plan());

        assert!(is_success(code));
        let calls = report.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (projection, path) = &calls[0];
        assert_eq!(path, "report.csv");
        assert_eq!(projection.series.len(), 2);
        assert_eq!(projection.monthly.len(), 24);
    }

    #[test]
    fn pipeline_transaction_error_skips_report() {
        let port = MockTransactionPort::new().with_error("bad row");
        let report = RecordingReportPort::new();

        let code = cli::run_projection_pipeline(&port, &report, &plan());

        assert!(!is_success(code));
        assert!(report.calls.borrow().is_empty());
    }

    #[test]
    fn pipeline_invalid_rule_fails() {
        let port = MockTransactionPort::new().with_rule(income(
            "",
            10.0,
            Frequency::Monthly,
            date(2025, 1, 1),
        ));
        let report = RecordingReportPort::new();

        let code = cli::run_projection_pipeline(&port, &report, &plan());
        assert!(!is_success(code));
        assert!(report.calls.borrow().is_empty());
    }

    #[test]
    fn pipeline_report_failure_is_reported() {
        let port = MockTransactionPort::new();
        let code = cli::run_projection_pipeline(&port, &RecordingReportPort::failing(), &plan());
        assert!(!is_success(code));
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn project_writes_csv_report() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(dir.path(), "rules.csv", RULES_CSV);
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);
        let output = dir.path().join("report.csv");

        let code = cli::run(Cli {
            log_level: "warn".into(),
            command: Command::Project {
                config,
                transactions: None,
                output: Some(output.clone()),
                period: None,
                mode: None,
                start: None,
                dry_run: false,
            },
        });

        assert!(is_success(code));
        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // Mar 2025 to Feb 2027 touches three calendar years.
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("date,label,cash,invested,total"));
        assert!(lines[0].ends_with("flow_insurance,flow_investmentReturn,flow_rent,flow_salary"));
        assert!(lines[1].starts_with("2025-03-01,2025,"));
    }

    #[test]
    fn dry_run_valid_config_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(dir.path(), "rules.csv", RULES_CSV);
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);

        let code = cli::run_dry_run(&config, &Overrides::default());
        assert!(is_success(code));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn dry_run_missing_file_fails() {
        let code = cli::run_dry_run(Path::new("/nonexistent/fincast.ini"), &Overrides::default());
        assert!(!is_success(code));
    }

    #[test]
    fn dry_run_bad_transactions_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(
            dir.path(),
            "rules.csv",
            &format!("{CSV_HEADER}rent,Rent,-5,expense,monthly,2025-01-01,,,\n"),
        );
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);

        let code = cli::run_dry_run(&config, &Overrides::default());
        assert!(!is_success(code));
    }

    #[test]
    fn validate_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(dir.path(), "rules.csv", RULES_CSV);
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);

        let code = cli::run(Cli {
            log_level: "warn".into(),
            command: Command::Validate {
                config,
                transactions: None,
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn calendar_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(dir.path(), "rules.csv", RULES_CSV);
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);

        let code = cli::run(Cli {
            log_level: "warn".into(),
            command: Command::Calendar {
                config,
                transactions: None,
                month: "2025-05".into(),
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn calendar_rejects_bad_month() {
        let dir = tempfile::TempDir::new().unwrap();
        write_temp_file(dir.path(), "rules.csv", RULES_CSV);
        let config = write_temp_file(dir.path(), "fincast.ini", VALID_INI);

        let code = cli::run(Cli {
            log_level: "warn".into(),
            command: Command::Calendar {
                config,
                transactions: None,
                month: "2025/05".into(),
            },
        });
        assert!(!is_success(code));
    }
}

mod calendar_output {
    use super::*;

    #[test]
    fn format_lists_due_rules_then_month_totals() {
        let start = date(2025, 1, 1);
        let rules = vec![
            income("salary", 4_000.0, Frequency::Monthly, date(2025, 1, 25)),
            expense("rent", 1_500.0, Frequency::Monthly, date(2025, 1, 1)),
        ];
        let monthly = simulate(&rules, &settings(0.0, 1, 0.0, 0.0), start);
        let calendar = CalendarMonth::build(&rules, date(2025, 2, 1), &monthly);

        let lines = cli::format_calendar(&calendar);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2025-02-01  rent"));
        assert!(lines[0].contains("-1500.00"));
        assert!(lines[1].starts_with("2025-02-25  salary"));
        assert!(lines[2].starts_with("Feb 2025  income 4000.00  expense -1500.00  net 2500.00"));
    }

    #[test]
    fn format_outside_horizon_has_no_totals() {
        let rules = vec![expense("rent", 1_500.0, Frequency::Monthly, date(2025, 1, 1))];
        let calendar = CalendarMonth::build(&rules, date(2031, 2, 1), &[]);

        let lines = cli::format_calendar(&calendar);
        assert_eq!(lines.len(), 1);
    }
}

//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_finance_config, build_report_config)
//! - Symbol resolution and `--symbols` overrides
//! - Argument parsing for every subcommand
//! - Chart construction from series files on disk
//! - End-to-end weekly, render and validate runs against temp directories

mod common;

use buffet::adapters::chart_svg::ChartOptions;
use buffet::adapters::file_config_adapter::FileConfigAdapter;
use buffet::adapters::json_content::save_content;
use buffet::cli::{self, ChartArgs, Cli, Command};
use buffet::domain::content::{AssetSeries, Content, DataKind};
use buffet::domain::error::BuffetError;
use buffet::domain::settings::DEFAULT_REPORT_OUTPUT;
use clap::Parser;
use common::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

const VALID_INI: &str = r#"
[data]
finance_data = /data/finance

[report]
symbols = AAPL, spy
start_date = 2025-01-01
end_date = 2025-04-18
download = no

[descriptions]
aapl = Apple Inc.
SPY = SPDR S&P 500 ETF Trust
"#;

// ExitCode doesn't implement PartialEq, so compare the debug output.
fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

fn same_code(code: ExitCode, expected: u8) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
}

mod config_loading {
    use super::*;

    #[test]
    fn finance_config_trims_root() {
        let adapter = FileConfigAdapter::from_string("[data]\nfinance_data =  /data/finance  \n").unwrap();
        let finance = cli::build_finance_config(&adapter).unwrap();
        assert_eq!(finance.data_root(), Path::new("/data/finance"));
    }

    #[test]
    fn finance_config_requires_root() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let err = cli::build_finance_config(&adapter).unwrap_err();
        assert!(matches!(err, BuffetError::ConfigMissing { ref key, .. } if key == "finance_data"));
    }

    #[test]
    fn report_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let report = cli::build_report_config(&adapter, None).unwrap();

        assert_eq!(report.symbols, vec!["AAPL", "SPY"]);
        assert_eq!(report.start_date, date(2025, 1, 1));
        assert_eq!(report.end_date, date(2025, 4, 18));
        assert_eq!(report.output, PathBuf::from(DEFAULT_REPORT_OUTPUT));
        assert!(!report.download);
        assert_eq!(report.descriptions["AAPL"], "Apple Inc.");
        assert_eq!(report.descriptions["SPY"], "SPDR S&P 500 ETF Trust");
    }

    #[test]
    fn report_config_output_and_download() {
        let ini = VALID_INI.replace("download = no", "download = yes\noutput = /tmp/weekly.pdf");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let report = cli::build_report_config(&adapter, None).unwrap();
        assert!(report.download);
        assert_eq!(report.output, PathBuf::from("/tmp/weekly.pdf"));
    }

    #[test]
    fn symbol_without_description_is_absent() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let report = cli::build_report_config(&adapter, Some("AAPL,QQQ")).unwrap();
        assert_eq!(report.symbols, vec!["AAPL", "QQQ"]);
        assert!(!report.descriptions.contains_key("QQQ"));
    }

    #[test]
    fn override_needs_no_config_symbols() {
        let ini = VALID_INI.replace("symbols = AAPL, spy\n", "");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        assert!(cli::build_report_config(&adapter, None).is_err());

        let report = cli::build_report_config(&adapter, Some("AAPL,MSFT")).unwrap();
        assert_eq!(report.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(report.descriptions["AAPL"], "Apple Inc.");
    }

    #[test]
    fn override_ignores_invalid_config_symbols() {
        let ini = VALID_INI.replace("AAPL, spy", "AAPL,aapl");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let report = cli::build_report_config(&adapter, Some("SPY")).unwrap();
        assert_eq!(report.symbols, vec!["SPY"]);
    }

    #[test]
    fn override_still_checks_dates() {
        let ini = VALID_INI.replace("symbols = AAPL, spy\n", "").replace("2025-04-18", "2024-06-30");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let err = cli::build_report_config(&adapter, Some("SPY")).unwrap_err();
        assert!(matches!(err, BuffetError::ConfigInvalid { ref key, .. } if key == "start_date"));
    }

    #[test]
    fn invalid_dates_rejected() {
        let ini = VALID_INI.replace("2025-04-18", "2024-06-30");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let err = cli::build_report_config(&adapter, None).unwrap_err();
        assert!(matches!(err, BuffetError::ConfigInvalid { ref key, .. } if key == "start_date"));
    }
}

mod symbol_resolution {
    use super::*;

    #[test]
    fn override_wins() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let symbols = cli::resolve_symbols(Some("qqq , iwm"), &adapter).unwrap();
        assert_eq!(symbols, vec!["QQQ", "IWM"]);
    }

    #[test]
    fn falls_back_to_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(cli::resolve_symbols(None, &adapter).unwrap(), vec!["AAPL", "SPY"]);
    }

    #[test]
    fn duplicate_override_rejected() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let err = cli::resolve_symbols(Some("QQQ,qqq"), &adapter).unwrap_err();
        assert!(matches!(err, BuffetError::ConfigInvalid { ref key, .. } if key == "symbols"));
    }

    #[test]
    fn missing_everywhere_rejected() {
        let adapter = FileConfigAdapter::from_string("[report]\n").unwrap();
        assert!(cli::resolve_symbols(None, &adapter).is_err());
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn weekly_flags() {
        let cli = Cli::try_parse_from([
            "buffet", "weekly", "-c", "buffet.ini", "--download", "--json-dir", "out", "--symbols", "AAPL",
        ])
        .unwrap();
        match cli.command {
            Command::Weekly { config, download, json_dir, output, symbols } => {
                assert_eq!(config, PathBuf::from("buffet.ini"));
                assert!(download);
                assert_eq!(json_dir, Some(PathBuf::from("out")));
                assert!(output.is_none());
                assert_eq!(symbols.as_deref(), Some("AAPL"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn render_requires_inputs() {
        assert!(Cli::try_parse_from(["buffet", "render", "-o", "r.pdf"]).is_err());
        let cli = Cli::try_parse_from(["buffet", "render", "-o", "r.pdf", "--totals", "a.json", "b.json"]).unwrap();
        assert!(matches!(cli.command, Command::Render { totals: true, ref inputs, .. } if inputs.len() == 2));
    }

    #[test]
    fn fetch_series_splits_columns() {
        let cli = Cli::try_parse_from([
            "buffet", "fetch-series", "-c", "b.ini", "--url", "https://x", "--file", "gdp.csv",
            "--columns", "observation_date,GDP",
        ])
        .unwrap();
        match cli.command {
            Command::FetchSeries { columns, .. } => assert_eq!(columns, vec!["observation_date", "GDP"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn chart_defaults_date_column() {
        let cli = Cli::try_parse_from([
            "buffet", "chart", "-c", "b.ini", "--left", "a.csv:A", "--right", "b.csv:B", "--title", "T",
            "-o", "c.svg",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Chart { ref date_column, .. } if date_column == "observation_date"));
    }

    #[test]
    fn series_arg_splits_at_last_colon() {
        assert_eq!(cli::parse_series_arg("gdp.csv:GDP").unwrap(), ("gdp.csv", "GDP"));
        assert_eq!(cli::parse_series_arg("C:/data/gdp.csv:GDP").unwrap(), ("C:/data/gdp.csv", "GDP"));
        assert!(cli::parse_series_arg("gdp.csv").is_err());
        assert!(cli::parse_series_arg("gdp.csv:").is_err());
    }
}

mod charts {
    use super::*;

    fn write_series(dir: &Path) {
        fs::write(
            dir.join("unemployment.csv"),
            "observation_date,UNRATE\n2020-01-01,3.5\n2020-04-01,14.8\n2020-07-01,10.2\n",
        )
        .unwrap();
        fs::write(
            dir.join("gdp.csv"),
            "observation_date,GDP\n2020-01-01,21727.7\n2020-04-01,19935.4\n2020-07-01,21684.6\n",
        )
        .unwrap();
    }

    fn args<'a>(output: &'a Path, recessions: Option<&'a Path>) -> ChartArgs<'a> {
        ChartArgs {
            left: "unemployment.csv:UNRATE",
            right: "gdp.csv:GDP",
            date_column: "observation_date",
            left_label: Some("Unemployment"),
            right_label: None,
            recessions,
            title: "Unemployment vs GDP",
            output,
        }
    }

    #[test]
    fn chart_with_recession_shading() {
        let dir = TempDir::new().unwrap();
        write_series(dir.path());
        fs::write(
            dir.path().join("recessions.csv"),
            "Type\tStart\tEnd\nRecession\t2020-02-01\t2020-04-30\n",
        )
        .unwrap();

        let out = dir.path().join("c.svg");
        let svg = cli::build_chart(dir.path(), &args(&out, None), &ChartOptions::new("Unemployment vs GDP")).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Unemployment vs GDP"));
        assert!(svg.contains("Unemployment"));
        assert!(svg.contains("GDP"));
        assert!(svg.contains("class=\"recession\""));
    }

    #[test]
    fn unreadable_recessions_only_drop_shading() {
        let dir = TempDir::new().unwrap();
        write_series(dir.path());
        let bad = dir.path().join("bad.tsv");
        fs::write(&bad, "Kind\tFrom\n").unwrap();

        let out = dir.path().join("c.svg");
        let svg = cli::build_chart(dir.path(), &args(&out, Some(&bad)), &ChartOptions::new("Unemployment vs GDP")).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("class=\"recession\""));
    }

    #[test]
    fn chart_size_from_config() {
        let adapter = FileConfigAdapter::from_string("[chart]\nwidth = 800\n").unwrap();
        let options = cli::chart_options(&adapter, "T");
        assert_eq!(options.width, 800.0);
        assert_eq!(options.height, 600.0);
        assert_eq!(options.title, "T");
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_series(dir.path());
        let out = dir.path().join("c.svg");
        let mut a = args(&out, None);
        a.right = "gdp.csv:GDPC1";
        let err = cli::build_chart(dir.path(), &a, &ChartOptions::new("T")).unwrap_err();
        assert!(matches!(err, BuffetError::MissingColumns { .. }));
    }
}

mod end_to_end {
    use super::*;

    fn write_prices(root: &Path, symbol: &str, closes: &[f64]) {
        let dir = root.join("asset_prices");
        fs::create_dir_all(&dir).unwrap();
        let mut text = String::from("Date,Close\n");
        for row in weekday_rows(closes) {
            text.push_str(&format!("{},{}\n", row.date.format("%Y-%m-%d"), row.close));
        }
        fs::write(dir.join(format!("{symbol}.csv")), text).unwrap();
    }

    fn ini_for(root: &Path, output: &Path) -> String {
        format!(
            "[data]\nfinance_data = {}\n\n[report]\nsymbols = AAPL,SPY\nstart_date = 2025-01-01\n\
             end_date = 2025-01-31\noutput = {}\n\n[descriptions]\nAAPL = Apple Inc.\n",
            root.display(),
            output.display()
        )
    }

    #[test]
    fn weekly_run_writes_pdf_and_json() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "AAPL", &[100.0, 110.0, 99.0]);
        write_prices(dir.path(), "SPY", &[50.0, 50.0, 55.0]);
        let output = dir.path().join("report.pdf");
        let ini = write_temp_ini(&ini_for(dir.path(), &output));
        let json_dir = dir.path().join("json");
        fs::create_dir_all(&json_dir).unwrap();

        let code = cli::run(Cli {
            command: Command::Weekly {
                config: ini.path().to_path_buf(),
                download: false,
                json_dir: Some(json_dir.clone()),
                output: None,
                symbols: None,
            },
        });
        assert!(is_success(code));
        assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
        assert!(json_dir.join(cli::CHANGES_JSON).exists());
        assert!(json_dir.join(cli::PRICES_JSON).exists());
    }

    #[test]
    fn weekly_run_reports_alignment_failure() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "AAPL", &[100.0, 110.0, 99.0]);
        write_prices(dir.path(), "SPY", &[50.0]);
        let output = dir.path().join("report.pdf");
        let ini = write_temp_ini(&ini_for(dir.path(), &output));

        let code = cli::run(Cli {
            command: Command::Weekly {
                config: ini.path().to_path_buf(),
                download: false,
                json_dir: None,
                output: None,
                symbols: None,
            },
        });
        assert!(same_code(code, 4));
        assert!(!output.exists());
    }

    #[test]
    fn weekly_run_fails_on_malformed_price_file() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "AAPL", &[100.0, 110.0, 99.0]);
        write_prices(dir.path(), "SPY", &[50.0, 50.0, 55.0]);
        fs::write(dir.path().join("asset_prices/SPY.csv"), "Date,Open\n2025-01-06,50.0\n").unwrap();
        let output = dir.path().join("report.pdf");
        let ini = write_temp_ini(&ini_for(dir.path(), &output));

        let code = cli::run(Cli {
            command: Command::Weekly {
                config: ini.path().to_path_buf(),
                download: false,
                json_dir: None,
                output: None,
                symbols: None,
            },
        });
        assert!(same_code(code, 4));
        assert!(!output.exists());
    }

    #[test]
    fn render_run_from_json() {
        let dir = TempDir::new().unwrap();
        let mut content = Content::new("Weekly Asset Prices", DataKind::Price, vec!["01-06".into()]);
        content.data.push(AssetSeries {
            id: "SPY".into(),
            description: "SPDR S&P 500 ETF Trust".into(),
            timeseries: vec![591.95],
            total: 0.0,
        });
        let input = dir.path().join("prices.json");
        save_content(&input, &content).unwrap();
        let output = dir.path().join("prices.pdf");

        let code = cli::run(Cli {
            command: Command::Render {
                output: output.clone(),
                totals: false,
                inputs: vec![input],
            },
        });
        assert!(is_success(code));
        assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn render_run_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let code = cli::run(Cli {
            command: Command::Render {
                output: dir.path().join("x.pdf"),
                totals: true,
                inputs: vec![dir.path().join("missing.json")],
            },
        });
        assert!(same_code(code, 1));
    }

    #[test]
    fn validate_run() {
        let ini = write_temp_ini(VALID_INI);
        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn validate_run_reports_config_error() {
        let ini = write_temp_ini("[data]\nfinance_data = /data\n");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: ini.path().to_path_buf(),
            },
        });
        assert!(same_code(code, 2));
    }
}

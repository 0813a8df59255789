//! Command-line arguments for the terminal dashboard.

use crate::mock::DEFAULT_SEED;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Contract performance dashboard
///
/// Loads contract reports, then prints completion KPIs and the monthly
/// completion trend for a category and contract selection.
///
/// Examples:
///   contract-dashboard
///   contract-dashboard --category Roads --contract All
///   contract-dashboard --source reports.csv --contract C001,C004 --json out.json
///   contract-dashboard --interactive
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Report source: `mock` or the path of a CSV export
    #[arg(short, long, default_value = "mock", env = "DASHBOARD_SOURCE")]
    pub source: String,

    /// Seed for the mock source
    #[arg(long, default_value_t = DEFAULT_SEED, env = "DASHBOARD_SEED")]
    pub seed: u64,

    /// Category to show (defaults to the first category in the data)
    #[arg(short, long, value_name = "NAME")]
    pub category: Option<String>,

    /// Contract ids to include (comma-separated, `All` for every contract).
    ///
    /// Defaults to the first contract, like the dashboard's initial selection.
    #[arg(long = "contract", value_name = "IDS", value_delimiter = ',')]
    pub contracts: Option<Vec<String>>,

    /// Write the full result as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write the monthly series as CSV
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Keep prompting for filter changes
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Where reports come from, decided from `--source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Mock(u64),
    Csv(PathBuf),
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn source_spec(&self) -> SourceSpec {
        if self.source.eq_ignore_ascii_case("mock") {
            SourceSpec::Mock(self.seed)
        } else {
            SourceSpec::Csv(PathBuf::from(&self.source))
        }
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mock_source() {
        let args = Args::parse_from(["contract-dashboard"]);
        assert_eq!(args.source_spec(), SourceSpec::Mock(DEFAULT_SEED));
        assert_eq!(args.log_level(), Level::INFO);
        assert!(args.contracts.is_none());
    }

    #[test]
    fn parses_contract_list_and_csv_source() {
        let args = Args::parse_from([
            "contract-dashboard",
            "--source",
            "data/reports.csv",
            "--category",
            "Roads",
            "--contract",
            "C001,C004",
            "-v",
        ]);
        assert_eq!(args.source_spec(), SourceSpec::Csv(PathBuf::from("data/reports.csv")));
        assert_eq!(args.category.as_deref(), Some("Roads"));
        assert_eq!(
            args.contracts,
            Some(vec!["C001".to_string(), "C004".to_string()])
        );
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["contract-dashboard", "-v", "-q"]).is_err());
    }
}

//! Contract performance dashboard core.
//!
//! A [`DashboardContext`] is initialised once from a [`ReportSource`]; every
//! filter change then calls [`compute`], which returns the KPI summary over
//! the latest report per contract and the monthly completion trend over all
//! reports.
pub mod cli;
pub mod context;
pub mod engine;
pub mod error;
pub mod loader;
pub mod mock;
pub mod output;
pub mod types;
pub mod util;

pub use context::DashboardContext;
pub use engine::{compute, ContractFilter, ALL_SENTINEL};
pub use error::{DashboardError, Result};
pub use loader::{load_reports, CsvSource, LoadReport, ReportSource, ReportTables};
pub use mock::MockSource;
pub use types::{DashboardResult, DeviationStatus, KpiSummary, MonthlyPoint, Report};

//! Seeded stand-in for the contract reporting service.
//!
//! Produces one report per contract with the value ranges the dashboard was
//! designed around, so the front end can run without a data export.
use crate::error::{DashboardError, Result};
use crate::loader::{ReportSource, ReportTables};
use crate::types::Report;
use crate::util::month_end;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub const DEFAULT_SEED: u64 = 42;
pub const MOCK_CONTRACTS: usize = 10;
pub const MOCK_CATEGORIES: [&str; 2] = ["Lighting", "Roads"];

#[derive(Debug, Clone)]
pub struct MockSource {
    seed: u64,
}

impl MockSource {
    pub fn new(seed: u64) -> Self {
        MockSource { seed }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        MockSource::new(DEFAULT_SEED)
    }
}

impl ReportSource for MockSource {
    fn load(&self) -> Result<ReportTables> {
        let reports = generate(self.seed)?;
        debug!(seed = self.seed, rows = reports.len(), "Generated mock reports");
        Ok(ReportTables::from_reports(reports))
    }
}

/// Contracts `C001..C010`, month-end report dates from January 2024, the first
/// half in the first category and the rest in the second.
pub fn generate(seed: u64) -> Result<Vec<Report>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = MOCK_CONTRACTS / 2;

    let mut reports = Vec::with_capacity(MOCK_CONTRACTS);
    for i in 0..MOCK_CONTRACTS {
        let month = i as u32 + 1;
        let report_date = month_end(2024, month)
            .ok_or_else(|| DashboardError::malformed(None, "Report_Date", "invalid mock month"))?;
        let category = if i < half { MOCK_CATEGORIES[0] } else { MOCK_CATEGORIES[1] };

        let actual = rng.gen::<f64>() * 0.7 + 0.3;
        let target = rng.gen::<f64>() * 0.2 + 0.7;
        let overall = rng.gen_range(75.0..95.0);
        let actual_value = rng.gen_range(10u64..50) * 1_000_000;
        let target_value = rng.gen_range(10u64..40) * 1_000_000;
        let hse = rng.gen_range(80.0..100.0);
        let quality = rng.gen_range(70.0..90.0);

        reports.push(Report::new(
            format!("C{:03}", i + 1),
            report_date,
            category,
            actual,
            target,
            overall,
            actual_value,
            target_value,
            hse,
            quality,
        ));
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn generates_schema_ranges() {
        let reports = generate(DEFAULT_SEED).unwrap();
        assert_eq!(reports.len(), MOCK_CONTRACTS);
        for r in &reports {
            assert!((0.3..=1.0).contains(&r.actual_completion_rate));
            assert!((0.7..=0.9).contains(&r.target_completion_rate));
            assert!((75.0..95.0).contains(&r.contractor_overall_score));
            assert_eq!(r.actual_financial_value % 1_000_000, 0);
            assert!((10_000_000..50_000_000).contains(&r.actual_financial_value));
            assert!((10_000_000..40_000_000).contains(&r.target_financial_value));
        }
        assert_eq!(reports[0].contract_id, "C001");
        assert_eq!(reports[9].contract_id, "C010");
        assert_eq!(reports[0].report_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(reports[1].report_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(reports[4].category, "Lighting");
        assert_eq!(reports[5].category, "Roads");
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate(7).unwrap(), generate(7).unwrap());
    }

    #[test]
    fn latest_view_has_every_contract() {
        let tables = MockSource::default().load().unwrap();
        assert_eq!(tables.latest.len(), MOCK_CONTRACTS);
    }
}

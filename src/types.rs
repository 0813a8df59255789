use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Deviation at or beyond which a contract counts as ahead (or, negated, late).
pub const DEVIATION_THRESHOLD: f64 = 0.05;

/// Header names of the ten source fields, in schema order.
pub const SOURCE_FIELDS: [&str; 10] = [
    "Contract_ID",
    "Report_Date",
    "Category",
    "Actual_Completion_Rate",
    "Target_Completion_Rate",
    "Contractor_Overall_Score",
    "Actual_Financial_Value",
    "Target_Financial_Value",
    "HSE_Score",
    "Quality_Score",
];

/// One CSV row exactly as it arrives from the tabular data service.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Contract_ID")]
    pub contract_id: Option<String>,
    #[serde(rename = "Report_Date")]
    pub report_date: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Actual_Completion_Rate")]
    pub actual_completion_rate: Option<String>,
    #[serde(rename = "Target_Completion_Rate")]
    pub target_completion_rate: Option<String>,
    #[serde(rename = "Contractor_Overall_Score")]
    pub contractor_overall_score: Option<String>,
    #[serde(rename = "Actual_Financial_Value")]
    pub actual_financial_value: Option<String>,
    #[serde(rename = "Target_Financial_Value")]
    pub target_financial_value: Option<String>,
    #[serde(rename = "HSE_Score")]
    pub hse_score: Option<String>,
    #[serde(rename = "Quality_Score")]
    pub quality_score: Option<String>,
}

/// Schedule performance of a report relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationStatus {
    Ahead,
    Late,
    OnTrack,
}

impl DeviationStatus {
    pub fn classify(deviation: f64) -> Self {
        if deviation >= DEVIATION_THRESHOLD {
            DeviationStatus::Ahead
        } else if deviation <= -DEVIATION_THRESHOLD {
            DeviationStatus::Late
        } else {
            DeviationStatus::OnTrack
        }
    }
}

/// A validated report row with its derived deviation fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub contract_id: String,
    pub report_date: NaiveDate,
    pub category: String,
    pub actual_completion_rate: f64,
    pub target_completion_rate: f64,
    pub contractor_overall_score: f64,
    pub actual_financial_value: u64,
    pub target_financial_value: u64,
    pub hse_score: f64,
    pub quality_score: f64,
    pub deviation: f64,
    pub status: DeviationStatus,
}

impl Report {
    /// Builds a report from the ten source fields, deriving deviation and status.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contract_id: impl Into<String>,
        report_date: NaiveDate,
        category: impl Into<String>,
        actual_completion_rate: f64,
        target_completion_rate: f64,
        contractor_overall_score: f64,
        actual_financial_value: u64,
        target_financial_value: u64,
        hse_score: f64,
        quality_score: f64,
    ) -> Self {
        let deviation = actual_completion_rate - target_completion_rate;
        Report {
            contract_id: contract_id.into(),
            report_date,
            category: category.into(),
            actual_completion_rate,
            target_completion_rate,
            contractor_overall_score,
            actual_financial_value,
            target_financial_value,
            hse_score,
            quality_score,
            deviation,
            status: DeviationStatus::classify(deviation),
        }
    }

    pub fn is_late(&self) -> bool {
        self.status == DeviationStatus::Late
    }
}

/// Scalar indicators over the latest report of each selected contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub avg_actual_completion: f64,
    pub avg_target_completion: f64,
    pub completion_delta: f64,
    pub avg_overall_score: f64,
    pub total_projects: usize,
    pub late_count: usize,
    pub total_actual_value_millions: f64,
}

/// Monthly mean completion, in percent. `month` is the first day of the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub actual_pct: f64,
    pub target_pct: f64,
}

/// Output of one recomputation. `kpis == None` is the "no data" marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardResult {
    pub kpis: Option<KpiSummary>,
    pub series: Vec<MonthlyPoint>,
}

impl DashboardResult {
    pub fn empty() -> Self {
        DashboardResult { kpis: None, series: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.is_none()
    }
}

/// Row shape for previewing and exporting the time series.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "ActualPct")]
    #[tabled(rename = "Actual %")]
    pub actual_pct: String,
    #[serde(rename = "TargetPct")]
    #[tabled(rename = "Target %")]
    pub target_pct: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(DeviationStatus::classify(0.05), DeviationStatus::Ahead);
        assert_eq!(DeviationStatus::classify(-0.05), DeviationStatus::Late);
        assert_eq!(DeviationStatus::classify(0.049), DeviationStatus::OnTrack);
        assert_eq!(DeviationStatus::classify(-0.049), DeviationStatus::OnTrack);
        assert_eq!(DeviationStatus::classify(0.0), DeviationStatus::OnTrack);
    }

    #[test]
    fn report_derives_deviation() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let r = Report::new("C001", d, "A", 0.5, 0.8, 80.0, 1, 1, 90.0, 80.0);
        assert!((r.deviation + 0.3).abs() < 1e-12);
        assert!(r.is_late());
    }
}

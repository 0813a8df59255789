use crate::error::{DashboardError, Result};
use crate::types::{RawRow, Report, SOURCE_FIELDS};
use crate::util::{parse_date_safe, parse_f64_safe, parse_u64_safe};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Anything that can produce the report tables once at startup.
pub trait ReportSource {
    fn load(&self) -> Result<ReportTables>;
}

/// Every report plus the latest report per contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTables {
    pub all: Vec<Report>,
    pub latest: Vec<Report>,
}

impl ReportTables {
    /// Derives the latest view. The result is ordered by contract id; when a
    /// contract has several reports on its latest date the first one in
    /// source order is kept.
    pub fn from_reports(all: Vec<Report>) -> Self {
        let mut best: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, r) in all.iter().enumerate() {
            match best.get(r.contract_id.as_str()) {
                Some(&cur) if all[cur].report_date >= r.report_date => {}
                _ => {
                    best.insert(r.contract_id.as_str(), idx);
                }
            }
        }
        let latest = best.values().map(|&idx| all[idx].clone()).collect();
        ReportTables { all, latest }
    }
}

/// Diagnostics from a CSV load, printed by the front end.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub contracts: usize,
    pub categories: usize,
}

impl LoadReport {
    pub fn from_tables(tables: &ReportTables) -> Self {
        let mut categories: Vec<&str> = tables.all.iter().map(|r| r.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        LoadReport {
            total_rows: tables.all.len(),
            contracts: tables.latest.len(),
            categories: categories.len(),
        }
    }
}

/// Reads reports from a CSV export of the tabular data service.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvSource { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for CsvSource {
    fn load(&self) -> Result<ReportTables> {
        debug!("Reading reports from {}", self.path.display());
        let file = std::fs::File::open(&self.path)?;
        let tables = load_reports(file)?;
        info!(
            rows = tables.all.len(),
            contracts = tables.latest.len(),
            "Loaded reports from {}",
            self.path.display()
        );
        Ok(tables)
    }
}

/// Parses reports from any CSV reader. Unlike a forgiving import, a single bad
/// row fails the whole load: the dashboard never runs on partial data.
pub fn load_reports<R: Read>(reader: R) -> Result<ReportTables> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for field in SOURCE_FIELDS {
        if !headers.iter().any(|h| h == field) {
            return Err(DashboardError::malformed(None, field, "missing column"));
        }
    }

    let mut reports = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        let raw = result.map_err(|e| row_error(e, row_no, &headers))?;
        reports.push(clean_row(raw, row_no)?);
    }

    if reports.is_empty() {
        return Err(DashboardError::malformed(None, "Contract_ID", "source has no rows"));
    }
    Ok(ReportTables::from_reports(reports))
}

/// Shape and type errors within a data row are reported as a malformed
/// source; anything else (I/O, encoding) passes through as a CSV error.
fn row_error(err: csv::Error, row_no: usize, headers: &csv::StringRecord) -> DashboardError {
    let at = Some(row_no);
    let column = |i: u64| headers.get(i as usize).unwrap_or("row").to_string();
    let malformed = match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            let field = if len < expected_len { column(*len) } else { "row".to_string() };
            Some(DashboardError::MalformedSource {
                row: at,
                field,
                reason: format!("expected {} fields, found {}", expected_len, len),
            })
        }
        csv::ErrorKind::Deserialize { err: de, .. } => Some(DashboardError::MalformedSource {
            row: at,
            field: de.field().map(column).unwrap_or_else(|| "row".to_string()),
            reason: de.kind().to_string(),
        }),
        _ => None,
    };
    match malformed {
        Some(e) => e,
        None => DashboardError::Csv(err),
    }
}

fn clean_row(row: RawRow, row_no: usize) -> Result<Report> {
    let at = Some(row_no);

    let contract_id = required_text(row.contract_id, at, "Contract_ID")?;
    let category = required_text(row.category, at, "Category")?;
    let report_date = parse_date_safe(row.report_date.as_deref()).ok_or_else(|| {
        DashboardError::malformed(at, "Report_Date", invalid("date", row.report_date.as_deref()))
    })?;

    let actual = rate(row.actual_completion_rate.as_deref(), at, "Actual_Completion_Rate")?;
    let target = rate(row.target_completion_rate.as_deref(), at, "Target_Completion_Rate")?;
    let overall = score(row.contractor_overall_score.as_deref(), at, "Contractor_Overall_Score")?;
    let actual_value = amount(row.actual_financial_value.as_deref(), at, "Actual_Financial_Value")?;
    let target_value = amount(row.target_financial_value.as_deref(), at, "Target_Financial_Value")?;
    let hse = score(row.hse_score.as_deref(), at, "HSE_Score")?;
    let quality = score(row.quality_score.as_deref(), at, "Quality_Score")?;

    Ok(Report::new(
        contract_id,
        report_date,
        category,
        actual,
        target,
        overall,
        actual_value,
        target_value,
        hse,
        quality,
    ))
}

fn required_text(v: Option<String>, row: Option<usize>, field: &str) -> Result<String> {
    match v.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(DashboardError::malformed(row, field, "empty value")),
    }
}

fn rate(v: Option<&str>, row: Option<usize>, field: &str) -> Result<f64> {
    match parse_f64_safe(v) {
        Some(r) if (0.0..=1.0).contains(&r) => Ok(r),
        Some(r) => Err(DashboardError::malformed(
            row,
            field,
            format!("rate {} outside [0, 1]", r),
        )),
        None => Err(DashboardError::malformed(row, field, invalid("number", v))),
    }
}

fn score(v: Option<&str>, row: Option<usize>, field: &str) -> Result<f64> {
    parse_f64_safe(v).ok_or_else(|| DashboardError::malformed(row, field, invalid("number", v)))
}

fn amount(v: Option<&str>, row: Option<usize>, field: &str) -> Result<u64> {
    parse_u64_safe(v).ok_or_else(|| {
        DashboardError::malformed(row, field, invalid("non-negative integer", v))
    })
}

fn invalid(kind: &str, v: Option<&str>) -> String {
    format!("unparsable {} `{}`", kind, v.unwrap_or(""))
}

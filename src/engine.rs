//! Filter → aggregate step behind every dashboard refresh.
//!
//! KPIs are computed over the latest report of each selected contract, while
//! the monthly trend is computed over every report. Both use the same filter.
use crate::context::DashboardContext;
use crate::types::{DashboardResult, KpiSummary, MonthlyPoint, Report};
use crate::util::{mean, month_start};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Selection value meaning "no contract filter".
pub const ALL_SENTINEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractFilter {
    All,
    Only(BTreeSet<String>),
}

impl ContractFilter {
    /// Interprets a multi-select value. Nothing selected, or a selection that
    /// includes the `All` entry, disables the contract filter.
    pub fn from_selection<S: AsRef<str>>(selection: &[S]) -> Self {
        if selection.is_empty() || selection.iter().any(|s| s.as_ref() == ALL_SENTINEL) {
            return ContractFilter::All;
        }
        ContractFilter::Only(selection.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn matches(&self, contract_id: &str) -> bool {
        match self {
            ContractFilter::All => true,
            ContractFilter::Only(ids) => ids.is_empty() || ids.contains(contract_id),
        }
    }
}

fn select<'a>(
    rows: &'a [Report],
    category: &'a str,
    filter: &'a ContractFilter,
) -> impl Iterator<Item = &'a Report> + 'a {
    rows.iter()
        .filter(move |r| r.category == category && filter.matches(&r.contract_id))
}

/// Recomputes KPIs and the monthly trend for one filter selection.
///
/// An unknown category or contract id simply yields the empty result.
pub fn compute(ctx: &DashboardContext, category: &str, filter: &ContractFilter) -> DashboardResult {
    let latest: Vec<&Report> = select(ctx.latest_reports(), category, filter).collect();
    let Some(kpis) = summarize(&latest) else {
        debug!(category, "No reports match the selected filters");
        return DashboardResult::empty();
    };
    let series = monthly_series(select(ctx.all_reports(), category, filter));
    debug!(
        category,
        projects = kpis.total_projects,
        months = series.len(),
        "Dashboard recomputed"
    );
    DashboardResult { kpis: Some(kpis), series }
}

/// KPIs over a set of reports, `None` when the set is empty.
pub fn summarize(rows: &[&Report]) -> Option<KpiSummary> {
    let avg_actual = mean(rows.iter().map(|r| r.actual_completion_rate))? * 100.0;
    let avg_target = mean(rows.iter().map(|r| r.target_completion_rate))? * 100.0;
    let avg_overall_score = mean(rows.iter().map(|r| r.contractor_overall_score))?;
    // Summed as f64: individual values may already be near `u64::MAX`.
    let total_value: f64 = rows.iter().map(|r| r.actual_financial_value as f64).sum();

    Some(KpiSummary {
        avg_actual_completion: avg_actual,
        avg_target_completion: avg_target,
        completion_delta: avg_actual - avg_target,
        avg_overall_score,
        total_projects: rows.len(),
        late_count: rows.iter().filter(|r| r.is_late()).count(),
        total_actual_value_millions: total_value / 1_000_000.0,
    })
}

/// Per-month mean completion in percent, ascending by month.
pub fn monthly_series<'a, I>(rows: I) -> Vec<MonthlyPoint>
where
    I: IntoIterator<Item = &'a Report>,
{
    #[derive(Default)]
    struct Acc {
        actual: Vec<f64>,
        target: Vec<f64>,
    }

    let mut months: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for r in rows {
        let e = months.entry(month_start(r.report_date)).or_default();
        e.actual.push(r.actual_completion_rate);
        e.target.push(r.target_completion_rate);
    }

    months
        .into_iter()
        .filter_map(|(month, acc)| {
            Some(MonthlyPoint {
                month,
                actual_pct: mean(acc.actual)? * 100.0,
                target_pct: mean(acc.target)? * 100.0,
            })
        })
        .collect()
}

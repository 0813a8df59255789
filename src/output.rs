use crate::error::Result;
use crate::types::{DashboardResult, KpiSummary, MonthlyPoint, SeriesRow};
use crate::util::format_number;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const NO_DATA_NOTICE: &str = "No data matches the selected filters.";

/// Colour role of a card or its delta badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub delta: Option<(String, Tone)>,
    pub tone: Tone,
}

impl KpiCard {
    fn new(title: &'static str, value: String, tone: Tone) -> Self {
        KpiCard { title, value, delta: None, tone }
    }

    fn with_delta(mut self, delta: f64) -> Self {
        let (sign, tone) = if delta >= 0.0 { ("+", Tone::Success) } else { ("", Tone::Danger) };
        self.delta = Some((format!("({}{:.1}%)", sign, delta), tone));
        self
    }
}

/// The four summary cards shown above the trend chart.
pub fn kpi_cards(kpis: &KpiSummary) -> Vec<KpiCard> {
    vec![
        KpiCard::new(
            "Average Actual Completion",
            format!("{:.1}%", kpis.avg_actual_completion),
            Tone::Success,
        )
        .with_delta(kpis.completion_delta),
        KpiCard::new(
            "Average Overall Score",
            format!("{:.2}", kpis.avg_overall_score),
            Tone::Primary,
        ),
        KpiCard::new(
            "Late Projects",
            format!("{} / {}", kpis.late_count, kpis.total_projects),
            Tone::Danger,
        ),
        KpiCard::new(
            "Total Executed Value",
            format!("{}M", format_number(kpis.total_actual_value_millions, 1)),
            Tone::Primary,
        ),
    ]
}

pub fn series_rows(series: &[MonthlyPoint]) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|p| SeriesRow {
            month: p.month.format("%Y-%m").to_string(),
            actual_pct: format!("{:.2}", p.actual_pct),
            target_pct: format!("{:.2}", p.target_pct),
        })
        .collect()
}

/// Renders a result as plain text: cards, then the monthly table, or the
/// no-data notice.
pub fn render_dashboard(category: &str, result: &DashboardResult) -> String {
    let Some(kpis) = &result.kpis else {
        return format!("{}\n", NO_DATA_NOTICE);
    };
    let mut out = format!("Executive Summary ({})\n\n", category);
    for card in kpi_cards(kpis) {
        out.push_str(&format!("  {:<28} {}", card.title, card.value));
        if let Some((delta, _)) = &card.delta {
            out.push(' ');
            out.push_str(delta);
        }
        out.push('\n');
    }
    out.push_str("\nMonthly Completion Trend\n\n");
    out.push_str(&table_markdown(&series_rows(&result.series)));
    out
}

pub fn table_markdown<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    format!("{}\n", Table::new(rows.to_vec()).with(Style::markdown()))
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary(delta: f64) -> KpiSummary {
        KpiSummary {
            avg_actual_completion: 72.345,
            avg_target_completion: 72.345 - delta,
            completion_delta: delta,
            avg_overall_score: 84.5678,
            total_projects: 5,
            late_count: 2,
            total_actual_value_millions: 1234.0,
        }
    }

    #[test]
    fn cards_format_like_the_dashboard() {
        let cards = kpi_cards(&summary(3.21));
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "72.3%");
        assert_eq!(cards[0].delta, Some(("(+3.2%)".to_string(), Tone::Success)));
        assert_eq!(cards[1].value, "84.57");
        assert_eq!(cards[2].value, "2 / 5");
        assert_eq!(cards[2].tone, Tone::Danger);
        assert_eq!(cards[3].value, "1,234.0M");
    }

    #[test]
    fn negative_delta_is_danger() {
        let cards = kpi_cards(&summary(-4.56));
        assert_eq!(cards[0].delta, Some(("(-4.6%)".to_string(), Tone::Danger)));
    }

    #[test]
    fn empty_result_renders_notice() {
        let text = render_dashboard("A", &DashboardResult::empty());
        assert_eq!(text.trim(), NO_DATA_NOTICE);
    }

    #[test]
    fn rendered_dashboard_lists_months() {
        let result = DashboardResult {
            kpis: Some(summary(1.0)),
            series: vec![MonthlyPoint {
                month: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                actual_pct: 50.0,
                target_pct: 60.0,
            }],
        };
        let text = render_dashboard("A", &result);
        assert!(text.contains("Late Projects"));
        assert!(text.contains("2024-03"));
        assert!(text.contains("60.00"));
    }
}

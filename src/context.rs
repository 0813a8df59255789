use crate::error::Result;
use crate::loader::{LoadReport, ReportSource, ReportTables};
use crate::types::Report;
use tracing::info;

/// Owns the report tables for the lifetime of a dashboard session.
///
/// The tables are never mutated after `init`, so a context can be shared
/// between threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    tables: ReportTables,
    categories: Vec<String>,
}

impl DashboardContext {
    pub fn init(source: &dyn ReportSource) -> Result<Self> {
        let tables = source.load()?;
        let ctx = Self::from_tables(tables);
        let report = ctx.load_report();
        info!(
            rows = report.total_rows,
            contracts = report.contracts,
            categories = report.categories,
            "Dashboard context ready"
        );
        Ok(ctx)
    }

    pub fn from_tables(tables: ReportTables) -> Self {
        // First-seen order, matching how the category options are listed.
        let mut categories: Vec<String> = Vec::new();
        for r in &tables.all {
            if !categories.iter().any(|c| c == &r.category) {
                categories.push(r.category.clone());
            }
        }
        DashboardContext { tables, categories }
    }

    pub fn all_reports(&self) -> &[Report] {
        &self.tables.all
    }

    pub fn latest_reports(&self) -> &[Report] {
        &self.tables.latest
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn default_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    /// Contract ids offered for selection, ordered by id.
    pub fn contract_ids(&self) -> Vec<&str> {
        self.tables.latest.iter().map(|r| r.contract_id.as_str()).collect()
    }

    pub fn has_contract(&self, contract_id: &str) -> bool {
        self.tables.latest.iter().any(|r| r.contract_id == contract_id)
    }

    /// Initial contract selection: the first contract only.
    pub fn default_selection(&self) -> Vec<String> {
        self.tables
            .latest
            .first()
            .map(|r| vec![r.contract_id.clone()])
            .unwrap_or_default()
    }

    pub fn load_report(&self) -> LoadReport {
        LoadReport::from_tables(&self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;

    #[test]
    fn options_follow_loaded_data() {
        let ctx = DashboardContext::init(&MockSource::default()).unwrap();
        assert_eq!(ctx.categories(), &["Lighting".to_string(), "Roads".to_string()]);
        assert_eq!(ctx.default_category(), Some("Lighting"));
        assert!(ctx.has_category("Roads"));
        assert!(!ctx.has_category("roads"));
        assert_eq!(ctx.contract_ids().len(), 10);
        assert_eq!(ctx.default_selection(), vec!["C001".to_string()]);
        assert!(ctx.has_contract("C010"));
        assert!(!ctx.has_contract("C011"));
    }

    #[test]
    fn context_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DashboardContext>();
    }
}

use thiserror::Error;

/// Errors raised while producing the report tables or exporting results.
///
/// An empty filter match is not an error; see `DashboardResult::is_empty`.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The backing source cannot produce the report tables.
    #[error("malformed source{}: field `{field}`: {reason}", row_suffix(.row))]
    MalformedSource {
        /// 1-based data row, `None` for header/table level problems.
        row: Option<usize>,
        field: String,
        reason: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn malformed(row: Option<usize>, field: &str, reason: impl Into<String>) -> Self {
        DashboardError::MalformedSource {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {}", r),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

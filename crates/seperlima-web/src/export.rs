//! CSV export of the filtered record tables.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use seperlima_data::{QueryName, Table};

use crate::error::WebError;

/// A record table the dashboard can browse and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Loans,
    Members,
    Books,
}

impl Entity {
    pub fn query(self) -> QueryName {
        match self {
            Entity::Loans => QueryName::LoanDetail,
            Entity::Members => QueryName::Members,
            Entity::Books => QueryName::Books,
        }
    }

    /// Page path; the export lives at the same path plus `.csv`.
    pub fn path(self) -> &'static str {
        match self {
            Entity::Loans => "/loans",
            Entity::Members => "/members",
            Entity::Books => "/books",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Entity::Loans => "loans.csv",
            Entity::Members => "members.csv",
            Entity::Books => "books.csv",
        }
    }
}

/// Serialize `table` as UTF-8 CSV with a header row. Nulls become empty
/// fields and dates are written as `YYYY-MM-DD`.
pub fn write_csv(table: &Table) -> Result<Vec<u8>, WebError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !table.columns().is_empty() {
        writer.write_record(table.columns())?;
        for row in table.iter() {
            writer.write_record(row.values().iter().map(|v| v.to_string()))?;
        }
    }
    writer
        .into_inner()
        .map_err(|e| WebError::Io(e.into_error()))
}

/// Attachment response for an exported table.
pub fn csv_response(entity: Entity, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", entity.file_name()),
            ),
        ],
        body,
    )
        .into_response()
}

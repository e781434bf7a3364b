//! Error types for the dashboard.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use seperlima_data::DataSourceError;
use thiserror::Error;
use tracing::error;

use crate::page;

/// Errors that abort a page render.
#[derive(Debug, Error)]
pub enum WebError {
    /// Loading a table from the library database failed.
    #[error("failed to load data: {0}")]
    Data(#[from] DataSourceError),

    /// Writing the CSV export failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "page render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(page::error_page(&self.to_string())),
        )
            .into_response()
    }
}

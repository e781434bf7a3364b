//! Web dashboard for the Seperlima library.
//!
//! Four views over the library database:
//! - Overview: headline figures and the loan charts
//! - Loan records: filterable by date range, faculty, status and title
//! - Member records: filterable by status, faculty and name
//! - Book records: filterable by category and title
//!
//! Each record view can export exactly the rows it shows as CSV.

mod error;
pub mod export;
pub mod filters;
pub mod kpi;
mod page;
mod routes;

pub use error::WebError;
pub use routes::{AppState, create_router};

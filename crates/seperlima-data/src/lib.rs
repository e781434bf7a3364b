//! Read-only data provider for the Seperlima library dashboard.
//!
//! This crate provides:
//! - The in-memory tabular model (`Table`, `Value`)
//! - Typed views over loan, member and book rows
//! - The fixed queries and the `DataSource` seam behind them
//! - A per-query table cache with an explicit invalidation policy

mod cache;
mod error;
mod query;
mod records;
mod source;
mod sqlite;
mod table;

pub use cache::{CachePolicy, DataProvider, TableCache};
pub use error::DataSourceError;
pub use query::{QueryName, columns};
pub use records::{BookRecord, LoanRecord, MemberRecord};
pub use source::{DataSource, MemorySource};
pub use sqlite::SqliteSource;
pub use table::{Row, Table, Value};

//! Error types for the data provider.

use thiserror::Error;

/// Errors raised while loading a table from the library database.
///
/// A load either yields the complete table or one of these; callers never
/// see a partially populated table.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The database could not be opened.
    #[error("cannot connect to database at {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The query failed while executing or reading rows.
    #[error("query {query} failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A designated column held a value that could not be parsed.
    #[error("query {query}: cannot parse column {column} value {value:?}")]
    Parse {
        query: &'static str,
        column: &'static str,
        value: String,
    },

    /// The blocking worker running the query was lost.
    #[error("database task failed: {0}")]
    Task(String),
}

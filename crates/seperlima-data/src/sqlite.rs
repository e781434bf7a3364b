//! SQLite-backed data source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::DataSourceError;
use crate::query::QueryName;
use crate::source::DataSource;
use crate::table::{Table, Value};

/// Reads the library database from a SQLite file.
///
/// Every load opens its own read-only connection, runs one query, reads all
/// rows and closes the connection again.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn load(&self, query: QueryName) -> Result<Table, DataSourceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || load_blocking(&path, query))
            .await
            .map_err(|e| DataSourceError::Task(e.to_string()))?
    }
}

fn load_blocking(path: &Path, query: QueryName) -> Result<Table, DataSourceError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| DataSourceError::Connect {
        path: path.display().to_string(),
        source,
    })?;

    let query_err = |source| DataSourceError::Query {
        query: query.as_str(),
        source,
    };

    let (columns, rows) = {
        let mut stmt = conn.prepare(query.sql()).map_err(query_err)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(query_err)?;
        while let Some(row) = cursor.next().map_err(query_err)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(convert(row.get_ref(i).map_err(query_err)?));
            }
            rows.push(values);
        }
        (columns, rows)
    };
    drop(conn);

    let mut table = Table::new(columns, rows);
    parse_dates(&mut table, query)?;

    info!(query = %query, rows = table.len(), "table loaded");
    Ok(table)
}

fn convert(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

/// Rewrite the query's designated date columns from text to dates.
fn parse_dates(table: &mut Table, query: QueryName) -> Result<(), DataSourceError> {
    let targets: Vec<(usize, &'static str)> = query
        .date_columns()
        .iter()
        .filter_map(|name| table.column_index(name).map(|idx| (idx, *name)))
        .collect();
    if targets.is_empty() {
        return Ok(());
    }

    let columns = table.columns().to_vec();
    let mut rows = Vec::with_capacity(table.len());
    for row in table.rows() {
        let mut row = row.clone();
        for &(idx, column) in &targets {
            let parsed = match &row[idx] {
                Value::Null => Value::Null,
                Value::Date(d) => Value::Date(*d),
                Value::Text(s) if s.trim().is_empty() => Value::Null,
                Value::Text(s) => match parse_date(s) {
                    Some(d) => Value::Date(d),
                    None => {
                        return Err(DataSourceError::Parse {
                            query: query.as_str(),
                            column,
                            value: s.clone(),
                        });
                    }
                },
                other => {
                    return Err(DataSourceError::Parse {
                        query: query.as_str(),
                        column,
                        value: other.to_string(),
                    });
                }
            };
            row[idx] = parsed;
        }
        rows.push(row);
    }

    debug!(query = %query, columns = targets.len(), "date columns parsed");
    *table = Table::new(columns, rows);
    Ok(())
}

/// Accepts plain dates and timestamps; the time part is dropped.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

//! The seam between the provider and the external store.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::DataSourceError;
use crate::query::QueryName;
use crate::table::Table;

/// Something that can execute the fixed queries.
///
/// Implementations materialize the full result before returning; an error
/// means no table at all.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self, query: QueryName) -> Result<Table, DataSourceError>;
}

/// Fixed in-memory tables, one per query. Queries without a table load empty.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<QueryName, Table>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, query: QueryName, table: Table) -> Self {
        self.tables.insert(query, table);
        self
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn load(&self, query: QueryName) -> Result<Table, DataSourceError> {
        Ok(self.tables.get(&query).cloned().unwrap_or_default())
    }
}

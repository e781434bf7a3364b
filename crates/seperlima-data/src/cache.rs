//! Per-query table cache and the provider that owns it.
//!
//! Tables are cached whole, keyed only by `QueryName`: all filtering happens
//! downstream in memory, so the queries never take arguments. Entries live
//! until the policy expires them or a caller invalidates them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::DataSourceError;
use crate::query::QueryName;
use crate::source::DataSource;
use crate::table::Table;

/// When cached tables stop being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Entries live until invalidated.
    Manual,
    /// Entries expire this long after they were fetched.
    Ttl(Duration),
}

impl CachePolicy {
    /// `0` means manual invalidation only.
    pub fn from_ttl_secs(secs: u64) -> Self {
        if secs == 0 {
            CachePolicy::Manual
        } else {
            CachePolicy::Ttl(Duration::from_secs(secs))
        }
    }
}

struct CachedTable {
    table: Arc<Table>,
    fetched_at: Instant,
}

/// Whole-table cache keyed by query.
///
/// Population is idempotent: two concurrent misses both load and the later
/// write wins with identical content.
pub struct TableCache {
    policy: CachePolicy,
    entries: RwLock<HashMap<QueryName, CachedTable>>,
}

impl TableCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Fresh cached table for `query`, if any.
    pub async fn get(&self, query: QueryName) -> Option<Arc<Table>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&query)?;
        match self.policy {
            CachePolicy::Ttl(ttl) if entry.fetched_at.elapsed() >= ttl => None,
            _ => Some(Arc::clone(&entry.table)),
        }
    }

    pub async fn insert(&self, query: QueryName, table: Arc<Table>) {
        self.entries.write().await.insert(
            query,
            CachedTable {
                table,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop one entry. Returns whether anything was cached.
    pub async fn invalidate(&self, query: QueryName) -> bool {
        self.entries.write().await.remove(&query).is_some()
    }

    /// Queries with an entry, expired or not, in query order.
    pub async fn cached_queries(&self) -> Vec<QueryName> {
        let mut queries: Vec<QueryName> = self.entries.read().await.keys().copied().collect();
        queries.sort();
        queries
    }

    pub async fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().await;
        let n = entries.len();
        entries.clear();
        n
    }
}

/// Fetches the fixed queries through a cache.
///
/// Shared by handle (`Arc<DataProvider>`); there is no global instance.
pub struct DataProvider {
    source: Box<dyn DataSource>,
    cache: TableCache,
}

impl DataProvider {
    pub fn new(source: impl DataSource + 'static, policy: CachePolicy) -> Self {
        Self {
            source: Box::new(source),
            cache: TableCache::new(policy),
        }
    }

    /// Table for `query`, loading it on a miss. Failed loads are not cached.
    pub async fn fetch(&self, query: QueryName) -> Result<Arc<Table>, DataSourceError> {
        if let Some(table) = self.cache.get(query).await {
            debug!(query = %query, "cache hit");
            return Ok(table);
        }

        debug!(query = %query, "cache miss");
        let table = Arc::new(self.source.load(query).await?);
        self.cache.insert(query, Arc::clone(&table)).await;
        Ok(table)
    }

    pub async fn invalidate(&self, query: QueryName) -> bool {
        let dropped = self.cache.invalidate(query).await;
        info!(query = %query, dropped, "cache invalidated");
        dropped
    }

    pub async fn invalidate_all(&self) -> usize {
        let dropped = self.cache.invalidate_all().await;
        info!(dropped, "cache cleared");
        dropped
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }
}

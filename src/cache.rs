//! Refresh operations over the cache store.
//!
//! [`SourceCache`] pairs a [`Resolver`] with a [`CacheStore`]. A record is
//! written only after a successful resolution, and always as a whole; a
//! failed refresh leaves whatever was cached before untouched.

use source_cache_core::models::{CacheRecord, ChangedFile, SourceDefinition};
use source_cache_core::store::CacheStore;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::Config;
use crate::resolver::Resolver;
use crate::scanner;

/// The cache of resolved sources.
///
/// Cheap to share: both halves are reference counted, so refresh tasks can
/// run concurrently on the tokio runtime.
pub struct SourceCache {
    resolver: Arc<Resolver>,
    store: Arc<CacheStore>,
}

impl SourceCache {
    pub fn new(resolver: Resolver) -> Self {
        Self::with_store(Arc::new(resolver), Arc::new(CacheStore::new()))
    }

    pub fn with_store(resolver: Arc<Resolver>, store: Arc<CacheStore>) -> Self {
        Self { resolver, store }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Latest successfully resolved record for `source_id`.
    pub fn get(&self, source_id: &str) -> Option<Arc<CacheRecord>> {
        self.store.get(source_id)
    }

    /// Resolve one configured source and store the result.
    ///
    /// Returns `None`, leaving any existing entry in place, when the id is
    /// not configured or no candidate could be resolved.
    pub async fn refresh_one(
        &self,
        config: &Config,
        source_id: &str,
    ) -> Option<Arc<CacheRecord>> {
        let Some(source) = config.find_source(source_id) else {
            warn!(source = source_id, "source is not configured");
            return None;
        };
        refresh_source(&self.resolver, &self.store, source).await
    }

    /// Resolve every configured source concurrently.
    ///
    /// Each source runs in its own task; completion order is arbitrary and
    /// one source failing does not affect the others. The returned map
    /// holds only the sources that resolved this round. Dropping the future
    /// aborts outstanding tasks.
    pub async fn refresh_all(&self, config: &Config) -> HashMap<String, Arc<CacheRecord>> {
        let mut seen = HashSet::new();
        let mut tasks = JoinSet::new();

        for source in &config.sources {
            if !seen.insert(source.id.as_str()) {
                continue;
            }
            let resolver = Arc::clone(&self.resolver);
            let store = Arc::clone(&self.store);
            let source = source.clone();
            tasks.spawn(async move {
                refresh_source(&resolver, &store, &source)
                    .await
                    .map(|record| (source.id, record))
            });
        }

        let mut merged = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((id, record))) => {
                    merged.insert(id, record);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "refresh task failed"),
            }
        }

        debug!(
            requested = seen.len(),
            resolved = merged.len(),
            "refresh complete"
        );
        merged
    }

    /// Re-run the change scan for a cached directory source.
    ///
    /// Uses the directory recorded by the last successful refresh and does
    /// not touch the store. Returns `None` if the source has no cached
    /// directory record.
    pub async fn rescan(&self, source_id: &str) -> Option<Vec<ChangedFile>> {
        let record = self.get(source_id)?;
        if !record.is_directory() {
            return None;
        }
        Some(scanner::scan_changes(&record.local_file, self.resolver.history_dir()).await)
    }
}

async fn refresh_source(
    resolver: &Resolver,
    store: &CacheStore,
    source: &SourceDefinition,
) -> Option<Arc<CacheRecord>> {
    let record = resolver.resolve_one(source).await?;
    Some(store.insert(record))
}

// TTL cache in front of a SheetStore
//
// Only the listed tabs are cached. Appending to a tab drops its cached copy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;

use super::SheetStore;
use crate::error::SheetError;
use crate::models::Record;

pub struct CachedSheets<S> {
    inner: S,
    cache: Cache<String, Arc<Vec<Record>>>,
    cached_tabs: Vec<String>,
}

impl<S: SheetStore> CachedSheets<S> {
    pub fn new(inner: S, ttl: Duration, cached_tabs: &[&str]) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(ttl)
            .build();

        Self {
            inner,
            cache,
            cached_tabs: cached_tabs.iter().map(|tab| tab.to_string()).collect(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_cached(&self, tab: &str) -> bool {
        self.cached_tabs.iter().any(|cached| cached == tab)
    }
}

#[async_trait]
impl<S: SheetStore> SheetStore for CachedSheets<S> {
    async fn records(&self, tab: &str) -> Result<Vec<Record>, SheetError> {
        if !self.is_cached(tab) {
            return self.inner.records(tab).await;
        }

        if let Some(hit) = self.cache.get(tab).await {
            tracing::debug!("Cache hit for {}", tab);
            return Ok(hit.as_ref().clone());
        }

        let records = self.inner.records(tab).await?;
        self.cache
            .insert(tab.to_string(), Arc::new(records.clone()))
            .await;
        Ok(records)
    }

    async fn append_row(&self, tab: &str, row: Vec<Value>) -> Result<(), SheetError> {
        self.inner.append_row(tab, row).await?;
        self.cache.invalidate(tab).await;
        Ok(())
    }
}

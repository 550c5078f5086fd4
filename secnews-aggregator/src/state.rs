use crate::collection::Collection;
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone)]
struct CachedCollection {
    collection: Arc<Collection>,
    last_update: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub last_update: Option<String>,
    pub total_news: usize,
}

/// Process-scoped holder of the most recent collection.
///
/// Starts empty. Only callers that finished a cycle should [`store`] into it;
/// readers get a shared handle that stays valid after later replacements.
///
/// [`store`]: CollectionCache::store
#[derive(Debug, Default)]
pub struct CollectionCache {
    inner: RwLock<Option<CachedCollection>>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, collection: Collection) -> Arc<Collection> {
        let collection = Arc::new(collection);
        let last_update = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        info!("Cached collection of {} items at {}", collection.len(), last_update);

        let mut inner = self.inner.write().await;
        *inner = Some(CachedCollection {
            collection: Arc::clone(&collection),
            last_update,
        });
        collection
    }

    pub async fn latest(&self) -> Option<Arc<Collection>> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|cached| Arc::clone(&cached.collection))
    }

    pub async fn last_update(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|cached| cached.last_update.clone())
    }

    pub async fn status(&self) -> CacheStatus {
        let inner = self.inner.read().await;
        match inner.as_ref() {
            Some(cached) => CacheStatus {
                last_update: Some(cached.last_update.clone()),
                total_news: cached.collection.len(),
            },
            None => CacheStatus {
                last_update: None,
                total_news: 0,
            },
        }
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

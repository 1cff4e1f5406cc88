use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::MetadataRecord;

/// Process-lifetime cache of fetched metadata, keyed by item id
///
/// Records for an id are treated as immutable once fetched, so entries never expire.
#[derive(Clone, Default)]
pub struct MetadataCache {
    entries: Arc<RwLock<HashMap<i64, MetadataRecord>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a cached record, if one was stored for this id
    pub async fn get_from_cache(&self, item_id: i64) -> Option<MetadataRecord> {
        self.entries.read().await.get(&item_id).cloned()
    }

    /// Stores a record, replacing any previous entry
    pub async fn set(&self, item_id: i64, record: MetadataRecord) {
        self.entries.write().await.insert(item_id, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_miss_then_hit() {
        let cache = MetadataCache::new();
        assert_eq!(cache.get_from_cache(597).await, None);

        let record = MetadataRecord::unavailable("fallback.png");
        cache.set(597, record.clone()).await;

        assert_eq!(cache.get_from_cache(597).await, Some(record));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = MetadataCache::new();
        let other = cache.clone();

        other.set(1, MetadataRecord::unavailable("fallback.png")).await;
        assert!(cache.get_from_cache(1).await.is_some());
    }
}

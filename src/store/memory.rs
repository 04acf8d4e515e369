//! In-process document store with the same contract as [`MongoStore`](super::MongoStore).

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use super::{effective_limit, ConnectionState, DocumentStore, StoreError, StoreHealth, HEALTH_COLLECTION_LIMIT};

#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { collections: RwLock::new(BTreeMap::new()), available: true }
    }

    /// A store that behaves as if no connection was ever established.
    pub fn unavailable() -> Self {
        Self { available: false, ..Self::new() }
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map_or(0, Vec::len)
    }
}

impl Default for MemoryStore {
    fn default() -> Self { Self::new() }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, record: Document) -> Result<String, StoreError> {
        if !self.available { return Err(StoreError::Unavailable); }
        let id = ObjectId::new();
        let mut doc = Document::new();
        doc.insert("_id", id);
        doc.extend(record.into_iter().filter(|(key, _)| key != "_id"));
        self.collections.write().await.entry(collection.to_string()).or_default().push(doc);
        Ok(id.to_hex())
    }

    async fn find(&self, collection: &str, filter: Document, limit: Option<i64>) -> Result<Vec<Document>, StoreError> {
        if !self.available { return Err(StoreError::Unavailable); }
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, &filter))
                    .take(effective_limit(limit).unwrap_or(usize::MAX))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn health(&self) -> StoreHealth {
        if !self.available { return StoreHealth::NotInitialized; }
        let collections = self.collections.read().await;
        StoreHealth::Working { collections: collections.keys().take(HEALTH_COLLECTION_LIMIT).cloned().collect() }
    }

    fn state(&self) -> ConnectionState {
        if self.available { ConnectionState::Connected } else { ConnectionState::Uninitialized }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.insert_one("product", doc! {"title": "Mug"}).await.unwrap();
        let b = store.insert_one("product", doc! {"title": "Mug"}).await.unwrap();
        assert_ne!(a, b);
        let docs = store.find("product", Document::new(), None).await.unwrap();
        assert_eq!(docs[0].get_object_id("_id").unwrap().to_hex(), a);
        assert_eq!(docs[1].get_object_id("_id").unwrap().to_hex(), b);
    }

    #[tokio::test]
    async fn test_find_filter_and_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert_one("product", doc! {"n": i, "even": i % 2 == 0}).await.unwrap();
        }
        assert_eq!(store.find("product", Document::new(), Some(2)).await.unwrap().len(), 2);
        assert_eq!(store.find("product", Document::new(), Some(0)).await.unwrap().len(), 5);
        let evens = store.find("product", doc! {"even": true}, None).await.unwrap();
        assert_eq!(evens.len(), 3);
        assert!(store.find("order", Document::new(), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::unavailable();
        assert!(matches!(store.insert_one("product", doc! {}).await, Err(StoreError::Unavailable)));
        assert!(matches!(store.find("product", doc! {}, None).await, Err(StoreError::Unavailable)));
        assert_eq!(store.health().await, StoreHealth::NotInitialized);
        assert_eq!(store.count("product").await, 0);
    }
}

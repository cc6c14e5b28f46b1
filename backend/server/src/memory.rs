use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::{Collection, DocumentStore, StoreError};

/// Process-local store for tests and `STORE=memory`. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, HashMap<String, String>>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<String>, StoreError> {
        let collections = self.collections.read().await;

        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        document: String,
    ) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(key.to_string(), document);

        Ok(())
    }

    async fn swap(
        &self,
        collection: Collection,
        key: &str,
        expected: Option<&str>,
        document: String,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if documents.get(key).map(String::as_str) != expected {
            return Ok(false);
        }

        documents.insert(key.to_string(), document);
        Ok(true)
    }

    async fn values(&self, collection: Collection) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;

        Ok(collections
            .get(&collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.collections.write().await.remove(&collection);

        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::default();
        store.put(Collection::Users, "a@b.com", "1".into()).await.unwrap();
        store.put(Collection::Users, "a@b.com", "2".into()).await.unwrap();

        assert_eq!(store.values(Collection::Users).await.unwrap(), vec!["2"]);
    }

    #[tokio::test]
    async fn test_swap_compares_current_value() {
        let store = MemoryStore::default();

        assert!(store.swap(Collection::Users, "a@b.com", None, "1".into()).await.unwrap());
        assert!(!store.swap(Collection::Users, "a@b.com", None, "2".into()).await.unwrap());
        assert!(!store.swap(Collection::Users, "a@b.com", Some("0"), "2".into()).await.unwrap());
        assert!(store.swap(Collection::Users, "a@b.com", Some("1"), "2".into()).await.unwrap());

        assert_eq!(store.get(Collection::Users, "a@b.com").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_clear_is_per_collection() {
        let store = MemoryStore::default();
        store.put(Collection::Reviews, "r", "{}".into()).await.unwrap();
        store.put(Collection::Colleges, "c", "{}".into()).await.unwrap();

        store.clear(Collection::Reviews).await.unwrap();

        assert!(store.values(Collection::Reviews).await.unwrap().is_empty());
        assert!(store.get(Collection::Colleges, "c").await.unwrap().is_some());
    }
}

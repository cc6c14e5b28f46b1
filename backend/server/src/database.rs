//! # Redis
//!
//! Document store for every collection.
//!
//! ## Requirements
//!
//! - Whole documents in and out, no partial field updates
//! - Lookup by primary key, or by lower-cased email for profiles
//! - Full scans are fine, the catalog is small (tens of colleges, hundreds of papers)
//! - Single document writes only, no transactions
//!
//! ## Implementation
//!
//! - Redis hash per collection: 1 key, then document key to JSON pairs
//! - `HSET`/`HGET` on one field is atomic, which is all the atomicity needed
//! - References between collections are plain ids, resolved by the services on read
//! - One `ConnectionManager` shared by every request, it reconnects on its own
//! - Read-modify-write goes through `swap`, a Lua script comparing the stored
//!   JSON before `HSET`, so a racing writer makes the caller re-read instead of
//!   being overwritten
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Colleges,
    Admissions,
    Reviews,
    Users,
    Papers,
}

impl Collection {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Colleges => "colleges",
            Self::Admissions => "admissions",
            Self::Reviews => "reviews",
            Self::Users => "users",
            Self::Papers => "papers",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Gave up on {key} in {collection} after {attempts} conflicting writes")]
    Conflict {
        collection: &'static str,
        key: String,
        attempts: usize,
    },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        document: String,
    ) -> Result<(), StoreError>;

    /// Writes `document` only if the stored value still equals `expected`,
    /// `None` meaning absent. Returns whether the write happened.
    async fn swap(
        &self,
        collection: Collection,
        key: &str,
        expected: Option<&str>,
        document: String,
    ) -> Result<bool, StoreError>;

    async fn values(&self, collection: Collection) -> Result<Vec<String>, StoreError>;

    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;

    async fn ping(&self) -> bool;
}

// KEYS[1] hash, ARGV[1] field, ARGV[2] "1" when the field must be absent,
// ARGV[3] expected value, ARGV[4] new value.
const SWAP_SCRIPT: &str = r#"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if ARGV[2] == '1' then
    if current then return 0 end
elseif current ~= ARGV[3] then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[4])
return 1
"#;

pub struct RedisStore {
    connection: ConnectionManager,
    swap_script: Script,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(3)
            .set_connection_timeout(Duration::from_millis(500));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self {
            connection,
            swap_script: Script::new(SWAP_SCRIPT),
        })
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.hget(collection.key(), key).await?)
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        document: String,
    ) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        connection
            .hset::<_, _, _, ()>(collection.key(), key, document)
            .await?;

        Ok(())
    }

    async fn swap(
        &self,
        collection: Collection,
        key: &str,
        expected: Option<&str>,
        document: String,
    ) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let written: i32 = self
            .swap_script
            .key(collection.key())
            .arg(key)
            .arg(if expected.is_none() { "1" } else { "0" })
            .arg(expected.unwrap_or_default())
            .arg(document)
            .invoke_async(&mut connection)
            .await?;

        Ok(written == 1)
    }

    async fn values(&self, collection: Collection) -> Result<Vec<String>, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.hvals(collection.key()).await?)
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        connection.del::<_, ()>(collection.key()).await?;

        Ok(())
    }

    async fn ping(&self) -> bool {
        let mut connection = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut connection)
            .await
            .map_err(|e| warn!("Redis ping failed: {e}"))
            .is_ok()
    }
}

pub async fn find_one<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(collection, key).await? {
        Some(document) => Ok(Some(serde_json::from_str(&document)?)),
        None => Ok(None),
    }
}

pub async fn find_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    store
        .values(collection)
        .await?
        .iter()
        .map(|document| serde_json::from_str(document).map_err(StoreError::from))
        .collect()
}

pub async fn save<T: Serialize>(
    store: &dyn DocumentStore,
    collection: Collection,
    key: &str,
    document: &T,
) -> Result<(), StoreError> {
    store
        .put(collection, key, serde_json::to_string(document)?)
        .await
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::memory::MemoryStore;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = MemoryStore::default();
        let doc = Doc {
            name: "Tech Institute".into(),
        };

        save(&store, Collection::Colleges, "a", &doc).await.unwrap();

        let found: Option<Doc> = find_one(&store, Collection::Colleges, "a").await.unwrap();
        assert_eq!(found, Some(doc));

        let missing: Option<Doc> = find_one(&store, Collection::Colleges, "b").await.unwrap();
        assert!(missing.is_none());

        let all: Vec<Doc> = find_all(&store, Collection::Colleges).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_connect_errors() {
        assert!(RedisStore::connect("not a redis url").await.is_err());

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let refused = RedisStore::connect(&format!("redis://{address}")).await;
        assert!(matches!(refused, Err(StoreError::Redis(_))));
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let store = MemoryStore::default();
        store
            .put(Collection::Reviews, "x", "{not json".into())
            .await
            .unwrap();

        let result: Result<Vec<Doc>, _> = find_all(&store, Collection::Reviews).await;
        assert!(matches!(result, Err(StoreError::Document(_))));
    }
}

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stats_core::SourceKind;
use stats_db::Db;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::Result;

/// Persistent key-value storage behind the fetch cache.
pub trait CacheStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, source: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<usize>;
}

/// SQLite-backed store. Opens a connection per operation.
#[derive(Debug, Clone)]
pub struct DbCacheStore {
    db_path: PathBuf,
}

impl DbCacheStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn db(&self) -> Result<Db> {
        Ok(Db::open(&self.db_path)?)
    }
}

impl CacheStore for DbCacheStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.db()?.cache_get(key)?)
    }

    fn write(&self, key: &str, source: &str, value: &str) -> Result<()> {
        Ok(self.db()?.cache_put(key, source, value)?)
    }

    fn delete(&self, key: &str) -> Result<usize> {
        Ok(self.db()?.cache_delete(key)?)
    }
}

/// Stored cache value. Scalar counts were historically written as `count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub ts: i64,
    #[serde(alias = "count")]
    pub data: T,
}

/// Read-through cache with a fixed TTL. Never serves stale entries.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl TtlCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, ttl_ms: i64) -> Self {
        Self {
            store,
            clock,
            ttl_ms,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Returns the fresh cached payload for `kind:identity`, or runs `fetch`
    /// and caches its result. A failed fetch leaves the cache untouched.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        kind: SourceKind,
        identity: &str,
        fetch: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let key = kind.cache_key(identity);
        if let Some(cached) = self.read::<T>(&key) {
            debug!(%key, "cache hit");
            return Ok(cached);
        }
        debug!(%key, "cache miss");
        let value = fetch().await?;
        self.write(kind, &key, &value);
        Ok(value)
    }

    /// Fresh payload under `key`. Any read or decode failure counts as a miss.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.read(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(%key, %err, "cache read failed");
                return None;
            }
        };
        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%key, %err, "ignoring malformed cache entry");
                return None;
            }
        };
        if self.clock.now_ms() - entry.ts < self.ttl_ms {
            Some(entry.data)
        } else {
            None
        }
    }

    pub fn write<T: Serialize>(&self, kind: SourceKind, key: &str, value: &T) {
        let entry = CacheEntry {
            ts: self.clock.now_ms(),
            data: value,
        };
        let result = serde_json::to_string(&entry)
            .map_err(Into::into)
            .and_then(|raw| self.store.write(key, kind.cache_prefix(), &raw));
        if let Err(err) = result {
            warn!(%key, %err, "cache write failed");
        }
    }

    pub fn invalidate(&self, kind: SourceKind, identity: &str) -> Result<usize> {
        self.store.delete(&kind.cache_key(identity))
    }
}

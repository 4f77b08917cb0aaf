//! TTL-bounded local cache of raw API responses.
//!
//! Entries are keyed by a sha256 of the full request URL, so the same
//! backward-in-time lookup on a later run is served from disk. There is no
//! eviction beyond the TTL; `habitboard cache clear` is the manual remedy.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// How long a stored response stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A stored raw response with its write timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: Vec<u8>,
    pub stored_at: SystemTime,
}

/// Key-value store backing the response cache.
///
/// The persistent implementation is [`FileCache`]; tests use
/// [`MemoryCache`].
pub trait CacheStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CoreError>;
    fn put(&self, key: &str, body: &[u8]) -> Result<(), CoreError>;
}

/// Deterministic cache key for a fully-qualified request URL.
pub fn cache_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// File-per-entry store under the habitboard data directory.
///
/// The directory is created lazily on first write; `stored_at` is the
/// file's modification time, so overwriting an entry resets its age.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under `~/.config/habitboard/cache`.
    pub fn open_default() -> Result<Self, CoreError> {
        Ok(Self::new(crate::config::data_dir()?.join("cache")))
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Remove every stored entry. Missing directory counts as already clear.
    pub fn clear(&self) -> Result<usize, CoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                std::fs::remove_file(path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CoreError> {
        let path = self.entry_path(key);
        let body = match std::fs::read(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored_at = std::fs::metadata(&path)?.modified()?;
        Ok(Some(CacheEntry { body, stored_at }))
    }

    fn put(&self, key: &str, body: &[u8]) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.entry_path(key), body)?;
        Ok(())
    }
}

/// In-memory store for tests and one-off runs.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CoreError> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, body: &[u8]) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                body: body.to_vec(),
                stored_at: SystemTime::now(),
            },
        );
        Ok(())
    }
}

/// TTL logic in front of a [`CacheStore`].
pub struct ResponseCache<S: CacheStore> {
    store: S,
    ttl: Duration,
}

impl<S: CacheStore> ResponseCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl: CACHE_TTL,
        }
    }

    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Fetch the response for `request_url`.
    ///
    /// With `use_cache` false the producer is always invoked and the store
    /// is never touched. Otherwise a stored entry younger than the TTL is
    /// returned as-is; an absent or expired entry invokes the producer and,
    /// only on success, overwrites the entry. A producer failure propagates
    /// without writing anything.
    pub fn fetch<F>(&self, request_url: &str, use_cache: bool, producer: F) -> Result<Vec<u8>, CoreError>
    where
        F: FnOnce() -> Result<Vec<u8>, CoreError>,
    {
        if !use_cache {
            return producer();
        }

        let key = cache_key(request_url);
        if let Some(entry) = self.store.get(&key)? {
            let age = SystemTime::now()
                .duration_since(entry.stored_at)
                .unwrap_or(Duration::ZERO);
            if age < self.ttl {
                log::debug!("cache hit for {request_url}");
                return Ok(entry.body);
            }
        }

        let body = producer()?;
        self.store.put(&key, &body)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_producer<'a>(
        calls: &'a Cell<u32>,
        body: &'a str,
    ) -> impl FnOnce() -> Result<Vec<u8>, CoreError> + 'a {
        move || {
            calls.set(calls.get() + 1);
            Ok(body.as_bytes().to_vec())
        }
    }

    #[test]
    fn fresh_entry_skips_the_producer() {
        let cache = ResponseCache::new(MemoryCache::new());
        let calls = Cell::new(0);

        let first = cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "a"))
            .unwrap();
        let second = cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "b"))
            .unwrap();

        assert_eq!(first, b"a");
        assert_eq!(second, b"a", "second read must come from the store");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn expired_entry_invokes_producer_and_refreshes() {
        let cache = ResponseCache::with_ttl(MemoryCache::new(), Duration::ZERO);
        let calls = Cell::new(0);

        cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "a"))
            .unwrap();
        let second = cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "b"))
            .unwrap();

        assert_eq!(second, b"b");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn use_cache_false_bypasses_the_store() {
        let cache = ResponseCache::new(MemoryCache::new());
        let calls = Cell::new(0);

        cache
            .fetch("https://x/status/h1", false, counting_producer(&calls, "a"))
            .unwrap();
        cache
            .fetch("https://x/status/h1", false, counting_producer(&calls, "b"))
            .unwrap();

        assert_eq!(calls.get(), 2);

        // Nothing was written either: a cached read now still calls out.
        let third = cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "c"))
            .unwrap();
        assert_eq!(third, b"c");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn producer_failure_is_propagated_and_not_written() {
        let cache = ResponseCache::new(MemoryCache::new());

        let err = cache
            .fetch("https://x/status/h1", true, || {
                Err(CoreError::Transport {
                    endpoint: "https://x/status/h1".into(),
                    status: 500,
                })
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Transport { status: 500, .. }));

        let calls = Cell::new(0);
        let body = cache
            .fetch("https://x/status/h1", true, counting_producer(&calls, "ok"))
            .unwrap();
        assert_eq!(body, b"ok");
        assert_eq!(calls.get(), 1, "failed fetch must not have cached anything");
    }

    #[test]
    fn distinct_urls_get_distinct_keys() {
        assert_ne!(
            cache_key("https://x/status/h1?target_date=2024-01-01"),
            cache_key("https://x/status/h1?target_date=2024-01-02")
        );
    }

    #[test]
    fn file_cache_roundtrip_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCache::new(tmp.path().join("cache"));

        // Lazy directory creation: reads before any write see nothing.
        assert!(store.get("k1").unwrap().is_none());

        store.put("k1", b"body").unwrap();
        let entry = store.get("k1").unwrap().unwrap();
        assert_eq!(entry.body, b"body");

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.get("k1").unwrap().is_none());
    }
}

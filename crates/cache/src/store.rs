//! Capacity- and TTL-bounded store for computed values.
//!
//! The store owns the values themselves; the snapshot index is a read-model
//! of this store's lifecycle, so the engine is told which key an insert
//! evicted and removes the matching index entry.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;

use crate::entry::CacheKey;

/// Capacity and TTL bounds for the computed-value store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
	/// Maximum number of distinct keys held at once.
	pub capacity: NonZeroUsize,
	/// How long a stored value stays fresh.
	pub ttl: Duration,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			capacity: NonZeroUsize::new(512).unwrap_or(NonZeroUsize::MIN),
			ttl: Duration::from_secs(300),
		}
	}
}

/// Outcome of a store lookup.
pub(crate) enum StoreLookup {
	/// A value stored within the TTL window.
	Fresh(Value),
	/// A value was present but aged out; the slot has been reclaimed.
	Expired,
	/// Nothing stored for this key.
	Absent,
}

struct Stored {
	value: Value,
	stored_at: Instant,
}

/// LRU map of computed values with lazy TTL expiry.
pub(crate) struct BoundedStore {
	entries: Mutex<LruCache<CacheKey, Stored>>,
	ttl: Duration,
}

impl BoundedStore {
	pub fn new(config: &CacheConfig) -> Self {
		Self {
			entries: Mutex::new(LruCache::new(config.capacity)),
			ttl: config.ttl,
		}
	}

	/// Records a computed value; returns the key evicted to make room, if any.
	pub fn insert(&self, key: CacheKey, value: Value) -> Option<CacheKey> {
		let evicted = self
			.entries
			.lock()
			.push(key.clone(), Stored { value, stored_at: Instant::now() });
		match evicted {
			// push returns the displaced entry; same-key replacement is not
			// an eviction.
			Some((old_key, _)) if old_key != key => Some(old_key),
			_ => None,
		}
	}

	/// Looks up a key, promoting it to most-recently-used when fresh.
	pub fn lookup(&self, key: &CacheKey) -> StoreLookup {
		let mut entries = self.entries.lock();
		let expired = match entries.get(key) {
			None => return StoreLookup::Absent,
			Some(stored) => stored.stored_at.elapsed() > self.ttl,
		};
		if expired {
			entries.pop(key);
			return StoreLookup::Expired;
		}
		entries
			.get(key)
			.map_or(StoreLookup::Absent, |stored| StoreLookup::Fresh(stored.value.clone()))
	}

	/// Evicts one key. Returns whether anything was stored.
	pub fn remove(&self, key: &CacheKey) -> bool {
		self.entries.lock().pop(key).is_some()
	}
}

//! Cache entries, keys, and the published index.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RuntimeError;

/// Cache key: `{definition-name}:{stable-hash-of-input}`.
///
/// Same definition plus structurally-equal input always yields the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
	/// Builds a key from a definition name and the input's stable hash.
	pub(crate) fn new(name: &str, hashed_input: &str) -> Self {
		Self(format!("{name}:{hashed_input}"))
	}

	/// Returns the key's string form.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Lifecycle phase of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	/// Never fetched (or invalidated since).
	Initial,
	/// A computation is in flight.
	Loading,
	/// The last computation produced a value.
	Success,
	/// The last computation failed; terminal until the caller retries.
	Failure,
}

/// Wire-stable error representation stored inside entries.
///
/// Domain payloads stay in the shape the codec encoded them to, so callers
/// can round-trip them back into their typed error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ErrorRepr {
	/// The resource's own failure, codec-encoded.
	Domain {
		/// Encoded domain error payload.
		payload: Value,
	},
	/// Shape mismatch at a codec boundary.
	Codec {
		/// Codec failure description.
		message: String,
	},
	/// Engine invariant violated.
	Runtime {
		/// The structured runtime error.
		error: RuntimeError,
	},
}

/// Snapshot of one keyed resource's state.
///
/// Exactly one [`Phase`] holds at any observed instant; `data` is present
/// iff the phase is `Success` and `error` iff it is `Failure`. Entries are
/// mutated only by the engine and removed from the index on invalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
	/// The entry's cache key.
	pub key: CacheKey,
	/// Current lifecycle phase.
	pub phase: Phase,
	/// Computed value, present iff `phase` is `Success`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	/// Failure cause, present iff `phase` is `Failure`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorRepr>,
	/// Milliseconds since the Unix epoch of the last terminal transition.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<u64>,
}

impl CacheEntry {
	/// An entry that has never been fetched.
	pub fn initial(key: CacheKey) -> Self {
		Self { key, phase: Phase::Initial, data: None, error: None, updated_at: None }
	}

	/// An entry whose computation is in flight.
	pub fn loading(key: CacheKey) -> Self {
		Self { key, phase: Phase::Loading, data: None, error: None, updated_at: None }
	}

	/// A successfully computed entry.
	pub fn success(key: CacheKey, data: Value, updated_at: u64) -> Self {
		Self { key, phase: Phase::Success, data: Some(data), error: None, updated_at: Some(updated_at) }
	}

	/// A failed entry.
	pub fn failure(key: CacheKey, error: ErrorRepr, updated_at: u64) -> Self {
		Self { key, phase: Phase::Failure, data: None, error: Some(error), updated_at: Some(updated_at) }
	}
}

/// The snapshot index published to the render layer.
pub type CacheIndex = HashMap<CacheKey, CacheEntry, FxBuildHasher>;

/// Milliseconds since the Unix epoch, saturating at zero for skewed clocks.
pub(crate) fn now_millis() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_millis() as u64)
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn entry_constructors_uphold_phase_exclusivity() {
		let key = CacheKey::new("user", "h");
		let initial = CacheEntry::initial(key.clone());
		assert_eq!(initial.phase, Phase::Initial);
		assert!(initial.data.is_none() && initial.error.is_none());

		let success = CacheEntry::success(key.clone(), json!(1), 10);
		assert_eq!(success.phase, Phase::Success);
		assert!(success.data.is_some() && success.error.is_none());

		let failure = CacheEntry::failure(key, ErrorRepr::Codec { message: "x".into() }, 11);
		assert_eq!(failure.phase, Phase::Failure);
		assert!(failure.data.is_none() && failure.error.is_some());
	}

	#[test]
	fn entry_serde_round_trips() {
		let entry = CacheEntry::success(CacheKey::new("user", "abc"), json!({"id": 1}), 42);
		let encoded = serde_json::to_string(&entry).unwrap();
		let decoded: CacheEntry = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded, entry);
	}

	#[test]
	fn key_combines_name_and_hash() {
		assert_eq!(CacheKey::new("user", "{\"id\":1}").as_str(), "user:{\"id\":1}");
	}
}

//! Fire-and-forget lifecycle telemetry.
//!
//! The sink must never block or fail the operation that emits; sinks that
//! need buffering or IO should hand off internally.

use crate::entry::CacheKey;

/// Lifecycle events emitted per cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
	/// A computation started for this key (coalesced joiners do not emit).
	Start {
		/// The key being computed.
		key: CacheKey,
	},
	/// The computation produced a value.
	Success {
		/// The computed key.
		key: CacheKey,
	},
	/// The computation failed.
	Failure {
		/// The failed key.
		key: CacheKey,
	},
	/// The key was explicitly invalidated.
	Invalidate {
		/// The invalidated key.
		key: CacheKey,
	},
}

/// Receives cache lifecycle events.
pub trait TelemetrySink: Send + Sync + 'static {
	/// Accepts one event. Infallible and non-blocking.
	fn emit(&self, event: CacheEvent);
}

/// Default sink forwarding events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
	fn emit(&self, event: CacheEvent) {
		match event {
			CacheEvent::Start { key } => tracing::debug!(key = %key, "cache.fetch.start"),
			CacheEvent::Success { key } => tracing::debug!(key = %key, "cache.fetch.success"),
			CacheEvent::Failure { key } => tracing::debug!(key = %key, "cache.fetch.failure"),
			CacheEvent::Invalidate { key } => tracing::debug!(key = %key, "cache.invalidate"),
		}
	}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
	fn emit(&self, _event: CacheEvent) {}
}

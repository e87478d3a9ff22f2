//! Fire-and-forget navigation telemetry.
//!
//! Same contract as the cache's sink: infallible, non-blocking, one event
//! per lifecycle transition.

/// Lifecycle events emitted per navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
	/// A navigation attempt started.
	Start {
		/// Target href.
		href: String,
	},
	/// Every batch completed.
	Success {
		/// Target href.
		href: String,
	},
	/// Planning or a loader failed.
	Failure {
		/// Target href.
		href: String,
	},
	/// The attempt was superseded or explicitly cancelled.
	Cancel {
		/// Target href.
		href: String,
	},
}

/// Receives navigation lifecycle events.
pub trait TelemetrySink: Send + Sync + 'static {
	/// Accepts one event. Infallible and non-blocking.
	fn emit(&self, event: NavEvent);
}

/// Default sink forwarding events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
	fn emit(&self, event: NavEvent) {
		match event {
			NavEvent::Start { href } => tracing::debug!(href = %href, "router.navigate.start"),
			NavEvent::Success { href } => tracing::debug!(href = %href, "router.navigate.success"),
			NavEvent::Failure { href } => tracing::debug!(href = %href, "router.navigate.failure"),
			NavEvent::Cancel { href } => tracing::debug!(href = %href, "router.navigate.cancel"),
		}
	}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
	fn emit(&self, _event: NavEvent) {}
}

//! Error taxonomy for planning and navigation.
//!
//! Planning errors are internal-consistency failures (the loader graph
//! itself is malformed); loader errors are the loader's own domain
//! failures. Cancellation is a distinct terminal outcome, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A loader's own failure, preserved for callers to pattern-match.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct LoaderError {
	/// Human-readable description.
	pub message: String,
	/// Structured payload for callers that need more than a message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<Value>,
}

impl LoaderError {
	/// Creates a loader error from any message source.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), detail: None }
	}

	/// Attaches a structured payload.
	pub fn with_detail(mut self, detail: Value) -> Self {
		self.detail = Some(detail);
		self
	}
}

/// Fatal planning errors. Planning never guesses a depth.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
	/// The dependency graph contains a cycle through this loader.
	#[error("cyclic loader dependency through {name}")]
	CyclicDependency {
		/// A loader on the cycle.
		name: &'static str,
	},
	/// A loader names a dependency absent from the route's loader set.
	#[error("loader {loader} depends on unknown loader {missing}")]
	MissingDependency {
		/// The loader declaring the dependency.
		loader: &'static str,
		/// The name that could not be resolved.
		missing: &'static str,
	},
}

/// Navigation-level failures, attributed to their source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
	/// The loader graph could not be planned.
	#[error(transparent)]
	Plan(#[from] PlanError),
	/// A specific loader failed; remaining batches were aborted.
	#[error("loader {name} failed: {error}")]
	Loader {
		/// The failing loader's name.
		name: &'static str,
		/// Its failure.
		error: LoaderError,
	},
	/// No registered route matched the target pathname.
	#[error("no route matched {pathname}")]
	NoRouteMatched {
		/// The pathname that failed to match.
		pathname: String,
	},
	/// A loader task was lost by the executor (it panicked).
	#[error("loader task failed: {message}")]
	LoaderPanicked {
		/// The executor's description of the loss.
		message: String,
	},
	/// `revalidate` was called before any navigation happened.
	#[error("nothing to revalidate: no navigation has started")]
	NothingToRevalidate,
}

//! Error taxonomy for the cache engine.
//!
//! Three classes are reported distinctly: the resource's own typed domain
//! error, shape mismatches at a codec boundary, and internal invariant
//! violations. Cancellation is not an error here; it belongs to the
//! navigation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input/output shape mismatch at a decode or encode boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("codec error: {message}")]
pub struct CodecError {
	/// Human-readable description from the underlying codec.
	pub message: String,
}

impl CodecError {
	/// Creates a codec error from any message source.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Internal-consistency failures, reported distinctly from domain errors.
///
/// These indicate a bug in engine wiring, not a failing resource.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuntimeError {
	/// A fetch was issued for a definition never registered with the engine.
	#[error("no executor registered for resource {name}")]
	MissingExecutor {
		/// Name of the unregistered definition.
		name: String,
	},
	/// The computation leading a coalesced fetch disappeared without
	/// publishing an outcome.
	#[error("in-flight computation for {key} vanished before publishing")]
	FlightVanished {
		/// Key whose leader vanished.
		key: String,
	},
}

/// Failure surface of one fetch, preserving the domain error's shape.
#[derive(Debug, Error)]
pub enum FetchError<E> {
	/// The resource's own typed failure, for the caller to pattern-match.
	#[error("resource reported a domain error")]
	Domain(E),
	/// Shape mismatch while decoding input or output.
	#[error(transparent)]
	Codec(#[from] CodecError),
	/// Engine invariant violated.
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}

//! Injected boundary codec.
//!
//! The engine validates nothing itself: every value crossing its edge goes
//! through this collaborator. Any typed-schema validator satisfies the
//! trait; [`JsonCodec`] is the serde_json-backed default.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::CodecError;

/// Decodes and encodes values at the engine boundary.
pub trait Codec: Send + Sync + 'static {
	/// Validates and decodes an erased value into a typed one.
	fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, CodecError>;

	/// Encodes a typed value into its erased form.
	fn encode<T: Serialize>(&self, value: &T) -> Result<Value, CodecError>;
}

/// Default codec backed by serde_json.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
	fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, CodecError> {
		serde_json::from_value(value).map_err(|err| CodecError::new(err.to_string()))
	}

	fn encode<T: Serialize>(&self, value: &T) -> Result<Value, CodecError> {
		serde_json::to_value(value).map_err(|err| CodecError::new(err.to_string()))
	}
}

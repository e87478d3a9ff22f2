//! Resource definitions.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strand_primitives::BoxFutureStatic;

use crate::codec::Codec;
use crate::error::CodecError;

pub(crate) type Runner<I, A, E> = Arc<dyn Fn(I) -> BoxFutureStatic<Result<A, E>> + Send + Sync>;

/// A named class of fetchable resources.
///
/// Immutable; created once at startup and registered with the engine. The
/// runner computes one resource from its input; `key_of` optionally narrows
/// which part of the input addresses the cache.
pub struct ResourceDef<I, A, E> {
	name: &'static str,
	runner: Runner<I, A, E>,
	key_of: Option<Arc<dyn Fn(&I) -> Value + Send + Sync>>,
}

impl<I, A, E> Clone for ResourceDef<I, A, E> {
	fn clone(&self) -> Self {
		Self {
			name: self.name,
			runner: self.runner.clone(),
			key_of: self.key_of.clone(),
		}
	}
}

impl<I, A, E> ResourceDef<I, A, E> {
	/// Defines a resource with the given name and async runner.
	pub fn new<F, Fut>(name: &'static str, runner: F) -> Self
	where
		F: Fn(I) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<A, E>> + Send + 'static,
	{
		Self {
			name,
			runner: Arc::new(move |input| Box::pin(runner(input))),
			key_of: None,
		}
	}

	/// Overrides the cache-addressing projection of the input.
	///
	/// Without this, the whole input addresses the cache.
	pub fn with_key_of(mut self, key_of: impl Fn(&I) -> Value + Send + Sync + 'static) -> Self {
		self.key_of = Some(Arc::new(key_of));
		self
	}

	/// The definition's name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub(crate) fn runner_handle(&self) -> Runner<I, A, E> {
		self.runner.clone()
	}

	/// The value the cache key is derived from for `input`.
	pub(crate) fn key_source<C: Codec>(&self, input: &I, codec: &C) -> Result<Value, CodecError>
	where
		I: Serialize,
	{
		match &self.key_of {
			Some(key_of) => Ok(key_of(input)),
			None => codec.encode(input),
		}
	}
}

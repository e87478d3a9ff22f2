//! Loader definitions and their execution context.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde_json::Value;
use strand_primitives::BoxFutureStatic;
use tokio_util::sync::CancellationToken;

use crate::error::LoaderError;

/// Retry bounds applied by the scheduler before a failure is reported.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	/// Additional attempts after the first failure.
	pub max_retries: u32,
	/// Delay between attempts.
	pub backoff: Duration,
}

/// Context handed to a loader's `run`.
///
/// `dependency_results` holds only loaders from strictly earlier batches;
/// intra-batch siblings never observe each other. The token is the
/// navigation attempt's cancellation signal and should be honored at every
/// suspension point a loader controls.
pub struct LoaderCtx {
	/// Resolved upstream loader values, by loader name.
	pub dependency_results: FxHashMap<&'static str, Arc<Value>>,
	/// Cancellation signal for the owning navigation attempt.
	pub cancel: CancellationToken,
}

impl LoaderCtx {
	/// Looks up one upstream loader's value.
	pub fn dependency(&self, name: &str) -> Option<&Value> {
		self.dependency_results.get(name).map(Arc::as_ref)
	}
}

type LoaderRunner = Arc<dyn Fn(LoaderCtx) -> BoxFutureStatic<Result<Value, LoaderError>> + Send + Sync>;

/// A named loader attached to one route.
pub struct LoaderDef {
	name: &'static str,
	route_id: &'static str,
	depends_on: Vec<&'static str>,
	run: LoaderRunner,
	retry: Option<RetryPolicy>,
}

impl LoaderDef {
	/// Defines a loader for `route_id` with the given async runner.
	pub fn new<F, Fut>(name: &'static str, route_id: &'static str, run: F) -> Self
	where
		F: Fn(LoaderCtx) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Value, LoaderError>> + Send + 'static,
	{
		Self {
			name,
			route_id,
			depends_on: Vec::new(),
			run: Arc::new(move |ctx| Box::pin(run(ctx))),
			retry: None,
		}
	}

	/// Declares upstream loaders this one needs resolved first.
	pub fn depends_on(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
		self.depends_on.extend(names);
		self
	}

	/// Attaches a retry policy, exhausted before failure is reported.
	pub fn retry(mut self, policy: RetryPolicy) -> Self {
		self.retry = Some(policy);
		self
	}

	/// The loader's name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The route this loader belongs to.
	pub fn route_id(&self) -> &'static str {
		self.route_id
	}

	/// Declared upstream dependencies.
	pub fn dependencies(&self) -> &[&'static str] {
		&self.depends_on
	}

	pub(crate) fn retry_policy(&self) -> Option<RetryPolicy> {
		self.retry
	}

	pub(crate) fn run(&self, ctx: LoaderCtx) -> BoxFutureStatic<Result<Value, LoaderError>> {
		(self.run)(ctx)
	}
}

impl std::fmt::Debug for LoaderDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoaderDef")
			.field("name", &self.name)
			.field("route_id", &self.route_id)
			.field("depends_on", &self.depends_on)
			.field("retry", &self.retry)
			.finish_non_exhaustive()
	}
}

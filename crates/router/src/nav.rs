//! Navigation scheduling and the published snapshot.
//!
//! At most one navigation attempt is live at a time. Each `navigate` call
//! takes a fresh monotonic attempt id, cancels and drains the previous
//! attempt, then runs its loader batches. Every snapshot write is guarded
//! by the attempt id, so a superseded attempt's late results can never
//! overwrite a newer attempt's state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use strand_primitives::{AtomicCell, RenderBridge};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{LoaderError, NavError};
use crate::loader::{LoaderCtx, LoaderDef, RetryPolicy};
use crate::plan;
use crate::route::{self, Route, RouteMatch};
use crate::telemetry::{NavEvent, TelemetrySink, TracingSink};

/// Lifecycle of one loader within the current navigation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderState {
	/// Scheduled but not yet finished.
	Pending,
	/// Finished with a value.
	Success(Arc<Value>),
	/// Finished with the loader's own failure.
	Failure(LoaderError),
}

/// Overall status of the published navigation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
	/// No navigation has happened yet.
	Idle,
	/// The current attempt is still running loaders.
	Loading,
	/// Every batch of the current attempt completed.
	Success,
	/// Planning or a loader failed; remaining work was abandoned.
	Failure,
}

/// The router's single published value.
///
/// Always internally consistent: pathname, search text, match, and the
/// loader map all describe the same attempt. Readers never observe fields
/// from two different navigations mixed together.
#[derive(Debug, Clone)]
pub struct NavigationSnapshot {
	/// Pathname portion of the target href.
	pub pathname: String,
	/// Search text after the first `?`, without the `?` itself.
	pub search_text: String,
	/// The full href as passed to `navigate`.
	pub href: String,
	/// Overall attempt status.
	pub status: NavStatus,
	/// The matched route and its captured params, if any matched.
	pub matched: Option<RouteMatch>,
	/// Per-loader state for the matched route's loaders.
	pub loaders: FxHashMap<&'static str, LoaderState>,
	/// Terminal failure, when `status` is [`NavStatus::Failure`].
	pub error: Option<NavError>,
	/// Monotonic id of the attempt that published this snapshot.
	pub attempt: u64,
}

impl NavigationSnapshot {
	fn idle() -> Self {
		Self {
			pathname: String::new(),
			search_text: String::new(),
			href: String::new(),
			status: NavStatus::Idle,
			matched: None,
			loaders: FxHashMap::default(),
			error: None,
			attempt: 0,
		}
	}

	/// Looks up one loader's state by name.
	pub fn loader(&self, name: &str) -> Option<&LoaderState> {
		self.loaders.get(name)
	}
}

impl Default for NavigationSnapshot {
	fn default() -> Self {
		Self::idle()
	}
}

/// How one `navigate` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
	/// Every batch completed; the snapshot is terminal-success.
	Success,
	/// The attempt failed; the snapshot is terminal-failure.
	Failure(NavError),
	/// A newer navigation superseded this one. Not an error.
	Cancelled,
}

struct ActiveAttempt {
	id: u64,
	cancel: CancellationToken,
	done: watch::Receiver<Option<NavOutcome>>,
}

struct RouterShared {
	routes: Vec<Route>,
	loaders: Vec<Arc<LoaderDef>>,
	snapshot: AtomicCell<NavigationSnapshot>,
	attempts: AtomicU64,
	active: Mutex<Option<ActiveAttempt>>,
	telemetry: Arc<dyn TelemetrySink>,
}

/// Builds a [`Router`] from routes and loader definitions.
pub struct RouterBuilder {
	routes: Vec<Route>,
	loaders: Vec<Arc<LoaderDef>>,
	telemetry: Arc<dyn TelemetrySink>,
}

impl RouterBuilder {
	/// Registers a route. First registered match wins.
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	/// Registers a loader for one of the routes.
	pub fn loader(mut self, loader: LoaderDef) -> Self {
		self.loaders.push(Arc::new(loader));
		self
	}

	/// Replaces the default tracing sink.
	pub fn telemetry(mut self, sink: impl TelemetrySink) -> Self {
		self.telemetry = Arc::new(sink);
		self
	}

	/// Finishes construction.
	pub fn build(self) -> Router {
		Router {
			shared: Arc::new(RouterShared {
				routes: self.routes,
				loaders: self.loaders,
				snapshot: AtomicCell::new(NavigationSnapshot::idle()),
				attempts: AtomicU64::new(0),
				active: Mutex::new(None),
				telemetry: self.telemetry,
			}),
		}
	}
}

/// Schedules loader batches per navigation and publishes one snapshot.
///
/// Cloning yields another handle to the same router; all clones observe
/// the same snapshot and the same supersession order.
pub struct Router {
	shared: Arc<RouterShared>,
}

impl Clone for Router {
	fn clone(&self) -> Self {
		Self { shared: self.shared.clone() }
	}
}

impl Router {
	/// Starts building a router.
	pub fn builder() -> RouterBuilder {
		RouterBuilder { routes: Vec::new(), loaders: Vec::new(), telemetry: Arc::new(TracingSink) }
	}

	/// Navigates to `href`, superseding any in-flight attempt.
	///
	/// The previous attempt is cancelled and fully drained before this
	/// one publishes anything, so the snapshot transitions directly from
	/// the old navigation to this one's loading state.
	pub async fn navigate(&self, href: &str) -> NavOutcome {
		let shared = &self.shared;
		let id = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;
		shared.telemetry.emit(NavEvent::Start { href: href.to_string() });

		let cancel = CancellationToken::new();
		let (done_tx, done_rx) = watch::channel(None);
		// Take over the active slot and register in one critical section,
		// so two racing attempts can never both find the slot unopposed.
		// Whichever attempt is displaced here gets cancelled and drained.
		let previous = {
			let mut active = shared.active.lock();
			if active.as_ref().is_some_and(|existing| existing.id > id) {
				drop(active);
				shared.telemetry.emit(NavEvent::Cancel { href: href.to_string() });
				return NavOutcome::Cancelled;
			}
			active.replace(ActiveAttempt { id, cancel: cancel.clone(), done: done_rx.clone() })
		};
		if let Some(previous) = previous {
			previous.cancel.cancel();
			wait_for_outcome(previous.done).await;
		}

		let (pathname, search_text) = route::split_href(href);
		let matched = match route::match_route(&shared.routes, pathname) {
			Some(matched) => matched,
			None => {
				let error = NavError::NoRouteMatched { pathname: pathname.to_string() };
				let snapshot = NavigationSnapshot {
					pathname: pathname.to_string(),
					search_text: search_text.to_string(),
					href: href.to_string(),
					status: NavStatus::Failure,
					matched: None,
					loaders: FxHashMap::default(),
					error: Some(error.clone()),
					attempt: id,
				};
				let outcome = if claim(shared, id, snapshot) {
					shared.telemetry.emit(NavEvent::Failure { href: href.to_string() });
					NavOutcome::Failure(error)
				} else {
					shared.telemetry.emit(NavEvent::Cancel { href: href.to_string() });
					NavOutcome::Cancelled
				};
				self.release(id);
				return outcome;
			}
		};

		let route_loaders: Vec<Arc<LoaderDef>> = shared
			.loaders
			.iter()
			.filter(|loader| loader.route_id() == matched.route_id)
			.cloned()
			.collect();
		let loading = NavigationSnapshot {
			pathname: pathname.to_string(),
			search_text: search_text.to_string(),
			href: href.to_string(),
			status: NavStatus::Loading,
			matched: Some(matched),
			loaders: route_loaders
				.iter()
				.map(|loader| (loader.name(), LoaderState::Pending))
				.collect(),
			error: None,
			attempt: id,
		};
		if !claim(shared, id, loading) {
			shared.telemetry.emit(NavEvent::Cancel { href: href.to_string() });
			self.release(id);
			return NavOutcome::Cancelled;
		}

		let task_shared = shared.clone();
		let task_href = href.to_string();
		tokio::spawn(async move {
			let outcome = run_attempt(&task_shared, id, &task_href, route_loaders, cancel).await;
			let _ = done_tx.send(Some(outcome));
		});
		let outcome = wait_for_outcome(done_rx).await;
		self.release(id);
		outcome
	}

	/// Clears the active slot if attempt `id` still owns it.
	fn release(&self, id: u64) {
		let mut active = self.shared.active.lock();
		if active.as_ref().is_some_and(|attempt| attempt.id == id) {
			*active = None;
		}
	}

	/// Re-runs the current navigation's loaders from scratch.
	pub async fn revalidate(&self) -> NavOutcome {
		let href = {
			let current = self.shared.snapshot.get();
			if current.status == NavStatus::Idle {
				return NavOutcome::Failure(NavError::NothingToRevalidate);
			}
			current.href.clone()
		};
		self.navigate(&href).await
	}

	/// Returns the last fully-published snapshot.
	pub fn get_snapshot(&self) -> Arc<NavigationSnapshot> {
		self.shared.snapshot.get()
	}

	/// Pull-based view over the snapshot for synchronous consumers.
	pub fn snapshots(&self) -> RenderBridge<NavigationSnapshot> {
		RenderBridge::new(self.shared.snapshot.clone())
	}
}

/// Publishes `snapshot` unless a newer attempt already published.
fn claim(shared: &RouterShared, id: u64, snapshot: NavigationSnapshot) -> bool {
	shared
		.snapshot
		.try_update(|current| (current.attempt < id).then(|| snapshot.clone()))
		.is_some()
}

/// Mutates the snapshot only while `id` is still the published attempt.
fn publish_if_current(
	shared: &RouterShared,
	id: u64,
	mutate: impl FnOnce(&mut NavigationSnapshot),
) {
	let mut mutate = Some(mutate);
	shared.snapshot.try_update(|current| {
		if current.attempt != id {
			return None;
		}
		let mut next = current.clone();
		if let Some(mutate) = mutate.take() {
			mutate(&mut next);
		}
		Some(next)
	});
}

fn publish_terminal(shared: &RouterShared, id: u64, status: NavStatus, error: Option<NavError>) {
	publish_if_current(shared, id, |snapshot| {
		snapshot.status = status;
		snapshot.error = error;
	});
}

async fn run_attempt(
	shared: &Arc<RouterShared>,
	id: u64,
	href: &str,
	loaders: Vec<Arc<LoaderDef>>,
	cancel: CancellationToken,
) -> NavOutcome {
	let plan = match plan::plan_batches(&loaders) {
		Ok(plan) => plan,
		Err(error) => {
			let error = NavError::from(error);
			publish_terminal(shared, id, NavStatus::Failure, Some(error.clone()));
			shared.telemetry.emit(NavEvent::Failure { href: href.to_string() });
			return NavOutcome::Failure(error);
		}
	};

	let mut results: FxHashMap<&'static str, Arc<Value>> = FxHashMap::default();
	for batch in plan.batches() {
		let mut tasks: JoinSet<(&'static str, Result<Value, LoaderError>)> = JoinSet::new();
		for loader in batch {
			let loader = loader.clone();
			let dependency_results = results.clone();
			let token = cancel.child_token();
			tasks.spawn(async move {
				let name = loader.name();
				let outcome = run_loader(&loader, dependency_results, token).await;
				(name, outcome)
			});
		}

		// Merged only after the whole batch succeeds: siblings never
		// observe each other's values.
		let mut batch_results: FxHashMap<&'static str, Arc<Value>> = FxHashMap::default();
		loop {
			let joined = tokio::select! {
				() = cancel.cancelled() => {
					tasks.abort_all();
					shared.telemetry.emit(NavEvent::Cancel { href: href.to_string() });
					return NavOutcome::Cancelled;
				}
				joined = tasks.join_next() => joined,
			};
			let Some(joined) = joined else { break };
			match joined {
				Ok((name, Ok(value))) => {
					let value = Arc::new(value);
					batch_results.insert(name, value.clone());
					publish_if_current(shared, id, |snapshot| {
						snapshot.loaders.insert(name, LoaderState::Success(value));
					});
				}
				Ok((name, Err(error))) => {
					// One failure abandons the attempt: siblings are
					// aborted, deeper batches never start.
					tasks.abort_all();
					let nav_error = NavError::Loader { name, error: error.clone() };
					publish_if_current(shared, id, |snapshot| {
						snapshot.loaders.insert(name, LoaderState::Failure(error));
						snapshot.status = NavStatus::Failure;
						snapshot.error = Some(nav_error.clone());
					});
					shared.telemetry.emit(NavEvent::Failure { href: href.to_string() });
					return NavOutcome::Failure(nav_error);
				}
				Err(join_error) if join_error.is_cancelled() => {}
				Err(join_error) => {
					tasks.abort_all();
					let error = NavError::LoaderPanicked { message: join_error.to_string() };
					publish_terminal(shared, id, NavStatus::Failure, Some(error.clone()));
					shared.telemetry.emit(NavEvent::Failure { href: href.to_string() });
					return NavOutcome::Failure(error);
				}
			}
		}
		results.extend(batch_results);
	}

	publish_terminal(shared, id, NavStatus::Success, None);
	shared.telemetry.emit(NavEvent::Success { href: href.to_string() });
	NavOutcome::Success
}

/// Runs one loader, honoring its retry policy before reporting failure.
async fn run_loader(
	loader: &LoaderDef,
	results: FxHashMap<&'static str, Arc<Value>>,
	cancel: CancellationToken,
) -> Result<Value, LoaderError> {
	let policy = loader
		.retry_policy()
		.unwrap_or(RetryPolicy { max_retries: 0, backoff: Duration::ZERO });
	let mut tries_left = policy.max_retries;
	loop {
		let ctx = LoaderCtx { dependency_results: results.clone(), cancel: cancel.clone() };
		match loader.run(ctx).await {
			Ok(value) => return Ok(value),
			Err(error) if tries_left > 0 => {
				tries_left -= 1;
				tracing::debug!(loader = loader.name(), error = %error, "router.loader.retry");
				if !policy.backoff.is_zero() {
					tokio::select! {
						() = cancel.cancelled() => return Err(error),
						() = tokio::time::sleep(policy.backoff) => {}
					}
				}
			}
			Err(error) => return Err(error),
		}
	}
}

/// Awaits a spawned attempt's terminal outcome.
async fn wait_for_outcome(mut done: watch::Receiver<Option<NavOutcome>>) -> NavOutcome {
	loop {
		let settled = done.borrow().clone();
		if let Some(outcome) = settled {
			return outcome;
		}
		if done.changed().await.is_err() {
			// The attempt task dropped its sender without settling.
			return NavOutcome::Cancelled;
		}
	}
}

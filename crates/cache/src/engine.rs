//! The cache & dedup engine.
//!
//! One engine owns an explicit registry of resource runners (supplied at
//! construction), a bounded value store, and the published snapshot index.
//! Concurrent fetches for one key coalesce into a single computation: the
//! first caller becomes the leader and spawns the work, later callers join
//! the leader's broadcast outcome. All observers of a key see the same
//! result and the same phase transitions in the same order, because every
//! transition is one atomic publish of the index cell.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use strand_primitives::{AtomicCell, BoxFutureStatic, RenderBridge, stable_hash};
use tokio::sync::watch;

use crate::codec::{Codec, JsonCodec};
use crate::def::ResourceDef;
use crate::entry::{CacheEntry, CacheIndex, CacheKey, ErrorRepr, Phase, now_millis};
use crate::error::{CodecError, FetchError, RuntimeError};
use crate::store::{BoundedStore, CacheConfig, StoreLookup};
use crate::telemetry::{CacheEvent, TelemetrySink, TracingSink};

type ErasedRunner = Arc<dyn Fn(Value) -> BoxFutureStatic<Result<Value, ErrorRepr>> + Send + Sync>;
type FlightOutcome = Result<Value, ErrorRepr>;
type FlightReceiver = watch::Receiver<Option<FlightOutcome>>;

/// Options for a single fetch call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
	/// Bypasses a still-valid stored value and forces recomputation.
	///
	/// A forced fetch still coalesces with an in-flight computation for the
	/// same key: the at-most-one-outstanding-computation guarantee is never
	/// bypassed, only the freshness check against the bounded store is.
	pub force_refresh: bool,
}

impl FetchOptions {
	/// Options with `force_refresh` set.
	pub fn refresh() -> Self {
		Self { force_refresh: true }
	}
}

/// Serializable snapshot of the index for dehydration to a host wire format.
///
/// `phase`, `data`, and `updated_at` round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DehydratedState {
	/// Entries sorted by key for a deterministic wire form.
	pub entries: Vec<CacheEntry>,
}

struct EngineShared<C> {
	codec: C,
	runners: FxHashMap<&'static str, ErasedRunner>,
	store: BoundedStore,
	index: AtomicCell<CacheIndex>,
	in_flight: Mutex<FxHashMap<CacheKey, FlightReceiver>>,
	telemetry: Arc<dyn TelemetrySink>,
}

impl<C> EngineShared<C> {
	fn publish_entry(&self, entry: CacheEntry) {
		self.index.update(|index| {
			let mut next = index.clone();
			next.insert(entry.key.clone(), entry.clone());
			next
		});
	}

	fn remove_entry(&self, key: &CacheKey) {
		self.index.try_update(|index| {
			if !index.contains_key(key) {
				return None;
			}
			let mut next = index.clone();
			next.remove(key);
			Some(next)
		});
	}

	fn record_failure(&self, key: &CacheKey, error: ErrorRepr) {
		self.publish_entry(CacheEntry::failure(key.clone(), error, now_millis()));
		self.telemetry.emit(CacheEvent::Failure { key: key.clone() });
	}
}

/// Builder for a [`CacheEngine`]; runners are registered here, never later.
pub struct CacheEngineBuilder<C: Codec = JsonCodec> {
	config: CacheConfig,
	codec: C,
	runners: FxHashMap<&'static str, ErasedRunner>,
	telemetry: Arc<dyn TelemetrySink>,
}

impl<C: Codec> CacheEngineBuilder<C> {
	/// Sets the store capacity and TTL bounds.
	pub fn config(mut self, config: CacheConfig) -> Self {
		self.config = config;
		self
	}

	/// Replaces the default tracing telemetry sink.
	pub fn telemetry(mut self, sink: impl TelemetrySink) -> Self {
		self.telemetry = Arc::new(sink);
		self
	}

	/// Registers a definition's runner, erased behind the codec boundary.
	///
	/// Fetching a definition that was never registered is a runtime error.
	pub fn register<I, A, E>(mut self, def: &ResourceDef<I, A, E>) -> Self
	where
		C: Clone,
		I: DeserializeOwned + Send + 'static,
		A: Serialize + Send + 'static,
		E: Serialize + Send + 'static,
	{
		let codec = self.codec.clone();
		let runner = def.runner_handle();
		let erased: ErasedRunner = Arc::new(move |input: Value| {
			let codec = codec.clone();
			let runner = runner.clone();
			Box::pin(async move {
				let input: I = codec.decode(input).map_err(ErrorRepr::from_codec)?;
				match runner(input).await {
					Ok(value) => codec.encode(&value).map_err(ErrorRepr::from_codec),
					Err(err) => {
						let payload = codec.encode(&err).map_err(ErrorRepr::from_codec)?;
						Err(ErrorRepr::Domain { payload })
					}
				}
			})
		});
		self.runners.insert(def.name(), erased);
		self
	}

	/// Finishes the builder.
	pub fn build(self) -> CacheEngine<C> {
		CacheEngine {
			shared: Arc::new(EngineShared {
				codec: self.codec,
				runners: self.runners,
				store: BoundedStore::new(&self.config),
				index: AtomicCell::new(CacheIndex::default()),
				in_flight: Mutex::new(FxHashMap::default()),
				telemetry: self.telemetry,
			}),
		}
	}
}

impl ErrorRepr {
	fn from_codec(err: CodecError) -> Self {
		Self::Codec { message: err.message }
	}
}

/// Client-side cache with request coalescing, bounded storage, and a
/// tear-free published index.
pub struct CacheEngine<C: Codec = JsonCodec> {
	shared: Arc<EngineShared<C>>,
}

impl<C: Codec> Clone for CacheEngine<C> {
	fn clone(&self) -> Self {
		Self { shared: self.shared.clone() }
	}
}

impl CacheEngine<JsonCodec> {
	/// Starts a builder with the serde_json codec.
	pub fn builder() -> CacheEngineBuilder<JsonCodec> {
		Self::builder_with_codec(JsonCodec)
	}
}

impl<C: Codec> CacheEngine<C> {
	/// Starts a builder with an injected codec.
	pub fn builder_with_codec(codec: C) -> CacheEngineBuilder<C> {
		CacheEngineBuilder {
			config: CacheConfig::default(),
			codec,
			runners: FxHashMap::default(),
			telemetry: Arc::new(TracingSink),
		}
	}

	/// Resolves a resource, computing it at most once per key at a time.
	pub async fn fetch<I, A, E>(
		&self,
		def: &ResourceDef<I, A, E>,
		input: &I,
		options: FetchOptions,
	) -> Result<A, FetchError<E>>
	where
		I: Serialize,
		A: DeserializeOwned,
		E: DeserializeOwned,
	{
		let value = self.resolve(def, input, options).await?;
		self.shared.codec.decode(value).map_err(FetchError::Codec)
	}

	/// Warms the cache without handing the value back.
	pub async fn prefetch<I, A, E>(
		&self,
		def: &ResourceDef<I, A, E>,
		input: &I,
	) -> Result<(), FetchError<E>>
	where
		I: Serialize,
		E: DeserializeOwned,
	{
		self.resolve(def, input, FetchOptions::default()).await.map(drop)
	}

	/// Evicts the stored value and removes the index entry.
	///
	/// A subsequent snapshot reports `Initial`; a subsequent fetch
	/// recomputes from scratch. An in-flight computation for the key is
	/// unaffected and repopulates the entry when it completes.
	pub async fn invalidate<I, A, E>(
		&self,
		def: &ResourceDef<I, A, E>,
		input: &I,
	) -> Result<(), FetchError<E>>
	where
		I: Serialize,
	{
		let key = self.key_for(def, input).map_err(FetchError::Codec)?;
		self.shared.store.remove(&key);
		self.shared.remove_entry(&key);
		self.shared.telemetry.emit(CacheEvent::Invalidate { key });
		Ok(())
	}

	/// Reads the current entry without triggering computation.
	///
	/// Synchronous and infallible; absent entries report `Initial`.
	pub fn get_snapshot<I, A, E>(&self, def: &ResourceDef<I, A, E>, input: &I) -> CacheEntry
	where
		I: Serialize,
	{
		let Ok(key) = self.key_for(def, input) else {
			return CacheEntry::initial(CacheKey::new(def.name(), "<unencodable>"));
		};
		self.shared
			.index
			.get()
			.get(&key)
			.cloned()
			.unwrap_or_else(|| CacheEntry::initial(key))
	}

	/// The continuously-published index, for the render layer.
	pub fn snapshots(&self) -> RenderBridge<CacheIndex> {
		RenderBridge::new(self.shared.index.clone())
	}

	/// Serializes the current index for the hydration collaborator.
	pub fn dehydrate(&self) -> DehydratedState {
		let index = self.shared.index.get();
		let mut entries: Vec<CacheEntry> = index.values().cloned().collect();
		entries.sort_by(|a, b| a.key.cmp(&b.key));
		DehydratedState { entries }
	}

	/// Restores a dehydrated index verbatim and seeds the value store.
	pub fn hydrate(&self, state: DehydratedState) {
		for entry in &state.entries {
			if entry.phase == Phase::Success {
				if let Some(data) = &entry.data {
					self.shared.store.insert(entry.key.clone(), data.clone());
				}
			}
		}
		let index: CacheIndex = state
			.entries
			.into_iter()
			.map(|entry| (entry.key.clone(), entry))
			.collect();
		self.shared.index.set(index);
	}

	fn key_for<I, A, E>(&self, def: &ResourceDef<I, A, E>, input: &I) -> Result<CacheKey, CodecError>
	where
		I: Serialize,
	{
		let source = def.key_source(input, &self.shared.codec)?;
		Ok(CacheKey::new(def.name(), &stable_hash(&source)))
	}

	async fn resolve<I, A, E>(
		&self,
		def: &ResourceDef<I, A, E>,
		input: &I,
		options: FetchOptions,
	) -> Result<Value, FetchError<E>>
	where
		I: Serialize,
		E: DeserializeOwned,
	{
		let key = self.key_for(def, input).map_err(FetchError::Codec)?;
		if !options.force_refresh {
			match self.shared.store.lookup(&key) {
				StoreLookup::Fresh(value) => {
					tracing::trace!(key = %key, "cache.fetch.hit");
					return Ok(value);
				}
				StoreLookup::Expired => {
					// The entry is no longer authoritative; its index
					// read-model entry goes with it.
					self.shared.remove_entry(&key);
				}
				StoreLookup::Absent => {}
			}
		}
		let Some(runner) = self.shared.runners.get(def.name()).cloned() else {
			let error = RuntimeError::MissingExecutor { name: def.name().to_string() };
			self.shared
				.record_failure(&key, ErrorRepr::Runtime { error: error.clone() });
			return Err(FetchError::Runtime(error));
		};
		let input_value = self.shared.codec.encode(input).map_err(FetchError::Codec)?;
		match self.join_or_lead(key, runner, input_value).await {
			Ok(value) => Ok(value),
			Err(repr) => Err(self.typed_error(repr)),
		}
	}

	async fn join_or_lead(
		&self,
		key: CacheKey,
		runner: ErasedRunner,
		input_value: Value,
	) -> FlightOutcome {
		enum Role {
			Leader(watch::Sender<Option<FlightOutcome>>),
			Joiner(FlightReceiver),
		}
		let role = {
			let mut in_flight = self.shared.in_flight.lock();
			match in_flight.get(&key) {
				Some(rx) => Role::Joiner(rx.clone()),
				None => {
					let (tx, rx) = watch::channel(None);
					in_flight.insert(key.clone(), rx);
					Role::Leader(tx)
				}
			}
		};
		match role {
			Role::Joiner(rx) => {
				tracing::trace!(key = %key, "cache.fetch.coalesced");
				await_outcome(&key, rx).await
			}
			Role::Leader(tx) => self.lead(key, runner, input_value, tx).await,
		}
	}

	/// Runs the computation for a key this caller now leads.
	///
	/// The work is spawned so it survives the leading caller being dropped
	/// mid-await; joiners would otherwise hang on a vanished flight.
	async fn lead(
		&self,
		key: CacheKey,
		runner: ErasedRunner,
		input_value: Value,
		tx: watch::Sender<Option<FlightOutcome>>,
	) -> FlightOutcome {
		self.shared.telemetry.emit(CacheEvent::Start { key: key.clone() });
		self.shared.publish_entry(CacheEntry::loading(key.clone()));

		let rx = tx.subscribe();
		let shared = self.shared.clone();
		let task_key = key.clone();
		tokio::spawn(async move {
			let outcome: FlightOutcome = runner(input_value).await;
			match &outcome {
				Ok(value) => {
					if let Some(evicted) = shared.store.insert(task_key.clone(), value.clone()) {
						tracing::trace!(key = %evicted, "cache.store.evict");
						shared.remove_entry(&evicted);
					}
					shared.publish_entry(CacheEntry::success(
						task_key.clone(),
						value.clone(),
						now_millis(),
					));
					shared.telemetry.emit(CacheEvent::Success { key: task_key.clone() });
				}
				Err(error) => {
					shared.record_failure(&task_key, error.clone());
				}
			}
			// Remove the flight before waking joiners so a fetch issued
			// after completion starts fresh instead of joining a dead one.
			shared.in_flight.lock().remove(&task_key);
			let _ = tx.send(Some(outcome));
		});

		await_outcome(&key, rx).await
	}

	fn typed_error<E: DeserializeOwned>(&self, repr: ErrorRepr) -> FetchError<E> {
		match repr {
			ErrorRepr::Domain { payload } => match self.shared.codec.decode::<E>(payload) {
				Ok(domain) => FetchError::Domain(domain),
				Err(codec) => FetchError::Codec(codec),
			},
			ErrorRepr::Codec { message } => FetchError::Codec(CodecError::new(message)),
			ErrorRepr::Runtime { error } => FetchError::Runtime(error),
		}
	}
}

async fn await_outcome(key: &CacheKey, mut rx: FlightReceiver) -> FlightOutcome {
	loop {
		let settled = rx.borrow().clone();
		if let Some(outcome) = settled {
			return outcome;
		}
		if rx.changed().await.is_err() {
			// The leader dropped without publishing: internal bug class.
			return Err(ErrorRepr::Runtime {
				error: RuntimeError::FlightVanished { key: key.to_string() },
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use std::num::NonZeroUsize;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::telemetry::NullSink;

	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct UserError {
		code: u32,
	}

	fn counting_def(calls: &Arc<AtomicUsize>) -> ResourceDef<u32, u32, UserError> {
		let calls = calls.clone();
		ResourceDef::new("user", move |id: u32| {
			let calls = calls.clone();
			async move {
				calls.fetch_add(1, Ordering::SeqCst);
				tokio::time::sleep(Duration::from_millis(10)).await;
				Ok(id * 2)
			}
		})
	}

	fn engine_for(def: &ResourceDef<u32, u32, UserError>, config: CacheConfig) -> CacheEngine {
		CacheEngine::builder()
			.config(config)
			.telemetry(NullSink)
			.register(def)
			.build()
	}

	fn small_config(capacity: usize, ttl: Duration) -> CacheConfig {
		CacheConfig {
			capacity: NonZeroUsize::new(capacity).unwrap(),
			ttl,
		}
	}

	#[tokio::test]
	async fn concurrent_fetches_coalesce_into_one_execution() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		let mut handles = Vec::new();
		for _ in 0..10 {
			let engine = engine.clone();
			let def = def.clone();
			handles.push(tokio::spawn(async move {
				engine.fetch(&def, &21, FetchOptions::default()).await
			}));
		}
		for handle in handles {
			let value = handle.await.unwrap().unwrap();
			assert_eq!(value, 42);
		}
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn snapshot_walks_initial_loading_success() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		assert_eq!(engine.get_snapshot(&def, &1).phase, Phase::Initial);
		let value = engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(value, 2);
		let entry = engine.get_snapshot(&def, &1);
		assert_eq!(entry.phase, Phase::Success);
		assert_eq!(entry.data, Some(json!(2)));
		assert!(entry.updated_at.is_some());
	}

	#[tokio::test]
	async fn domain_errors_round_trip_in_shape() {
		let def: ResourceDef<u32, u32, UserError> =
			ResourceDef::new("user", |_id: u32| async move { Err(UserError { code: 404 }) });
		let engine = engine_for(&def, CacheConfig::default());

		let err = engine.fetch(&def, &1, FetchOptions::default()).await.unwrap_err();
		match err {
			FetchError::Domain(domain) => assert_eq!(domain, UserError { code: 404 }),
			other => panic!("expected domain error, got {other:?}"),
		}
		let entry = engine.get_snapshot(&def, &1);
		assert_eq!(entry.phase, Phase::Failure);
		assert!(matches!(entry.error, Some(ErrorRepr::Domain { .. })));
	}

	#[tokio::test]
	async fn unregistered_definition_is_a_runtime_failure() {
		let calls = Arc::new(AtomicUsize::new(0));
		let registered = counting_def(&calls);
		let engine = engine_for(&registered, CacheConfig::default());
		let unregistered: ResourceDef<u32, u32, UserError> =
			ResourceDef::new("ghost", |id: u32| async move { Ok(id) });

		let err = engine
			.fetch(&unregistered, &1, FetchOptions::default())
			.await
			.unwrap_err();
		match err {
			FetchError::Runtime(RuntimeError::MissingExecutor { name }) => {
				assert_eq!(name, "ghost");
			}
			other => panic!("expected missing executor, got {other:?}"),
		}
		let entry = engine.get_snapshot(&unregistered, &1);
		assert_eq!(entry.phase, Phase::Failure);
		assert!(matches!(entry.error, Some(ErrorRepr::Runtime { .. })));
	}

	#[tokio::test]
	async fn force_refresh_bypasses_a_fresh_value() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		engine.fetch(&def, &1, FetchOptions::refresh()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn force_refresh_still_coalesces_with_an_in_flight_fetch() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		let plain = {
			let engine = engine.clone();
			let def = def.clone();
			tokio::spawn(async move { engine.fetch(&def, &5, FetchOptions::default()).await })
		};
		// Let the plain fetch become the leader.
		tokio::time::sleep(Duration::from_millis(2)).await;
		let forced = engine.fetch(&def, &5, FetchOptions::refresh()).await.unwrap();
		let plain = plain.await.unwrap().unwrap();
		assert_eq!(forced, plain);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn capacity_eviction_drops_the_index_entry_and_recomputes() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, small_config(2, Duration::from_secs(60)));

		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		engine.fetch(&def, &2, FetchOptions::default()).await.unwrap();
		engine.fetch(&def, &3, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 3);

		// Key 1 was the LRU victim: its read-model entry is gone too.
		assert_eq!(engine.get_snapshot(&def, &1).phase, Phase::Initial);
		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 4);
		// Key 3 is still resident.
		engine.fetch(&def, &3, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 4);
	}

	#[tokio::test(start_paused = true)]
	async fn ttl_expiry_recomputes() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, small_config(8, Duration::from_millis(20)));

		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		tokio::time::advance(Duration::from_millis(50)).await;
		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn invalidate_then_snapshot_reports_initial() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		engine.invalidate(&def, &1).await.unwrap();
		assert_eq!(engine.get_snapshot(&def, &1).phase, Phase::Initial);
		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn prefetch_warms_the_cache() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());

		engine.prefetch(&def, &7).await.unwrap();
		let value = engine.fetch(&def, &7, FetchOptions::default()).await.unwrap();
		assert_eq!(value, 14);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn snapshots_bridge_observes_phase_transitions() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());
		let bridge = engine.snapshots();

		let publishes = Arc::new(AtomicUsize::new(0));
		let publishes_in_listener = publishes.clone();
		let _sub = bridge.subscribe(move || {
			publishes_in_listener.fetch_add(1, Ordering::SeqCst);
		});

		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		// Loading and Success are two separate publishes.
		assert!(publishes.load(Ordering::SeqCst) >= 2);
		let index = bridge.snapshot();
		let entry = index.values().next().unwrap();
		assert_eq!(entry.phase, Phase::Success);
	}

	#[tokio::test]
	async fn hydration_round_trips_exactly() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());
		engine.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		engine.fetch(&def, &2, FetchOptions::default()).await.unwrap();
		let dehydrated = engine.dehydrate();

		let restored = engine_for(&def, CacheConfig::default());
		restored.hydrate(dehydrated.clone());
		assert_eq!(restored.dehydrate(), dehydrated);

		// The restored engine serves hydrated values without recomputing.
		let before = calls.load(Ordering::SeqCst);
		let value = restored.fetch(&def, &1, FetchOptions::default()).await.unwrap();
		assert_eq!(value, 2);
		assert_eq!(calls.load(Ordering::SeqCst), before);
	}

	#[tokio::test]
	async fn wire_form_survives_serialization() {
		let calls = Arc::new(AtomicUsize::new(0));
		let def = counting_def(&calls);
		let engine = engine_for(&def, CacheConfig::default());
		engine.fetch(&def, &9, FetchOptions::default()).await.unwrap();

		let dehydrated = engine.dehydrate();
		let wire = serde_json::to_string(&dehydrated).unwrap();
		let decoded: DehydratedState = serde_json::from_str(&wire).unwrap();
		assert_eq!(decoded, dehydrated);
	}
}

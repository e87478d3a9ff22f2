//! Cache & dedup engine for named, input-addressed async resources.
//!
//! A [`ResourceDef`] names a class of fetchable resources and carries the
//! async runner that computes one. The [`CacheEngine`] resolves `(definition,
//! input)` pairs through a deterministic structural key, coalesces concurrent
//! requests for the same key into one execution, bounds computed values by
//! capacity and TTL, and publishes every entry phase transition through a
//! tear-free snapshot index for the render layer.

/// Injected boundary codec.
pub mod codec;
/// Resource definitions.
pub mod def;
/// Engine: fetch, prefetch, invalidate, snapshots, hydration.
pub mod engine;
/// Cache entries, keys, and the published index.
pub mod entry;
/// Error taxonomy: domain, codec, and runtime failures.
pub mod error;
/// Capacity- and TTL-bounded value store.
pub mod store;
/// Fire-and-forget lifecycle telemetry.
pub mod telemetry;

pub use codec::{Codec, JsonCodec};
pub use def::ResourceDef;
pub use engine::{CacheEngine, CacheEngineBuilder, DehydratedState, FetchOptions};
pub use entry::{CacheEntry, CacheIndex, CacheKey, ErrorRepr, Phase};
pub use error::{CodecError, FetchError, RuntimeError};
pub use store::CacheConfig;
pub use telemetry::{CacheEvent, NullSink, TelemetrySink, TracingSink};

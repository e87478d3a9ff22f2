//! Shared runtime primitives for the strand data-synchronization core.

/// Tear-free pull-based snapshot adapter over an atomic cell.
pub mod bridge;
/// Concurrency-safe single-value container with change broadcast.
pub mod cell;
/// Async future aliases.
pub mod future;
/// Deterministic structural hashing for cache keys.
pub mod hash;

pub use bridge::RenderBridge;
pub use cell::{AtomicCell, Subscription};
pub use future::BoxFutureStatic;
pub use hash::{stable_hash, stable_hash_of};

//! Dependency-ordered loader scheduling with navigation supersession.
//!
//! Loaders attached to a route form a dependency graph. The planner groups
//! them into depth-ordered batches (batch *i* depends only on batches `< i`)
//! and fails fast on cycles or missing names. The [`Router`] executes one
//! navigation attempt at a time: batches run sequentially, loaders within a
//! batch run fully concurrently, and a newer `navigate` call cancels and
//! tears down the previous attempt before its own work starts. Late writes
//! from a superseded attempt never reach the published snapshot; every write
//! is guarded by the attempt's monotonic identity.

/// Error taxonomy: planning, loader, and navigation failures.
pub mod error;
/// Loader definitions and their execution context.
pub mod loader;
/// Navigation scheduling and the published snapshot.
pub mod nav;
/// Depth-ordered batch planning.
pub mod plan;
/// Route patterns and href matching.
pub mod route;
/// Fire-and-forget navigation telemetry.
pub mod telemetry;

pub use error::{LoaderError, NavError, PlanError};
pub use loader::{LoaderCtx, LoaderDef, RetryPolicy};
pub use nav::{LoaderState, NavOutcome, NavStatus, NavigationSnapshot, Router, RouterBuilder};
pub use plan::BatchPlan;
pub use route::{Route, RouteMatch};
pub use telemetry::{NavEvent, NullSink, TelemetrySink, TracingSink};

use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that is required to be Send and 'static.
///
/// Resource runners and route loaders return this so heterogeneous async
/// operations can live behind one registry.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

//! Concurrency-safe single-value container with change broadcast.
//!
//! An [`AtomicCell`] owns one logical piece of shared state (a cache index,
//! a navigation snapshot). Reads are lock-free via [`arc_swap::ArcSwap`];
//! read-modify-write updates are serialized under a mutex so concurrent
//! writers never race on the same value; listeners are invoked strictly
//! after a publish, never during one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

type Listener<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct CellInner<T> {
	value: ArcSwap<T>,
	/// Serializes read-modify-write cycles; readers never take this.
	write: Mutex<()>,
	listeners: Mutex<FxHashMap<u64, Listener<T>>>,
	next_listener_id: AtomicU64,
}

/// Atomic mutable container holding one value.
///
/// Cloning the cell yields another handle to the same value. A reader can
/// never observe a value mixing fields from two publishes: the published
/// value is a single pointer swap.
pub struct AtomicCell<T> {
	inner: Arc<CellInner<T>>,
}

impl<T> Clone for AtomicCell<T> {
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}

impl<T: fmt::Debug> fmt::Debug for AtomicCell<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AtomicCell").field("value", &self.inner.value.load()).finish()
	}
}

impl<T: Send + Sync + 'static> AtomicCell<T> {
	/// Creates a cell holding `initial`.
	pub fn new(initial: T) -> Self {
		Self {
			inner: Arc::new(CellInner {
				value: ArcSwap::from_pointee(initial),
				write: Mutex::new(()),
				listeners: Mutex::new(FxHashMap::default()),
				next_listener_id: AtomicU64::new(0),
			}),
		}
	}

	/// Returns the last fully-published value.
	pub fn get(&self) -> Arc<T> {
		self.inner.value.load_full()
	}

	/// Replaces the value wholesale and notifies listeners.
	pub fn set(&self, value: T) -> Arc<T> {
		self.update(|_| value)
	}

	/// Atomically computes the next value from the current one.
	///
	/// The closure runs under the write lock, so concurrent `update`/`set`
	/// calls are serialized and no intermediate value is lost. Listeners
	/// run after the publish, outside the lock.
	pub fn update(&self, f: impl FnOnce(&T) -> T) -> Arc<T> {
		let published = {
			let _guard = self.inner.write.lock();
			let current = self.inner.value.load_full();
			let next = Arc::new(f(&current));
			self.inner.value.store(next.clone());
			next
		};
		self.notify(&published);
		published
	}

	/// Like [`Self::update`], but publishes only when the closure returns
	/// `Some`. Returning `None` leaves the value untouched and fires no
	/// notifications; the caller learns the write did not land.
	pub fn try_update(&self, f: impl FnOnce(&T) -> Option<T>) -> Option<Arc<T>> {
		let published = {
			let _guard = self.inner.write.lock();
			let current = self.inner.value.load_full();
			let next = Arc::new(f(&current)?);
			self.inner.value.store(next.clone());
			next
		};
		self.notify(&published);
		Some(published)
	}

	/// Registers a listener invoked with every newly-published value.
	///
	/// Safe to call concurrently with ongoing publishes. The listener may
	/// itself subscribe or unsubscribe; notification never holds the
	/// listener lock while calling out.
	pub fn subscribe(&self, listener: impl Fn(&Arc<T>) + Send + Sync + 'static) -> Subscription {
		let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
		self.inner.listeners.lock().insert(id, Arc::new(listener));
		let weak = Arc::downgrade(&self.inner);
		Subscription {
			cancel: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.listeners.lock().remove(&id);
				}
			})),
		}
	}

	fn notify(&self, value: &Arc<T>) {
		let listeners: Vec<Listener<T>> = self.inner.listeners.lock().values().cloned().collect();
		for listener in listeners {
			listener(value);
		}
	}

	#[cfg(test)]
	pub(crate) fn listener_count(&self) -> usize {
		self.inner.listeners.lock().len()
	}
}

impl<T: Default + Send + Sync + 'static> Default for AtomicCell<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

/// Handle for one registered listener.
///
/// Unsubscribes on drop; [`Self::unsubscribe`] may also be called
/// explicitly, and calling it more than once is a no-op.
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
	/// Removes the listener. Idempotent.
	pub fn unsubscribe(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.unsubscribe();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
	}
}

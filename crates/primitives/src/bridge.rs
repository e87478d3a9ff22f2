//! Tear-free pull-based snapshot adapter over a push-based state source.
//!
//! A render pass is synchronous: it must read a consistent snapshot without
//! blocking, and it learns about changes through an invalidation callback
//! rather than by awaiting a stream. The bridge adapts an [`AtomicCell`]'s
//! push-based publishes into exactly that pair.

use std::sync::Arc;

use crate::cell::{AtomicCell, Subscription};

/// Pull-based view over an [`AtomicCell`].
///
/// `snapshot` always returns the last fully-published value; `subscribe`
/// registers an invalidation callback fired after every publish. The bridge
/// holds no mutable state of its own, so any number of clones observe one
/// consistent stream.
pub struct RenderBridge<T> {
	cell: AtomicCell<T>,
}

impl<T> Clone for RenderBridge<T> {
	fn clone(&self) -> Self {
		Self { cell: self.cell.clone() }
	}
}

impl<T: Send + Sync + 'static> RenderBridge<T> {
	/// Wraps an existing cell.
	pub fn new(cell: AtomicCell<T>) -> Self {
		Self { cell }
	}

	/// Returns the last fully-published value. Synchronous, non-blocking.
	pub fn snapshot(&self) -> Arc<T> {
		self.cell.get()
	}

	/// Registers an invalidation callback fired after each publish.
	///
	/// The callback receives no value: consumers re-read [`Self::snapshot`],
	/// which is guaranteed to already contain the publish that triggered the
	/// notification (listeners run after, never during, a publish).
	pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
		self.cell.subscribe(move |_| listener())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn snapshot_reflects_publishes() {
		let cell = AtomicCell::new("idle");
		let bridge = RenderBridge::new(cell.clone());
		assert_eq!(*bridge.snapshot(), "idle");
		cell.set("loading");
		assert_eq!(*bridge.snapshot(), "loading");
	}

	#[test]
	fn invalidation_fires_after_the_value_is_readable() {
		let cell = AtomicCell::new(0u32);
		let bridge = RenderBridge::new(cell.clone());
		let seen = Arc::new(AtomicUsize::new(0));
		let seen_in_listener = seen.clone();
		let reread = bridge.clone();
		let _sub = bridge.subscribe(move || {
			// Re-reading inside the callback must observe the new publish.
			seen_in_listener.store(*reread.snapshot() as usize, Ordering::SeqCst);
		});
		cell.set(9);
		assert_eq!(seen.load(Ordering::SeqCst), 9);
	}

	#[test]
	fn double_unsubscribe_is_a_no_op() {
		let cell = AtomicCell::new(0u32);
		let bridge = RenderBridge::new(cell.clone());
		let calls = Arc::new(AtomicUsize::new(0));
		let calls_in_listener = calls.clone();
		let mut sub = bridge.subscribe(move || {
			calls_in_listener.fetch_add(1, Ordering::SeqCst);
		});
		cell.set(1);
		sub.unsubscribe();
		sub.unsubscribe();
		cell.set(2);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn subscribe_races_with_publishes() {
		let cell = AtomicCell::new(0u64);
		let bridge = RenderBridge::new(cell.clone());
		let writer = {
			let cell = cell.clone();
			std::thread::spawn(move || {
				for n in 0..500 {
					cell.set(n);
				}
			})
		};
		for _ in 0..200 {
			let mut sub = bridge.subscribe(|| {});
			sub.unsubscribe();
		}
		writer.join().unwrap();
	}
}

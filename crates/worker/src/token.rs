use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock.
///
/// Clones share the same counter, so every handle observes one ordering.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued generation, or 0 if none was issued.
	pub fn current(&self) -> u64 {
		self.next.load(Ordering::Acquire)
	}
}

/// Cancellation token stamped with the generation it was issued for.
///
/// Clones share one cancellation state; the generation lets a receiver tell
/// a superseded task's report apart from the current one.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates an uncancelled token for `generation`.
	pub fn root(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clock_is_monotonic_across_clones() {
		let clock = GenerationClock::new();
		let other = clock.clone();
		assert_eq!(clock.current(), 0);
		assert_eq!(clock.next(), 1);
		assert_eq!(other.next(), 2);
		assert_eq!(clock.current(), 2);
	}

	#[test]
	fn clones_share_cancellation() {
		let token = GenerationToken::root(7);
		let seen_by_task = token.clone();
		assert_eq!(seen_by_task.generation(), 7);
		assert!(!seen_by_task.is_cancelled());
		token.cancel();
		assert!(seen_by_task.is_cancelled());
	}

	#[tokio::test(flavor = "current_thread")]
	async fn cancelled_resolves_after_cancel() {
		let token = GenerationToken::root(1);
		let waiter = token.clone();
		let task = tokio::spawn(async move { waiter.cancelled().await });
		token.cancel();
		task.await.unwrap();
	}
}

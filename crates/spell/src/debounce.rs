//! Per-document debounce timer.
//!
//! Every [`DebounceTimer::notify`] resets the deadline to `delay` after the
//! call. Only the last timer of a quiet period reports back, and the engine
//! double-checks its generation via [`DebounceTimer::fire`], so a timer that
//! raced with a reset or a cancel is ignored. Generations come from a clock
//! shared across documents, so a report from a timer of a closed document
//! never matches a timer of its next registration.

use std::time::Duration;

use ortho_worker::{GenerationClock, GenerationToken, TaskClass};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::event::EngineEvent;
use crate::host::DocumentId;

/// Coalesces mutation signals of one document into a single rescan trigger.
#[derive(Debug)]
pub struct DebounceTimer {
	doc: DocumentId,
	delay: Duration,
	generations: GenerationClock,
	pending: Option<GenerationToken>,
	due_at: Option<Instant>,
}

impl DebounceTimer {
	pub fn new(doc: DocumentId, delay: Duration, generations: GenerationClock) -> Self {
		Self {
			doc,
			delay,
			generations,
			pending: None,
			due_at: None,
		}
	}

	/// Restarts the timer; it fires `delay` from now unless notified again.
	pub fn notify(&mut self, events: &UnboundedSender<EngineEvent>) {
		self.cancel();

		let token = GenerationToken::root(self.generations.next());
		let generation = token.generation();
		let due = Instant::now() + self.delay;
		self.pending = Some(token.clone());
		self.due_at = Some(due);

		let doc = self.doc.clone();
		let events = events.clone();
		tracing::trace!(doc = %doc, generation, delay_ms = self.delay.as_millis() as u64, "spell.debounce.notify");
		ortho_worker::spawn(TaskClass::Interactive, async move {
			tokio::select! {
				_ = token.cancelled() => {}
				_ = tokio::time::sleep_until(due) => {
					let _ = events.send(EngineEvent::DebounceElapsed { doc, generation });
				}
			}
		});
	}

	/// Clears any pending timer.
	pub fn cancel(&mut self) {
		if let Some(token) = self.pending.take() {
			token.cancel();
		}
		self.due_at = None;
	}

	/// Consumes an elapsed notification.
	///
	/// Returns true only for the timer that is currently pending.
	pub fn fire(&mut self, generation: u64) -> bool {
		if self.pending.as_ref().is_none_or(|token| token.generation() != generation) {
			return false;
		}
		self.pending = None;
		self.due_at = None;
		true
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Deadline of the pending timer.
	pub fn due_at(&self) -> Option<Instant> {
		self.due_at
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}
}

#[cfg(test)]
mod tests {
	use tokio::sync::mpsc;
	use tokio::time::sleep;

	use super::*;

	const DELAY: Duration = Duration::from_millis(500);

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn bursts_coalesce_into_one_fire() {
		let (tx, mut rx) = mpsc::unbounded_channel();
		let mut timer = DebounceTimer::new(DocumentId::from("a.txt"), DELAY, GenerationClock::new());
		let start = Instant::now();

		timer.notify(&tx);
		sleep(Duration::from_millis(100)).await;
		timer.notify(&tx);
		sleep(Duration::from_millis(100)).await;
		timer.notify(&tx);
		assert_eq!(timer.due_at(), Some(start + Duration::from_millis(700)));

		let Some(EngineEvent::DebounceElapsed { generation, .. }) = rx.recv().await else {
			panic!("expected a debounce event");
		};
		assert_eq!(start.elapsed(), Duration::from_millis(700));
		assert!(timer.fire(generation));
		assert!(!timer.is_pending());

		sleep(Duration::from_secs(5)).await;
		assert!(rx.try_recv().is_err());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn cancel_suppresses_fire() {
		let (tx, mut rx) = mpsc::unbounded_channel();
		let mut timer = DebounceTimer::new(DocumentId::from("a.txt"), DELAY, GenerationClock::new());

		timer.notify(&tx);
		timer.cancel();
		assert!(!timer.is_pending());

		sleep(DELAY * 2).await;
		assert!(rx.try_recv().is_err());
	}

	#[test]
	fn stale_generation_is_ignored() {
		let mut timer = DebounceTimer::new(DocumentId::from("a.txt"), DELAY, GenerationClock::new());
		assert!(!timer.fire(0));
		timer.pending = Some(GenerationToken::root(3));
		assert!(!timer.fire(2));
		assert!(timer.is_pending());
		assert!(timer.fire(3));
	}
	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn replaced_timer_ignores_its_predecessor() {
		let (tx, mut rx) = mpsc::unbounded_channel();
		let generations = GenerationClock::new();
		let mut closed = DebounceTimer::new(DocumentId::from("a.txt"), DELAY, generations.clone());
		closed.notify(&tx);
		sleep(DELAY).await;
		let Some(EngineEvent::DebounceElapsed { generation, .. }) = rx.recv().await else {
			panic!("expected a debounce event");
		};
		drop(closed);

		let mut reopened = DebounceTimer::new(DocumentId::from("a.txt"), DELAY, generations);
		reopened.notify(&tx);
		assert!(!reopened.fire(generation));
		assert!(reopened.is_pending());
	}
}

//! Registry of observed documents.
//!
//! [`DocumentRegistry`] owns one [`SpellState`] and one [`DebounceTimer`] per
//! eligible document and routes lifecycle signals to them. It never reads
//! document text itself; callers hand it a snapshot whenever a scan starts.
//!
//! Scan versions and timer generations come from registry-wide clocks, so a
//! report addressed to a closed registration never matches the next
//! registration of the same document.

use std::collections::HashMap;
use std::time::Duration;

use ortho_worker::GenerationClock;
use tracing::{debug, trace};

use crate::debounce::DebounceTimer;
use crate::eligibility::Eligibility;
use crate::host::{DocumentId, DocumentInfo, MarkerDelta};
use crate::scan::{ScanOutcome, Scanner};
use crate::state::SpellState;

/// Per-document bookkeeping.
#[derive(Debug)]
pub struct DocumentEntry {
	pub info: DocumentInfo,
	pub state: SpellState,
	pub timer: DebounceTimer,
}

/// Result of routing a finished scan.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanFinished {
	/// Deltas to render, `None` if the scan was stale, cancelled, or its
	/// document is gone.
	pub deltas: Option<Vec<MarkerDelta>>,
	/// A debounce fire arrived while the scan was running; rescan again now.
	pub follow_up: bool,
}

/// Observed documents with their caches and timers.
#[derive(Debug)]
pub struct DocumentRegistry {
	eligibility: Eligibility,
	debounce: Duration,
	scanner: Scanner,
	scan_versions: GenerationClock,
	timer_generations: GenerationClock,
	marker_ids: GenerationClock,
	docs: HashMap<DocumentId, DocumentEntry>,
}

impl DocumentRegistry {
	pub fn new(eligibility: Eligibility, debounce: Duration, scanner: Scanner) -> Self {
		Self {
			eligibility,
			debounce,
			scanner,
			scan_versions: GenerationClock::new(),
			timer_generations: GenerationClock::new(),
			marker_ids: GenerationClock::new(),
			docs: HashMap::new(),
		}
	}

	/// Registers `info` if it is eligible and starts its first scan on `text`.
	///
	/// Returns false for ineligible or already registered documents.
	pub fn observe(&mut self, info: DocumentInfo, text: String) -> bool {
		if self.docs.contains_key(&info.id) {
			trace!(doc = %info.id, "spell.registry.already_observed");
			return false;
		}
		if let Err(reason) = self.eligibility.validate(&info) {
			debug!(doc = %info.id, grammar = %info.grammar, reason = reason.as_str(), "spell.registry.ineligible");
			return false;
		}

		let id = info.id.clone();
		debug!(doc = %id, grammar = %info.grammar, len_chars = info.len_chars, "spell.registry.observe");
		self.docs.insert(
			id.clone(),
			DocumentEntry {
				timer: DebounceTimer::new(id.clone(), self.debounce, self.timer_generations.clone()),
				state: SpellState::new(self.scan_versions.clone(), self.marker_ids.clone()),
				info,
			},
		);
		self.rescan_now(&id, text)
	}

	/// Restarts the debounce timer of `doc`. Untracked documents are ignored.
	pub fn on_mutate(&mut self, doc: &DocumentId) -> bool {
		let Some(entry) = self.docs.get_mut(doc) else {
			return false;
		};
		entry.timer.notify(self.scanner.events());
		true
	}

	/// Forgets `doc`, returning the deltas that remove its markers.
	pub fn on_close(&mut self, doc: &DocumentId) -> Option<Vec<MarkerDelta>> {
		let mut entry = self.docs.remove(doc)?;
		entry.timer.cancel();
		let deltas = entry.state.clear();
		debug!(doc = %doc, removed = deltas.len(), "spell.registry.close");
		Some(deltas)
	}

	/// Starts a scan of `doc` on `text`, superseding any scan in flight.
	pub fn rescan_now(&mut self, doc: &DocumentId, text: String) -> bool {
		let Some(entry) = self.docs.get_mut(doc) else {
			return false;
		};
		let token = entry.state.begin_scan();
		trace!(doc = %doc, version = token.generation(), bytes = text.len(), "spell.rescan.start");
		self.scanner.start(doc.clone(), text, token);
		true
	}

	/// Handles an elapsed debounce timer.
	///
	/// Returns true when the caller should rescan `doc` now. If a scan is
	/// already in flight, a single follow-up is queued instead.
	pub fn on_debounce_elapsed(&mut self, doc: &DocumentId, generation: u64) -> bool {
		let Some(entry) = self.docs.get_mut(doc) else {
			return false;
		};
		if !entry.timer.fire(generation) {
			trace!(doc = %doc, generation, "spell.debounce.stale");
			return false;
		}
		if entry.state.is_scan_in_flight() {
			trace!(doc = %doc, "spell.debounce.follow_up");
			entry.state.request_follow_up();
			return false;
		}
		true
	}

	/// Routes a finished scan to its document's state.
	pub fn on_scan_finished(&mut self, doc: &DocumentId, version: u64, outcome: Option<ScanOutcome>) -> ScanFinished {
		let Some(entry) = self.docs.get_mut(doc) else {
			trace!(doc = %doc, version, "spell.rescan.orphaned");
			return ScanFinished::default();
		};

		let deltas = match outcome {
			Some(outcome) => {
				let failed = outcome.failed_queries;
				let deltas = entry.state.commit(outcome);
				if let Some(deltas) = &deltas {
					debug!(
						doc = %doc,
						version,
						misspelled = entry.state.misspelled().len(),
						markers = entry.state.markers().len(),
						deltas = deltas.len(),
						failed,
						"spell.rescan.commit"
					);
				}
				deltas
			}
			None => {
				entry.state.abandon(version);
				None
			}
		};

		ScanFinished {
			deltas,
			follow_up: entry.state.take_follow_up(),
		}
	}

	/// Forgets every document, returning the deltas that clear their markers.
	pub fn clear(&mut self) -> Vec<(DocumentId, Vec<MarkerDelta>)> {
		let ids: Vec<_> = self.docs.keys().cloned().collect();
		ids.into_iter()
			.filter_map(|id| self.on_close(&id).map(|deltas| (id, deltas)))
			.collect()
	}

	pub fn get(&self, doc: &DocumentId) -> Option<&DocumentEntry> {
		self.docs.get(doc)
	}

	pub fn state(&self, doc: &DocumentId) -> Option<&SpellState> {
		self.docs.get(doc).map(|entry| &entry.state)
	}

	pub fn contains(&self, doc: &DocumentId) -> bool {
		self.docs.contains_key(doc)
	}

	/// Registered documents in id order.
	pub fn ids(&self) -> Vec<DocumentId> {
		let mut ids: Vec<_> = self.docs.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.docs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.is_empty()
	}

	/// Whether any document has a pending timer or a scan in flight.
	pub fn has_pending_work(&self) -> bool {
		self.docs
			.values()
			.any(|entry| entry.timer.is_pending() || entry.state.is_scan_in_flight())
	}
}

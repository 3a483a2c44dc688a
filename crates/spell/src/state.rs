//! Per-document misspelling cache.
//!
//! [`SpellState`] holds the result of the last *completed* scan of a document
//! and the markers currently rendered for it. Scans are stamped with a version
//! drawn from a clock shared by every document by [`SpellState::begin_scan`];
//! an outcome is only installed if it carries the latest version, so a slow
//! scan of old text can never overwrite the result of a newer one, and a scan
//! of a closed document never matches a later registration of the same id.
//!
//! Markers are diffed by `(range, word)`: an occurrence that survives a rescan
//! keeps its [`MarkerId`], and rescanning unchanged text emits no deltas.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Range;

use indexmap::IndexMap;
use ortho_worker::{GenerationClock, GenerationToken};

use crate::host::{MISSPELLING_CLASS, MarkerDelta, MarkerId};
use crate::scan::ScanOutcome;

/// A rendered misspelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
	pub range: Range<usize>,
	pub word: String,
	pub line: usize,
}

/// A misspelled occurrence together with its cached suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
	pub word: String,
	pub range: Range<usize>,
	pub line: usize,
	pub suggestions: Vec<String>,
}

/// Misspelling cache and scan bookkeeping for one document.
#[derive(Debug)]
pub struct SpellState {
	misspelled: IndexMap<String, Vec<String>>,
	markers: BTreeMap<MarkerId, Marker>,
	versions: GenerationClock,
	marker_ids: GenerationClock,
	scan_version: u64,
	committed_version: u64,
	in_flight: Option<GenerationToken>,
	follow_up: bool,
}

impl SpellState {
	/// Creates an empty state drawing scan versions from `versions` and marker
	/// ids from `marker_ids`.
	pub fn new(versions: GenerationClock, marker_ids: GenerationClock) -> Self {
		Self {
			misspelled: IndexMap::new(),
			markers: BTreeMap::new(),
			versions,
			marker_ids,
			scan_version: 0,
			committed_version: 0,
			in_flight: None,
			follow_up: false,
		}
	}

	/// Stamps a new scan version, cancelling any scan still in flight.
	pub fn begin_scan(&mut self) -> GenerationToken {
		if let Some(previous) = self.in_flight.take() {
			previous.cancel();
		}
		self.scan_version = self.versions.next();
		let token = GenerationToken::root(self.scan_version);
		self.in_flight = Some(token.clone());
		token
	}

	pub fn is_scan_in_flight(&self) -> bool {
		self.in_flight.is_some()
	}

	/// Records that another rescan is wanted once the in-flight one completes.
	pub fn request_follow_up(&mut self) {
		self.follow_up = true;
	}

	/// Takes the follow-up request if no scan is in flight anymore.
	pub fn take_follow_up(&mut self) -> bool {
		if self.in_flight.is_some() {
			return false;
		}
		std::mem::take(&mut self.follow_up)
	}

	/// Marks scan `version` as finished without a result.
	pub fn abandon(&mut self, version: u64) {
		if self.in_flight.as_ref().is_some_and(|token| token.generation() == version) {
			self.in_flight = None;
		}
	}

	/// Installs a completed scan.
	///
	/// Returns the marker deltas to render, or `None` if the outcome was
	/// superseded by a newer scan and discarded. The returned batch is empty
	/// when nothing visible changed.
	pub fn commit(&mut self, outcome: ScanOutcome) -> Option<Vec<MarkerDelta>> {
		if outcome.version != self.scan_version {
			tracing::trace!(version = outcome.version, latest = self.scan_version, "spell.state.stale");
			return None;
		}
		self.in_flight = None;

		let mut previous: HashMap<(Range<usize>, String), MarkerId> = self
			.markers
			.iter()
			.map(|(id, marker)| ((marker.range.clone(), marker.word.clone()), *id))
			.collect();

		let mut markers = BTreeMap::new();
		let mut added = Vec::new();
		for occurrence in outcome.occurrences {
			let marker = Marker {
				range: occurrence.range,
				word: occurrence.word,
				line: occurrence.line,
			};
			match previous.remove(&(marker.range.clone(), marker.word.clone())) {
				Some(id) => {
					markers.insert(id, marker);
				}
				None => {
					let id = MarkerId(self.marker_ids.next());
					added.push(MarkerDelta::Add {
						id,
						range: marker.range.clone(),
						word: marker.word.clone(),
						style_class: MISSPELLING_CLASS,
					});
					markers.insert(id, marker);
				}
			}
		}

		let mut deltas: Vec<MarkerDelta> = self
			.markers
			.keys()
			.filter(|id| !markers.contains_key(*id))
			.map(|id| MarkerDelta::Remove { id: *id })
			.collect();
		deltas.extend(added);

		let old_lines = gutter_lines(&self.markers);
		let new_lines = gutter_lines(&markers);
		deltas.extend(old_lines.difference(&new_lines).map(|&line| MarkerDelta::GutterRemove { line }));
		deltas.extend(new_lines.difference(&old_lines).map(|&line| MarkerDelta::GutterAdd { line }));

		self.markers = markers;
		self.misspelled = outcome.misspelled;
		self.committed_version = outcome.version;
		Some(deltas)
	}

	/// Drops all cached results, returning the deltas that remove every marker.
	///
	/// Cancels any scan in flight; its eventual outcome will be discarded.
	pub fn clear(&mut self) -> Vec<MarkerDelta> {
		if let Some(token) = self.in_flight.take() {
			token.cancel();
		}
		self.scan_version = self.versions.next();
		self.follow_up = false;

		let mut deltas: Vec<MarkerDelta> = self.markers.keys().map(|id| MarkerDelta::Remove { id: *id }).collect();
		deltas.extend(gutter_lines(&self.markers).into_iter().map(|line| MarkerDelta::GutterRemove { line }));
		self.markers.clear();
		self.misspelled.clear();
		deltas
	}

	/// Misspelled words of the last completed scan with their suggestions.
	pub fn misspelled(&self) -> &IndexMap<String, Vec<String>> {
		&self.misspelled
	}

	/// Cached suggestions for `word`, if it is currently misspelled.
	pub fn suggestions(&self, word: &str) -> Option<&[String]> {
		self.misspelled.get(word).map(Vec::as_slice)
	}

	/// Current misspellings in document order.
	pub fn misspellings(&self) -> Vec<Misspelling> {
		let mut found: Vec<_> = self
			.markers
			.values()
			.map(|marker| Misspelling {
				word: marker.word.clone(),
				range: marker.range.clone(),
				line: marker.line,
				suggestions: self.misspelled.get(&marker.word).cloned().unwrap_or_default(),
			})
			.collect();
		found.sort_by_key(|m| m.range.start);
		found
	}

	pub fn markers(&self) -> &BTreeMap<MarkerId, Marker> {
		&self.markers
	}

	/// Latest version handed out by [`Self::begin_scan`].
	pub fn scan_version(&self) -> u64 {
		self.scan_version
	}

	/// Version of the scan whose result is currently installed.
	pub fn committed_version(&self) -> u64 {
		self.committed_version
	}
}

fn gutter_lines(markers: &BTreeMap<MarkerId, Marker>) -> BTreeSet<usize> {
	markers.values().map(|marker| marker.line).collect()
}

//! Host editor boundary.
//!
//! The engine never owns document text. It reads snapshots through
//! [`DocumentHost`], requests replacements through the same trait, and
//! reports visual changes to a [`MarkerSink`] as batches of [`MarkerDelta`].
//! [`MemoryHost`] and [`MarkerStore`] are complete in-memory implementations
//! for headless use.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

/// Style class attached to every misspelling marker.
pub const MISSPELLING_CLASS: &str = "spell-check-misspelling";

/// Opaque, stable identifier of a host document (usually its path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
	pub fn new(id: impl AsRef<str>) -> Self {
		Self(Arc::from(id.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// What the eligibility gate needs to know about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
	pub id: DocumentId,
	/// File path, if the document is backed by one.
	pub path: Option<PathBuf>,
	/// Language/grammar tag, e.g. `text.plain` or `source.rust`.
	pub grammar: String,
	/// Document size in characters.
	pub len_chars: usize,
}

/// Handle of a rendered misspelling marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// A change to the host's rendered markers for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerDelta {
	/// Highlight `range` as a misspelling of `word`.
	Add {
		id: MarkerId,
		range: Range<usize>,
		word: String,
		style_class: &'static str,
	},
	/// Remove a previously added marker.
	Remove { id: MarkerId },
	/// Show a gutter icon on a zero-based line.
	GutterAdd { line: usize },
	/// Hide the gutter icon on a zero-based line.
	GutterRemove { line: usize },
}

/// Rendering sink for marker changes.
pub trait MarkerSink: Send + Sync {
	/// Applies a batch of deltas for `doc`. Batches are never empty.
	fn apply(&self, doc: &DocumentId, deltas: &[MarkerDelta]);
}

/// Errors returned by [`DocumentHost::replace`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The document is no longer open in the host.
	#[error("document {0} is not open")]
	Closed(DocumentId),
	/// The range does not fit the current text or splits a character.
	#[error("range {start}..{end} is out of bounds for document {doc}")]
	OutOfBounds { doc: DocumentId, start: usize, end: usize },
	/// The host refused the edit, e.g. a read-only buffer.
	#[error("edit rejected: {0}")]
	Rejected(String),
}

/// Read and edit access to host documents.
pub trait DocumentHost: Send + Sync {
	/// Returns the current text of `doc`, or `None` if it is not open.
	fn text(&self, doc: &DocumentId) -> Option<String>;

	/// Replaces the byte `range` of `doc` with `text`.
	fn replace(&self, doc: &DocumentId, range: Range<usize>, text: &str) -> Result<(), HostError>;
}

/// In-memory [`DocumentHost`].
#[derive(Debug, Default)]
pub struct MemoryHost {
	docs: RwLock<HashMap<DocumentId, String>>,
}

impl MemoryHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens or overwrites a document.
	pub fn set_text(&self, doc: &DocumentId, text: impl Into<String>) {
		self.docs.write().insert(doc.clone(), text.into());
	}

	/// Drops a document.
	pub fn remove(&self, doc: &DocumentId) -> Option<String> {
		self.docs.write().remove(doc)
	}
}

impl DocumentHost for MemoryHost {
	fn text(&self, doc: &DocumentId) -> Option<String> {
		self.docs.read().get(doc).cloned()
	}

	fn replace(&self, doc: &DocumentId, range: Range<usize>, text: &str) -> Result<(), HostError> {
		let mut docs = self.docs.write();
		let current = docs.get_mut(doc).ok_or_else(|| HostError::Closed(doc.clone()))?;
		let valid = range.start <= range.end
			&& range.end <= current.len()
			&& current.is_char_boundary(range.start)
			&& current.is_char_boundary(range.end);
		if !valid {
			return Err(HostError::OutOfBounds {
				doc: doc.clone(),
				start: range.start,
				end: range.end,
			});
		}
		current.replace_range(range, text);
		Ok(())
	}
}

/// A live marker as tracked by [`MarkerStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarker {
	pub range: Range<usize>,
	pub word: String,
}

#[derive(Debug, Default)]
struct RenderedDoc {
	markers: BTreeMap<MarkerId, RenderedMarker>,
	gutters: BTreeSet<usize>,
}

/// [`MarkerSink`] that mirrors the rendered state in memory.
///
/// Keeps the live markers and gutter lines per document plus a count of the
/// batches received.
#[derive(Debug, Default)]
pub struct MarkerStore {
	docs: Mutex<HashMap<DocumentId, RenderedDoc>>,
	batches: Mutex<usize>,
}

impl MarkerStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Live markers of `doc`, ordered by id.
	pub fn markers(&self, doc: &DocumentId) -> Vec<(MarkerId, RenderedMarker)> {
		self.docs
			.lock()
			.get(doc)
			.map(|d| d.markers.iter().map(|(id, m)| (*id, m.clone())).collect())
			.unwrap_or_default()
	}

	/// Marked words of `doc` in document order.
	pub fn words(&self, doc: &DocumentId) -> Vec<String> {
		let mut markers = self.markers(doc);
		markers.sort_by_key(|(_, m)| m.range.start);
		markers.into_iter().map(|(_, m)| m.word).collect()
	}

	/// Lines of `doc` currently showing a gutter icon.
	pub fn gutters(&self, doc: &DocumentId) -> Vec<usize> {
		self.docs
			.lock()
			.get(doc)
			.map(|d| d.gutters.iter().copied().collect())
			.unwrap_or_default()
	}

	/// Number of delta batches received so far.
	pub fn batches(&self) -> usize {
		*self.batches.lock()
	}
}

impl MarkerSink for MarkerStore {
	fn apply(&self, doc: &DocumentId, deltas: &[MarkerDelta]) {
		*self.batches.lock() += 1;
		let mut docs = self.docs.lock();
		let rendered = docs.entry(doc.clone()).or_default();
		for delta in deltas {
			match delta {
				MarkerDelta::Add { id, range, word, .. } => {
					rendered.markers.insert(
						*id,
						RenderedMarker {
							range: range.clone(),
							word: word.clone(),
						},
					);
				}
				MarkerDelta::Remove { id } => {
					rendered.markers.remove(id);
				}
				MarkerDelta::GutterAdd { line } => {
					rendered.gutters.insert(*line);
				}
				MarkerDelta::GutterRemove { line } => {
					rendered.gutters.remove(line);
				}
			}
		}
		if rendered.markers.is_empty() && rendered.gutters.is_empty() {
			docs.remove(doc);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn memory_host_replaces_ranges() {
		let host = MemoryHost::new();
		let doc = DocumentId::from("a.txt");
		host.set_text(&doc, "I recieve mail");
		host.replace(&doc, 2..9, "receive").unwrap();
		assert_eq!(host.text(&doc).as_deref(), Some("I receive mail"));
	}

	#[test]
	fn memory_host_rejects_bad_ranges() {
		let host = MemoryHost::new();
		let doc = DocumentId::from("a.txt");
		host.set_text(&doc, "é");
		assert!(matches!(host.replace(&doc, 0..1, "e"), Err(HostError::OutOfBounds { .. })));
		assert!(matches!(host.replace(&doc, 0..5, "e"), Err(HostError::OutOfBounds { .. })));
		assert_eq!(host.replace(&DocumentId::from("b"), 0..0, "x"), Err(HostError::Closed(DocumentId::from("b"))));
	}

	#[test]
	fn marker_store_tracks_live_state() {
		let store = MarkerStore::new();
		let doc = DocumentId::from("a.txt");
		store.apply(
			&doc,
			&[
				MarkerDelta::Add {
					id: MarkerId(1),
					range: 0..3,
					word: "teh".into(),
					style_class: MISSPELLING_CLASS,
				},
				MarkerDelta::GutterAdd { line: 0 },
			],
		);
		assert_eq!(store.words(&doc), vec!["teh".to_string()]);
		assert_eq!(store.gutters(&doc), vec![0]);

		store.apply(&doc, &[MarkerDelta::Remove { id: MarkerId(1) }, MarkerDelta::GutterRemove { line: 0 }]);
		assert!(store.markers(&doc).is_empty());
		assert!(store.gutters(&doc).is_empty());
		assert_eq!(store.batches(), 2);
	}
}

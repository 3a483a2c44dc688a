//! Interactive correction popup.
//!
//! At most one [`CorrectionSession`] is open at a time; [`CorrectionController`]
//! enforces that by owning the only slot. A session only remembers the word
//! and its byte range, never a marker handle, and it never mutates the
//! document itself: applying a candidate yields a [`SessionAction`] that the
//! engine carries out.

use std::ops::Range;

use tracing::{debug, trace};

use crate::host::DocumentId;
use crate::state::SpellState;
use crate::tokenizer::token_at;

/// One entry of the correction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
	/// Replace the word with this suggestion.
	Replace(String),
	/// Add the word to the personal dictionary.
	AcceptWord,
}

impl Candidate {
	/// Text shown for this entry.
	pub fn label(&self) -> &str {
		match self {
			Self::Replace(text) => text,
			Self::AcceptWord => "Add to dictionary",
		}
	}
}

/// What applying a candidate asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
	/// Replace `range` of `doc` with `text`.
	Replace { doc: DocumentId, range: Range<usize>, text: String },
	/// Accept `word` into the personal dictionary.
	Accept { word: String },
}

/// An open correction popup for one misspelled word occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionSession {
	doc: DocumentId,
	word: String,
	range: Range<usize>,
	candidates: Vec<Candidate>,
	selected: usize,
}

impl CorrectionSession {
	/// Opens a session for the token under `cursor` in `text`.
	///
	/// The token is recomputed from the current text. Returns `None` unless
	/// it is a misspelled word of `state`.
	pub fn open(doc: DocumentId, text: &str, cursor: usize, state: &SpellState) -> Option<Self> {
		let token = token_at(text, cursor)?;
		let suggestions = state.suggestions(token.word)?;
		let candidates = suggestions
			.iter()
			.cloned()
			.map(Candidate::Replace)
			.chain(std::iter::once(Candidate::AcceptWord))
			.collect();
		Some(Self {
			doc,
			word: token.word.to_string(),
			range: token.range(),
			candidates,
			selected: 0,
		})
	}

	/// Moves the selection by `delta`, clamped to the candidate list.
	pub fn navigate(&mut self, delta: isize) {
		let last = self.candidates.len().saturating_sub(1);
		self.selected = self.selected.saturating_add_signed(delta).min(last);
	}

	/// Resolves candidate `index` into an action, or `None` if out of range.
	pub fn action(&self, index: usize) -> Option<SessionAction> {
		Some(match self.candidates.get(index)? {
			Candidate::Replace(text) => SessionAction::Replace {
				doc: self.doc.clone(),
				range: self.range.clone(),
				text: text.clone(),
			},
			Candidate::AcceptWord => SessionAction::Accept { word: self.word.clone() },
		})
	}

	/// Whether `offset` of `doc` falls on the session's word.
	pub fn contains(&self, doc: &DocumentId, offset: usize) -> bool {
		*doc == self.doc && self.range.start <= offset && offset <= self.range.end
	}

	pub fn doc(&self) -> &DocumentId {
		&self.doc
	}

	pub fn word(&self) -> &str {
		&self.word
	}

	pub fn range(&self) -> Range<usize> {
		self.range.clone()
	}

	pub fn candidates(&self) -> &[Candidate] {
		&self.candidates
	}

	pub fn selected(&self) -> usize {
		self.selected
	}
}

/// Owner of the single correction session slot.
#[derive(Debug, Default)]
pub struct CorrectionController {
	active: Option<CorrectionSession>,
}

impl CorrectionController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a session at `cursor`, dismissing any open one first.
	///
	/// Returns false, leaving no session open, if the cursor is not on a
	/// misspelled word.
	pub fn request(&mut self, doc: &DocumentId, text: &str, cursor: usize, state: &SpellState) -> bool {
		self.dismiss();
		self.active = CorrectionSession::open(doc.clone(), text, cursor, state);
		match &self.active {
			Some(session) => {
				debug!(doc = %doc, word = session.word(), candidates = session.candidates.len(), "spell.session.open");
				true
			}
			None => {
				trace!(doc = %doc, cursor, "spell.session.no_word");
				false
			}
		}
	}

	pub fn navigate(&mut self, delta: isize) {
		if let Some(session) = &mut self.active {
			session.navigate(delta);
		}
	}

	/// Applies candidate `index` and closes the session.
	///
	/// An out-of-range index leaves the session open and returns `None`.
	pub fn apply(&mut self, index: usize) -> Option<SessionAction> {
		let action = self.active.as_ref()?.action(index)?;
		self.active = None;
		debug!(?action, "spell.session.apply");
		Some(action)
	}

	/// Applies the selected candidate.
	pub fn apply_selected(&mut self) -> Option<SessionAction> {
		let index = self.active.as_ref()?.selected;
		self.apply(index)
	}

	/// Closes the session without acting on it.
	pub fn dismiss(&mut self) -> bool {
		let Some(session) = self.active.take() else {
			return false;
		};
		trace!(doc = %session.doc, word = session.word, "spell.session.dismiss");
		true
	}

	/// Dismisses the session if it belongs to `doc`.
	pub fn dismiss_for(&mut self, doc: &DocumentId) -> bool {
		if self.active.as_ref().is_some_and(|session| session.doc == *doc) {
			return self.dismiss();
		}
		false
	}

	/// Dismisses the session unless `offset` of `doc` is on its word.
	pub fn cursor_moved(&mut self, doc: &DocumentId, offset: usize) -> bool {
		if self.active.as_ref().is_some_and(|session| !session.contains(doc, offset)) {
			return self.dismiss();
		}
		false
	}

	pub fn session(&self) -> Option<&CorrectionSession> {
		self.active.as_ref()
	}

	pub fn is_open(&self) -> bool {
		self.active.is_some()
	}
}

#[cfg(test)]
mod tests {
	use indexmap::IndexMap;
	use ortho_worker::GenerationClock;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::scan::{Occurrence, ScanOutcome};

	const TEXT: &str = "I recieve mail";

	fn state() -> SpellState {
		let mut state = SpellState::new(GenerationClock::new(), GenerationClock::new());
		let token = state.begin_scan();
		let mut misspelled = IndexMap::new();
		misspelled.insert("recieve".to_string(), vec!["receive".to_string(), "recipe".to_string()]);
		state.commit(ScanOutcome {
			version: token.generation(),
			misspelled,
			occurrences: vec![Occurrence {
				word: "recieve".into(),
				range: 2..9,
				line: 0,
			}],
			failed_queries: 0,
		});
		state
	}

	fn doc() -> DocumentId {
		DocumentId::from("a.txt")
	}

	#[test]
	fn open_lists_suggestions_then_accept() {
		let session = CorrectionSession::open(doc(), TEXT, 5, &state()).unwrap();
		assert_eq!(
			session.candidates(),
			&[
				Candidate::Replace("receive".into()),
				Candidate::Replace("recipe".into()),
				Candidate::AcceptWord
			]
		);
		assert_eq!(session.selected(), 0);
		assert_eq!(session.word(), "recieve");
		assert_eq!(session.range(), 2..9);
	}

	#[test]
	fn navigation_is_clamped() {
		let mut session = CorrectionSession::open(doc(), TEXT, 2, &state()).unwrap();
		session.navigate(-1);
		assert_eq!(session.selected(), 0);
		session.navigate(1);
		assert_eq!(session.selected(), 1);
		session.navigate(1);
		assert_eq!(session.selected(), 2);
		session.navigate(1);
		assert_eq!(session.selected(), 2);
	}

	#[test]
	fn request_on_correct_word_opens_nothing() {
		let mut controller = CorrectionController::new();
		assert!(!controller.request(&doc(), TEXT, 11, &state()));
		assert!(!controller.request(&doc(), TEXT, 1, &state()));
		assert!(!controller.is_open());
	}

	#[test]
	fn apply_closes_the_session() {
		let mut controller = CorrectionController::new();
		assert!(controller.request(&doc(), TEXT, 9, &state()));
		assert_eq!(controller.apply(7), None);
		assert!(controller.is_open());

		assert_eq!(
			controller.apply(0),
			Some(SessionAction::Replace {
				doc: doc(),
				range: 2..9,
				text: "receive".into()
			})
		);
		assert!(!controller.is_open());
		assert_eq!(controller.apply(0), None);
	}

	#[test]
	fn apply_selected_accepts_word() {
		let mut controller = CorrectionController::new();
		controller.request(&doc(), TEXT, 3, &state());
		controller.navigate(5);
		assert_eq!(
			controller.apply_selected(),
			Some(SessionAction::Accept { word: "recieve".into() })
		);
	}

	#[test]
	fn cursor_outside_word_dismisses() {
		let mut controller = CorrectionController::new();
		controller.request(&doc(), TEXT, 3, &state());
		assert!(!controller.cursor_moved(&doc(), 9));
		assert!(controller.is_open());
		assert!(!controller.dismiss_for(&DocumentId::from("b.txt")));
		assert!(controller.cursor_moved(&doc(), 12));
		assert!(!controller.is_open());
	}
	#[test]
	fn second_request_replaces_open_session() {
		let mut controller = CorrectionController::new();
		let other = DocumentId::from("b.txt");
		assert!(controller.request(&doc(), TEXT, 3, &state()));

		assert!(controller.request(&other, TEXT, 4, &state()));
		assert_eq!(controller.session().map(CorrectionSession::doc), Some(&other));
		assert!(!controller.dismiss_for(&doc()));
		assert!(controller.is_open());

		assert!(!controller.request(&doc(), TEXT, 0, &state()));
		assert!(!controller.is_open());
	}
}

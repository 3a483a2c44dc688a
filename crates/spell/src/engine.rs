//! The spell engine actor.
//!
//! [`SpellEngine`] is the single logical actor tying the pieces together.
//! Host signals arrive as method calls (or [`HostInput`]s through
//! [`SpellEngine::run`]); debounce timers and scans run as spawned tasks and
//! report back as [`EngineEvent`]s, which are applied one at a time by
//! [`SpellEngine::handle_event`]. Engine state is only ever touched through
//! `&mut self`, so there is nothing to lock.

use std::sync::Arc;

use ortho_config::{PersonalDictionary, SpellConfig};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::eligibility::Eligibility;
use crate::error::{EngineError, Result};
use crate::event::EngineEvent;
use crate::host::{DocumentHost, DocumentId, DocumentInfo, MarkerDelta, MarkerSink};
use crate::oracle::{LoadError, SpellOracle};
use crate::registry::DocumentRegistry;
use crate::scan::Scanner;
use crate::session::{CorrectionController, CorrectionSession, SessionAction};
use crate::state::{Misspelling, SpellState};

/// Host signal delivered to [`SpellEngine::run`].
#[derive(Debug, Clone)]
pub enum HostInput {
	Observe(DocumentInfo),
	Change(DocumentId),
	Close(DocumentId),
	CursorMoved { doc: DocumentId, offset: usize },
	RequestCorrection { doc: DocumentId, offset: usize },
	Navigate(isize),
	Apply(usize),
	ApplySelected,
	Dismiss,
	RescanAll,
}

/// Incremental spell checker for the documents of one host.
pub struct SpellEngine {
	oracle: Arc<dyn SpellOracle>,
	host: Arc<dyn DocumentHost>,
	sink: Arc<dyn MarkerSink>,
	dictionary: PersonalDictionary,
	registry: DocumentRegistry,
	corrections: CorrectionController,
	events: mpsc::UnboundedReceiver<EngineEvent>,
}

impl std::fmt::Debug for SpellEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpellEngine")
			.field("docs", &self.registry.len())
			.field("session", &self.corrections.session())
			.finish_non_exhaustive()
	}
}

impl SpellEngine {
	/// Activates the engine over an already loaded oracle.
	///
	/// Words of the personal dictionary are accepted into `oracle`.
	pub fn activate(
		config: &SpellConfig,
		oracle: Arc<dyn SpellOracle>,
		host: Arc<dyn DocumentHost>,
		sink: Arc<dyn MarkerSink>,
	) -> Result<Self> {
		let dictionary = config.personal_dictionary()?;
		for word in dictionary.words() {
			oracle.accept(word);
		}
		Self::assemble(config, dictionary, oracle, host, sink)
	}

	/// Loads the oracle with `load` and activates the engine over it.
	///
	/// `load` receives the personal dictionary. A [`LoadError`] is logged
	/// once and aborts activation.
	pub fn activate_with_loader<F>(
		config: &SpellConfig,
		load: F,
		host: Arc<dyn DocumentHost>,
		sink: Arc<dyn MarkerSink>,
	) -> Result<Self>
	where
		F: FnOnce(&PersonalDictionary) -> std::result::Result<Arc<dyn SpellOracle>, LoadError>,
	{
		let dictionary = config.personal_dictionary()?;
		let oracle = load(&dictionary).map_err(|err| {
			error!(error = %err, "spell.engine.load_failed");
			EngineError::Load(err)
		})?;
		Self::assemble(config, dictionary, oracle, host, sink)
	}

	fn assemble(
		config: &SpellConfig,
		dictionary: PersonalDictionary,
		oracle: Arc<dyn SpellOracle>,
		host: Arc<dyn DocumentHost>,
		sink: Arc<dyn MarkerSink>,
	) -> Result<Self> {
		let eligibility = Eligibility::from_config(config)?;
		let (tx, events) = mpsc::unbounded_channel();
		let scanner = Scanner::new(oracle.clone(), config.max_suggestions, tx);
		info!(
			grammars = config.enabled_grammars.len(),
			debounce_ms = config.debounce_ms,
			personal_words = dictionary.words().len(),
			"spell.engine.activate"
		);
		Ok(Self {
			oracle,
			host,
			sink,
			dictionary,
			registry: DocumentRegistry::new(eligibility, config.debounce(), scanner),
			corrections: CorrectionController::new(),
			events,
		})
	}

	/// Removes every marker and forgets every document.
	pub fn deactivate(mut self) {
		self.corrections.dismiss();
		let docs = self.registry.clear();
		debug!(docs = docs.len(), "spell.engine.deactivate");
		for (doc, deltas) in docs {
			self.render(&doc, &deltas);
		}
	}

	/// Starts checking a document if it is eligible.
	pub fn observe(&mut self, info: DocumentInfo) -> bool {
		let Some(text) = self.host.text(&info.id) else {
			warn!(doc = %info.id, "spell.engine.observe_missing");
			return false;
		};
		self.registry.observe(info, text)
	}

	/// The host edited `doc`.
	pub fn on_change(&mut self, doc: &DocumentId) {
		self.corrections.dismiss_for(doc);
		self.registry.on_mutate(doc);
	}

	/// The host closed `doc`.
	pub fn on_close(&mut self, doc: &DocumentId) {
		self.corrections.dismiss_for(doc);
		if let Some(deltas) = self.registry.on_close(doc) {
			self.render(doc, &deltas);
		}
	}

	/// The cursor moved to `offset` of `doc`.
	pub fn on_cursor_moved(&mut self, doc: &DocumentId, offset: usize) {
		self.corrections.cursor_moved(doc, offset);
	}

	/// Opens a correction session for the word at `offset` of `doc`.
	///
	/// Returns false if there is no misspelled word under the cursor.
	pub fn request_correction(&mut self, doc: &DocumentId, offset: usize) -> bool {
		let Some(state) = self.registry.state(doc) else {
			self.corrections.dismiss();
			return false;
		};
		let Some(text) = self.host.text(doc) else {
			self.corrections.dismiss();
			return false;
		};
		self.corrections.request(doc, &text, offset, state)
	}

	pub fn navigate(&mut self, delta: isize) {
		self.corrections.navigate(delta);
	}

	pub fn dismiss(&mut self) -> bool {
		self.corrections.dismiss()
	}

	/// Applies candidate `index` of the open session.
	///
	/// Returns `Ok(false)` when no session is open or `index` is out of range.
	pub fn apply(&mut self, index: usize) -> Result<bool> {
		let Some(action) = self.corrections.apply(index) else {
			return Ok(false);
		};
		self.perform(action)?;
		Ok(true)
	}

	/// Applies the selected candidate of the open session.
	pub fn apply_selected(&mut self) -> Result<bool> {
		let Some(action) = self.corrections.apply_selected() else {
			return Ok(false);
		};
		self.perform(action)?;
		Ok(true)
	}

	fn perform(&mut self, action: SessionAction) -> Result<()> {
		match action {
			SessionAction::Replace { doc, range, text } => {
				self.host.replace(&doc, range, &text)?;
				self.rescan(&doc);
			}
			SessionAction::Accept { word } => self.accept(&word),
		}
		Ok(())
	}

	/// Accepts `word` as correctly spelled and rescans every document.
	///
	/// The word is persisted to the personal dictionary once; accepting it
	/// again only rescans.
	pub fn accept(&mut self, word: &str) {
		self.oracle.accept(word);
		match self.dictionary.append(word) {
			Ok(true) => debug!(word, "spell.engine.accept"),
			Ok(false) => trace!(word, "spell.engine.accept_known"),
			Err(err) => warn!(word, error = %err, "spell.engine.accept_persist_failed"),
		}
		self.rescan_all();
	}

	/// Rescans `doc` immediately, superseding any scan in flight.
	pub fn rescan(&mut self, doc: &DocumentId) -> bool {
		let Some(text) = self.host.text(doc) else {
			return false;
		};
		self.registry.rescan_now(doc, text)
	}

	pub fn rescan_all(&mut self) {
		for doc in self.registry.ids() {
			self.rescan(&doc);
		}
	}

	/// Applies one completion event from a spawned task.
	pub fn handle_event(&mut self, event: EngineEvent) {
		match event {
			EngineEvent::DebounceElapsed { doc, generation } => {
				if self.registry.on_debounce_elapsed(&doc, generation) {
					self.rescan(&doc);
				}
			}
			EngineEvent::ScanFinished { doc, version, outcome } => {
				let finished = self.registry.on_scan_finished(&doc, version, outcome);
				if let Some(deltas) = finished.deltas {
					self.render(&doc, &deltas);
				}
				if finished.follow_up {
					self.rescan(&doc);
				}
			}
		}
	}

	/// Applies every completion event that is already queued.
	pub fn poll(&mut self) -> usize {
		let mut handled = 0;
		while let Ok(event) = self.events.try_recv() {
			self.handle_event(event);
			handled += 1;
		}
		handled
	}

	/// Waits for the next completion event and applies it.
	pub async fn next_event(&mut self) -> bool {
		match self.events.recv().await {
			Some(event) => {
				self.handle_event(event);
				true
			}
			None => false,
		}
	}

	/// Processes events until no timer is pending and no scan is in flight.
	pub async fn settle(&mut self) {
		while self.registry.has_pending_work() {
			if !self.next_event().await {
				break;
			}
		}
	}

	/// Drives the engine from `inputs` until the channel closes, then deactivates.
	pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<HostInput>) {
		loop {
			tokio::select! {
				biased;
				input = inputs.recv() => match input {
					Some(input) => self.handle_input(input),
					None => break,
				},
				Some(event) = self.events.recv() => self.handle_event(event),
			}
		}
		self.deactivate();
	}

	fn handle_input(&mut self, input: HostInput) {
		match input {
			HostInput::Observe(info) => {
				self.observe(info);
			}
			HostInput::Change(doc) => self.on_change(&doc),
			HostInput::Close(doc) => self.on_close(&doc),
			HostInput::CursorMoved { doc, offset } => self.on_cursor_moved(&doc, offset),
			HostInput::RequestCorrection { doc, offset } => {
				self.request_correction(&doc, offset);
			}
			HostInput::Navigate(delta) => self.navigate(delta),
			HostInput::Apply(index) => {
				if let Err(err) = self.apply(index) {
					warn!(error = %err, "spell.engine.apply_failed");
				}
			}
			HostInput::ApplySelected => {
				if let Err(err) = self.apply_selected() {
					warn!(error = %err, "spell.engine.apply_failed");
				}
			}
			HostInput::Dismiss => {
				self.dismiss();
			}
			HostInput::RescanAll => self.rescan_all(),
		}
	}

	fn render(&self, doc: &DocumentId, deltas: &[MarkerDelta]) {
		if !deltas.is_empty() {
			self.sink.apply(doc, deltas);
		}
	}

	pub fn state(&self, doc: &DocumentId) -> Option<&SpellState> {
		self.registry.state(doc)
	}

	/// Current misspellings of `doc` in document order.
	pub fn misspellings(&self, doc: &DocumentId) -> Vec<Misspelling> {
		self.registry.state(doc).map(SpellState::misspellings).unwrap_or_default()
	}

	pub fn is_observed(&self, doc: &DocumentId) -> bool {
		self.registry.contains(doc)
	}

	/// Registered documents in id order.
	pub fn documents(&self) -> Vec<DocumentId> {
		self.registry.ids()
	}

	pub fn session(&self) -> Option<&CorrectionSession> {
		self.corrections.session()
	}

	pub fn personal_dictionary(&self) -> &PersonalDictionary {
		&self.dictionary
	}
}

//! The rescan computation.
//!
//! A scan tokenizes a text snapshot, asks the oracle about every distinct
//! word once, and collects misspellings with their suggestions. Nothing is
//! emitted while scanning: the full [`ScanOutcome`] is handed to
//! [`crate::state::SpellState::commit`], which decides whether it is still
//! current.
//!
//! A word whose query fails or times out counts as correct for this scan.

use std::collections::HashMap;
use std::future::Future;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use ortho_worker::{GenerationToken, TaskClass};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::event::EngineEvent;
use crate::host::DocumentId;
use crate::oracle::{OracleError, SpellOracle};
use crate::tokenizer::tokenize;

/// Budget for a single oracle query before it counts as failed.
pub const ORACLE_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Tokens scanned between cooperative yields.
const YIELD_EVERY: usize = 256;

/// One misspelled token in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
	pub word: String,
	pub range: Range<usize>,
	/// Zero-based line of `range.start`.
	pub line: usize,
}

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
	/// Scan version this outcome belongs to.
	pub version: u64,
	/// Misspelled words in first-seen order, each with at most `limit` suggestions.
	pub misspelled: IndexMap<String, Vec<String>>,
	/// Every misspelled token in document order.
	pub occurrences: Vec<Occurrence>,
	/// Words whose oracle query failed and were treated as correct.
	pub failed_queries: usize,
}

/// Spawns scans and routes their outcome back to the engine.
#[derive(Clone)]
pub struct Scanner {
	oracle: Arc<dyn SpellOracle>,
	limit: usize,
	events: UnboundedSender<EngineEvent>,
}

impl Scanner {
	pub fn new(oracle: Arc<dyn SpellOracle>, limit: usize, events: UnboundedSender<EngineEvent>) -> Self {
		Self { oracle, limit, events }
	}

	pub fn oracle(&self) -> &Arc<dyn SpellOracle> {
		&self.oracle
	}

	pub fn events(&self) -> &UnboundedSender<EngineEvent> {
		&self.events
	}

	/// Starts a background scan of `text` under `token`.
	pub fn start(&self, doc: DocumentId, text: String, token: GenerationToken) {
		let oracle = self.oracle.clone();
		let events = self.events.clone();
		let limit = self.limit;
		ortho_worker::spawn(TaskClass::Background, async move {
			let version = token.generation();
			let outcome = scan_text(oracle.as_ref(), &text, limit, &token).await;
			let _ = events.send(EngineEvent::ScanFinished { doc, version, outcome });
		});
	}
}

impl std::fmt::Debug for Scanner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Scanner").field("limit", &self.limit).finish_non_exhaustive()
	}
}

/// Scans `text`, returning `None` if `token` is cancelled before the end.
pub async fn scan_text(oracle: &dyn SpellOracle, text: &str, limit: usize, token: &GenerationToken) -> Option<ScanOutcome> {
	let mut verdicts: HashMap<&str, Option<Vec<String>>> = HashMap::new();
	let mut outcome = ScanOutcome {
		version: token.generation(),
		misspelled: IndexMap::new(),
		occurrences: Vec::new(),
		failed_queries: 0,
	};
	let mut line = 0;
	let mut line_pos = 0;

	for (i, tok) in tokenize(text).enumerate() {
		if token.is_cancelled() {
			debug!(version = token.generation(), "spell.scan.cancelled");
			return None;
		}
		if i > 0 && i % YIELD_EVERY == 0 {
			tokio::task::yield_now().await;
		}

		let verdict = match verdicts.get(tok.word) {
			Some(verdict) => verdict.clone(),
			None => {
				let verdict = classify(oracle, tok.word, limit).await.unwrap_or_else(|err| {
					warn!(word = tok.word, error = %err, "spell.scan.query_failed");
					outcome.failed_queries += 1;
					None
				});
				verdicts.insert(tok.word, verdict.clone());
				verdict
			}
		};
		let Some(suggestions) = verdict else {
			continue;
		};

		line += text.as_bytes()[line_pos..tok.start].iter().filter(|&&b| b == b'\n').count();
		line_pos = tok.start;
		outcome.misspelled.entry(tok.word.to_string()).or_insert(suggestions);
		outcome.occurrences.push(Occurrence {
			word: tok.word.to_string(),
			range: tok.range(),
			line,
		});
	}

	if token.is_cancelled() {
		return None;
	}
	Some(outcome)
}

/// `Ok(None)` for a correct word, `Ok(Some(suggestions))` for a misspelled one.
async fn classify(oracle: &dyn SpellOracle, word: &str, limit: usize) -> Result<Option<Vec<String>>, OracleError> {
	if query(oracle.is_correct(word)).await? {
		return Ok(None);
	}
	let mut suggestions = query(oracle.suggestions(word)).await?;
	suggestions.truncate(limit);
	Ok(Some(suggestions))
}

async fn query<T>(fut: impl Future<Output = Result<T, OracleError>>) -> Result<T, OracleError> {
	tokio::time::timeout(ORACLE_QUERY_TIMEOUT, fut)
		.await
		.unwrap_or(Err(OracleError::Timeout))
}

//! Incremental spell checking for live editor documents.
//!
//! The engine watches host documents, tokenizes their text (splitting
//! camelCase and ALL_CAPS identifiers into words), asks a [`SpellOracle`]
//! about each word and reports misspellings to the host as marker deltas.
//! Edits are debounced per document; a rescan whose text was superseded
//! before it finished is discarded rather than rendered.
//!
//! # Pieces
//!
//! - [`tokenizer`]: word segmentation.
//! - [`SpellOracle`]: the spelling service boundary, with [`WordListOracle`]
//!   as a dictionary-file backed implementation.
//! - [`DebounceTimer`]: per-document quiet-period coalescing.
//! - [`SpellState`]: per-document cache, scan versioning and marker diffing.
//! - [`DocumentRegistry`]: eligibility gate and per-document lifecycles.
//! - [`CorrectionController`]: the single correction popup.
//! - [`SpellEngine`]: the actor driving all of the above.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ortho_config::SpellConfig;
//! use ortho_spell::{DocumentId, DocumentInfo, MarkerStore, MemoryHost, SpellEngine, SpellOracle, WordListOracle};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SpellConfig::default();
//! let host = Arc::new(MemoryHost::new());
//! let markers = Arc::new(MarkerStore::new());
//! let mut engine = SpellEngine::activate_with_loader(
//! 	&config,
//! 	|personal| {
//! 		let oracle: Arc<dyn SpellOracle> = Arc::new(WordListOracle::load("SET UTF-8", "2\nthe\nreceive", personal.words())?);
//! 		Ok(oracle)
//! 	},
//! 	host.clone(),
//! 	markers.clone(),
//! )?;
//!
//! let doc = DocumentId::from("notes.txt");
//! host.set_text(&doc, "teh receive");
//! engine.observe(DocumentInfo { id: doc.clone(), path: None, grammar: "text.plain".into(), len_chars: 11 });
//! engine.settle().await;
//! assert_eq!(markers.words(&doc), vec!["teh".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod event;
pub mod host;
pub mod oracle;
pub mod registry;
pub mod scan;
pub mod session;
pub mod state;
pub mod tokenizer;
pub mod wordlist;

pub use debounce::DebounceTimer;
pub use eligibility::{Eligibility, Ineligible};
pub use engine::{HostInput, SpellEngine};
pub use error::{EngineError, Result};
pub use event::EngineEvent;
pub use host::{
	DocumentHost, DocumentId, DocumentInfo, HostError, MISSPELLING_CLASS, MarkerDelta, MarkerId, MarkerSink, MarkerStore,
	MemoryHost, RenderedMarker,
};
pub use oracle::{LoadError, OracleError, SpellOracle};
pub use registry::DocumentRegistry;
pub use scan::{ORACLE_QUERY_TIMEOUT, Occurrence, ScanOutcome};
pub use session::{Candidate, CorrectionController, CorrectionSession, SessionAction};
pub use state::{Marker, Misspelling, SpellState};
pub use tokenizer::{Token, token_at, tokenize};
pub use wordlist::WordListOracle;

//! Boundary to the spelling oracle.
//!
//! The engine never decides spelling on its own: it asks a [`SpellOracle`]
//! whether a word is correct and what it could be replaced with. Queries are
//! asynchronous and may fail individually; a failed query never aborts a
//! scan (see [`crate::scan`]).

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single oracle query.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
	/// The query did not answer within the scan's per-word budget.
	#[error("oracle query timed out")]
	Timeout,
	/// The oracle reported an error for this word.
	#[error("oracle query failed: {0}")]
	Query(String),
}

/// Failure to load the dictionary backing an oracle.
///
/// Fatal for the engine: it refuses to activate.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The affix data is empty or has no directives.
	#[error("affix data contains no directives")]
	EmptyAffix,
	/// The dictionary data contains no words.
	#[error("dictionary data contains no words")]
	EmptyDictionary,
	/// The leading entry count of the dictionary is not a number.
	#[error("invalid dictionary entry count {0:?}")]
	InvalidCount(String),
	/// A dictionary file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path of the unreadable file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Spelling correctness and suggestion service.
#[async_trait]
pub trait SpellOracle: Send + Sync {
	/// Returns whether `word` is spelled correctly.
	async fn is_correct(&self, word: &str) -> Result<bool, OracleError>;

	/// Returns replacement candidates for `word`, most relevant first.
	async fn suggestions(&self, word: &str) -> Result<Vec<String>, OracleError>;

	/// Adds `word` to the accepted set. Accepting a word twice is a no-op.
	///
	/// Takes effect on the next query; results already cached by a scan are
	/// not revisited.
	fn accept(&self, word: &str);
}

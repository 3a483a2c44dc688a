//! In-memory word-list oracle.
//!
//! Reads Hunspell-shaped dictionaries: the `.dic` stems are loaded as-is with
//! their `/FLAGS` stripped, the `.aff` file is only checked for being a
//! plausible affix file. No affix expansion or morphology is performed.
//! Suggestions are dictionary words within a small edit distance.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use ortho_config::DictionaryPaths;
use parking_lot::RwLock;

use crate::oracle::{LoadError, OracleError, SpellOracle};

/// Largest Damerau-Levenshtein distance a suggestion may have.
const MAX_EDIT_DISTANCE: usize = 2;

/// Word-list backed [`SpellOracle`].
#[derive(Debug)]
pub struct WordListOracle {
	words: HashSet<String>,
	personal: RwLock<HashSet<String>>,
}

impl WordListOracle {
	/// Builds an oracle from affix text, dictionary text, and personal words.
	pub fn load(affix: &str, dictionary: &str, personal: &[String]) -> Result<Self, LoadError> {
		let has_directive = affix.lines().map(str::trim).any(|line| !line.is_empty() && !line.starts_with('#'));
		if !has_directive {
			return Err(LoadError::EmptyAffix);
		}

		let mut lines = dictionary.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();
		if let Some(first) = lines.peek()
			&& first.starts_with(|c: char| c.is_ascii_digit())
		{
			first.parse::<usize>().map_err(|_| LoadError::InvalidCount((*first).to_string()))?;
			lines.next();
		}

		let words: HashSet<String> = lines
			.filter(|line| !line.starts_with('#'))
			.filter_map(|line| line.split('/').next())
			.map(str::trim)
			.filter(|word| !word.is_empty())
			.map(str::to_string)
			.collect();
		if words.is_empty() {
			return Err(LoadError::EmptyDictionary);
		}

		tracing::debug!(words = words.len(), personal = personal.len(), "spell.wordlist.load");
		Ok(Self {
			words,
			personal: RwLock::new(personal.iter().cloned().collect()),
		})
	}

	/// Reads the affix and dictionary files and builds an oracle.
	pub fn from_paths(paths: &DictionaryPaths, personal: &[String]) -> Result<Self, LoadError> {
		let affix = read(&paths.affix)?;
		let dictionary = read(&paths.words)?;
		Self::load(&affix, &dictionary, personal)
	}

	/// Number of dictionary stems.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	fn knows(&self, word: &str) -> bool {
		if self.words.contains(word) || self.personal.read().contains(word) {
			return true;
		}
		match casing(word) {
			Casing::Lower | Casing::Other => false,
			Casing::Capitalized => self.words.contains(&word.to_lowercase()),
			Casing::Upper => {
				let lower = word.to_lowercase();
				self.words.contains(&lower) || self.words.contains(&capitalize(&lower))
			}
		}
	}

	fn rank(&self, word: &str) -> Vec<String> {
		let query = word.to_lowercase();
		let mut scored: Vec<(usize, f64, &str)> = self
			.words
			.iter()
			.filter(|candidate| candidate.chars().count().abs_diff(query.chars().count()) <= MAX_EDIT_DISTANCE)
			.filter_map(|candidate| {
				let lower = candidate.to_lowercase();
				let distance = strsim::damerau_levenshtein(&query, &lower);
				(distance > 0 && distance <= MAX_EDIT_DISTANCE).then(|| (distance, strsim::jaro_winkler(&query, &lower), candidate.as_str()))
			})
			.collect();
		scored.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.total_cmp(&a.1)).then(a.2.cmp(b.2)));

		let casing = casing(word);
		let mut seen = HashSet::new();
		scored
			.into_iter()
			.map(|(_, _, candidate)| apply_casing(candidate, casing))
			.filter(|candidate| seen.insert(candidate.clone()))
			.collect()
	}
}

#[async_trait]
impl SpellOracle for WordListOracle {
	async fn is_correct(&self, word: &str) -> Result<bool, OracleError> {
		Ok(self.knows(word))
	}

	async fn suggestions(&self, word: &str) -> Result<Vec<String>, OracleError> {
		Ok(self.rank(word))
	}

	fn accept(&self, word: &str) {
		self.personal.write().insert(word.to_string());
	}
}

fn read(path: &Path) -> Result<String, LoadError> {
	std::fs::read_to_string(path).map_err(|error| LoadError::Io {
		path: path.to_path_buf(),
		error,
	})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Casing {
	Lower,
	Capitalized,
	Upper,
	Other,
}

fn casing(word: &str) -> Casing {
	let mut chars = word.chars();
	let Some(first) = chars.next() else {
		return Casing::Other;
	};
	let rest: Vec<char> = chars.collect();
	if first.is_lowercase() && rest.iter().all(|c| c.is_lowercase()) {
		Casing::Lower
	} else if first.is_uppercase() && !rest.is_empty() && rest.iter().all(|c| c.is_uppercase()) {
		Casing::Upper
	} else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
		Casing::Capitalized
	} else {
		Casing::Other
	}
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn apply_casing(candidate: &str, casing: Casing) -> String {
	match casing {
		Casing::Upper => candidate.to_uppercase(),
		Casing::Capitalized => capitalize(candidate),
		Casing::Lower | Casing::Other => candidate.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	const AFF: &str = "SET UTF-8\nTRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ'\n";
	const DIC: &str = "6\nreceive/DSMZGRU\nrecipe/SM\nthe\nParis/M\nbug/S\nfix\n";

	fn oracle() -> WordListOracle {
		WordListOracle::load(AFF, DIC, &["ortho".into()]).unwrap()
	}

	#[tokio::test]
	async fn known_words_and_casing() {
		let oracle = oracle();
		assert_eq!(oracle.len(), 6);
		assert!(oracle.is_correct("receive").await.unwrap());
		assert!(oracle.is_correct("Receive").await.unwrap());
		assert!(oracle.is_correct("RECEIVE").await.unwrap());
		assert!(oracle.is_correct("Paris").await.unwrap());
		assert!(oracle.is_correct("PARIS").await.unwrap());
		assert!(!oracle.is_correct("paris").await.unwrap());
		assert!(!oracle.is_correct("recieve").await.unwrap());
		assert!(oracle.is_correct("ortho").await.unwrap());
	}

	#[tokio::test]
	async fn suggestions_are_ranked_by_distance() {
		let oracle = oracle();
		assert_eq!(oracle.suggestions("recieve").await.unwrap(), vec!["receive", "recipe"]);
		assert_eq!(oracle.suggestions("Teh").await.unwrap(), vec!["The"]);
		assert_eq!(oracle.suggestions("BUGG").await.unwrap(), vec!["BUG"]);
		assert!(oracle.suggestions("zzzzzzzz").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn accept_is_idempotent() {
		let oracle = oracle();
		assert!(!oracle.is_correct("teh").await.unwrap());
		oracle.accept("teh");
		oracle.accept("teh");
		assert!(oracle.is_correct("teh").await.unwrap());
	}

	#[test]
	fn load_errors() {
		assert!(matches!(WordListOracle::load("", DIC, &[]), Err(LoadError::EmptyAffix)));
		assert!(matches!(WordListOracle::load(AFF, "3\n", &[]), Err(LoadError::EmptyDictionary)));
		assert!(matches!(WordListOracle::load(AFF, "12x\nword\n", &[]), Err(LoadError::InvalidCount(_))));
	}

	#[test]
	fn from_paths_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let paths = DictionaryPaths {
			affix: dir.path().join("missing.aff"),
			words: dir.path().join("missing.dic"),
		};
		assert!(matches!(WordListOracle::from_paths(&paths, &[]), Err(LoadError::Io { .. })));
	}
}

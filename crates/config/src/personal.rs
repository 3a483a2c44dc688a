//! Personal dictionary persistence.
//!
//! The personal dictionary is an ordered, duplicate-free list of words the
//! user accepted. On disk it is a plain text file with one word per line.
//! Appends rewrite the whole file through a temporary sibling and an atomic
//! rename, so a crash never leaves a half-written list behind.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Ordered, deduplicated list of accepted words.
#[derive(Debug, Clone, Default)]
pub struct PersonalDictionary {
	path: Option<PathBuf>,
	words: Vec<String>,
	index: HashSet<String>,
}

impl PersonalDictionary {
	/// Creates a dictionary that is never written to disk.
	pub fn in_memory(seed: &[String]) -> Self {
		let mut dict = Self::default();
		for word in seed {
			dict.insert(word);
		}
		dict
	}

	/// Opens a file-backed dictionary.
	///
	/// A missing file is treated as empty and created on the first append.
	/// `seed` words are merged in memory but only persisted alongside a
	/// later append.
	pub fn open(path: impl AsRef<Path>, seed: &[String]) -> Result<Self> {
		let path = path.as_ref();
		let mut dict = Self::in_memory(seed);
		dict.path = Some(path.to_path_buf());

		match std::fs::read_to_string(path) {
			Ok(contents) => {
				for line in contents.lines() {
					let word = line.trim();
					if !word.is_empty() {
						dict.insert(word);
					}
				}
			}
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
			Err(error) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					error,
				});
			}
		}

		tracing::debug!(path = %path.display(), words = dict.words.len(), "config.personal.open");
		Ok(dict)
	}

	/// Returns the words in insertion order.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Returns true when `word` is already present.
	pub fn contains(&self, word: &str) -> bool {
		self.index.contains(word)
	}

	/// Appends `word` and persists the list.
	///
	/// Returns `Ok(false)` without touching the file when the word is
	/// already present.
	pub fn append(&mut self, word: &str) -> Result<bool> {
		if word.is_empty() || word.chars().any(char::is_whitespace) {
			return Err(ConfigError::InvalidWord(word.to_string()));
		}
		if !self.insert(word) {
			return Ok(false);
		}
		if let Err(err) = self.persist() {
			self.words.pop();
			self.index.remove(word);
			return Err(err);
		}
		tracing::debug!(word, "config.personal.append");
		Ok(true)
	}

	fn insert(&mut self, word: &str) -> bool {
		if !self.index.insert(word.to_string()) {
			return false;
		}
		self.words.push(word.to_string());
		true
	}

	fn persist(&self) -> Result<()> {
		let Some(path) = &self.path else {
			return Ok(());
		};
		let io_err = |error| ConfigError::Io {
			path: path.clone(),
			error,
		};

		let dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		std::fs::create_dir_all(dir).map_err(io_err)?;

		let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
		for word in &self.words {
			writeln!(tmp, "{word}").map_err(io_err)?;
		}
		tmp.persist(path).map_err(|e| io_err(e.error))?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn duplicate_append_is_a_noop() {
		let mut dict = PersonalDictionary::in_memory(&[]);
		assert!(dict.append("teh").unwrap());
		assert!(!dict.append("teh").unwrap());
		assert_eq!(dict.words(), ["teh".to_string()]);
	}

	#[test]
	fn seed_is_deduplicated() {
		let dict = PersonalDictionary::in_memory(&["a".into(), "b".into(), "a".into()]);
		assert_eq!(dict.words(), ["a".to_string(), "b".to_string()]);
	}

	#[test]
	fn rejects_whitespace() {
		let mut dict = PersonalDictionary::in_memory(&[]);
		assert!(matches!(dict.append("two words"), Err(ConfigError::InvalidWord(_))));
		assert!(matches!(dict.append(""), Err(ConfigError::InvalidWord(_))));
	}

	#[test]
	fn file_round_trip_keeps_one_entry_per_word() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("words.txt");

		let mut dict = PersonalDictionary::open(&path, &[]).unwrap();
		assert!(dict.words().is_empty());
		dict.append("teh").unwrap();
		dict.append("teh").unwrap();
		dict.append("ortho").unwrap();

		let contents = std::fs::read_to_string(&path).unwrap();
		assert_eq!(contents, "teh\northo\n");

		let reopened = PersonalDictionary::open(&path, &["teh".into()]).unwrap();
		assert_eq!(reopened.words(), ["teh".to_string(), "ortho".to_string()]);
	}
}

//! Configuration for the ortho spell engine.
//!
//! Configuration is a read-only snapshot taken once at activation. It is
//! written in TOML:
//!
//! ```toml
//! enabled_grammars = ["text.plain", "source.gfm"]
//! character_limit = 200000
//! ignore_patterns = ["**/target/**", "*.lock"]
//! personal_dictionary = ["ortho", "tokio"]
//! personal_dictionary_path = "/home/me/.config/ortho/words.txt"
//! debounce_ms = 300
//! max_suggestions = 8
//!
//! [dictionary]
//! affix = "/usr/share/hunspell/en_US.aff"
//! words = "/usr/share/hunspell/en_US.dic"
//! ```
//!
//! Every field is optional; missing fields take the values of
//! [`SpellConfig::default`]. The only mutable piece of configuration is the
//! personal dictionary, see [`PersonalDictionary`].

pub mod error;
pub mod personal;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
pub use personal::PersonalDictionary;
use serde::Deserialize;

/// Grammars checked when the configuration does not name any.
pub const DEFAULT_GRAMMARS: &[&str] = &["text.plain", "source.gfm", "text.git-commit", "source.rust"];

/// Documents larger than this many characters are never registered.
pub const DEFAULT_CHARACTER_LIMIT: usize = 500_000;

/// Quiet period after the last edit before a rescan fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Upper bound on suggestions cached per misspelled word.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// Locations of the dictionary handed to the spelling oracle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DictionaryPaths {
	/// Affix rules file (Hunspell `.aff`).
	pub affix: PathBuf,
	/// Word list file (Hunspell `.dic`).
	pub words: PathBuf,
}

/// Configuration snapshot read at engine activation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpellConfig {
	/// Grammar tags whose documents are checked.
	pub enabled_grammars: BTreeSet<String>,
	/// Documents with more characters than this are ignored.
	pub character_limit: usize,
	/// Glob patterns; a document whose path matches any of them is ignored.
	pub ignore_patterns: Vec<String>,
	/// Words accepted regardless of the dictionary.
	pub personal_dictionary: Vec<String>,
	/// File the personal dictionary is persisted to when words are accepted.
	pub personal_dictionary_path: Option<PathBuf>,
	/// Debounce delay in milliseconds.
	pub debounce_ms: u64,
	/// Maximum number of suggestions kept per misspelled word.
	pub max_suggestions: usize,
	/// Dictionary files for the oracle, if loaded from disk.
	pub dictionary: Option<DictionaryPaths>,
}

impl Default for SpellConfig {
	fn default() -> Self {
		Self {
			enabled_grammars: DEFAULT_GRAMMARS.iter().map(|g| (*g).to_string()).collect(),
			character_limit: DEFAULT_CHARACTER_LIMIT,
			ignore_patterns: Vec::new(),
			personal_dictionary: Vec::new(),
			personal_dictionary_path: None,
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			max_suggestions: DEFAULT_MAX_SUGGESTIONS,
			dictionary: None,
		}
	}
}

impl SpellConfig {
	/// Parses a configuration from TOML text.
	pub fn from_toml(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Loads a configuration file from disk.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml(&input)?;
		tracing::debug!(path = %path.display(), grammars = config.enabled_grammars.len(), "config.load");
		Ok(config)
	}

	/// Returns the debounce delay as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Compiles [`Self::ignore_patterns`] into a single matcher.
	pub fn ignore_set(&self) -> Result<GlobSet> {
		let mut builder = GlobSetBuilder::new();
		for pattern in &self.ignore_patterns {
			let glob = Glob::new(pattern).map_err(|error| ConfigError::Glob {
				pattern: pattern.clone(),
				error,
			})?;
			builder.add(glob);
		}
		builder.build().map_err(|error| ConfigError::Glob {
			pattern: self.ignore_patterns.join(", "),
			error,
		})
	}

	/// Opens the personal dictionary, seeded with the inline words.
	pub fn personal_dictionary(&self) -> Result<PersonalDictionary> {
		match &self.personal_dictionary_path {
			Some(path) => PersonalDictionary::open(path, &self.personal_dictionary),
			None => Ok(PersonalDictionary::in_memory(&self.personal_dictionary)),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_input_yields_defaults() {
		assert_eq!(SpellConfig::from_toml("").unwrap(), SpellConfig::default());
	}

	#[test]
	fn parses_all_fields() {
		let config = SpellConfig::from_toml(
			r#"
			enabled_grammars = ["text.plain"]
			character_limit = 10
			ignore_patterns = ["*.lock"]
			personal_dictionary = ["teh"]
			debounce_ms = 500
			max_suggestions = 3

			[dictionary]
			affix = "en.aff"
			words = "en.dic"
			"#,
		)
		.unwrap();

		assert_eq!(config.enabled_grammars.iter().collect::<Vec<_>>(), vec!["text.plain"]);
		assert_eq!(config.character_limit, 10);
		assert_eq!(config.ignore_patterns, vec!["*.lock".to_string()]);
		assert_eq!(config.personal_dictionary, vec!["teh".to_string()]);
		assert_eq!(config.debounce(), Duration::from_millis(500));
		assert_eq!(config.max_suggestions, 3);
		assert_eq!(
			config.dictionary,
			Some(DictionaryPaths {
				affix: PathBuf::from("en.aff"),
				words: PathBuf::from("en.dic"),
			})
		);
	}

	#[test]
	fn unknown_field_is_rejected() {
		assert!(matches!(SpellConfig::from_toml("colour = 1"), Err(ConfigError::Toml(_))));
	}

	#[test]
	fn ignore_set_matches_paths() {
		let config = SpellConfig {
			ignore_patterns: vec!["**/vendor/**".into(), "*.lock".into()],
			..SpellConfig::default()
		};
		let set = config.ignore_set().unwrap();
		assert!(set.is_match("/repo/vendor/lib/readme.md"));
		assert!(set.is_match("/repo/Cargo.lock"));
		assert!(!set.is_match("/repo/src/main.rs"));
	}

	#[test]
	fn invalid_glob_reports_pattern() {
		let config = SpellConfig {
			ignore_patterns: vec!["a[".into()],
			..SpellConfig::default()
		};
		match config.ignore_set() {
			Err(ConfigError::Glob { pattern, .. }) => assert_eq!(pattern, "a["),
			other => panic!("expected glob error, got {other:?}"),
		}
	}
}

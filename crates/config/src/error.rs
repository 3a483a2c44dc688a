//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration or the personal dictionary.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or mapping it onto [`crate::SpellConfig`].
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading or writing a configuration file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// An ignore pattern is not a valid glob.
	#[error("invalid ignore pattern {pattern:?}: {error}")]
	Glob {
		/// The offending pattern as written in the configuration.
		pattern: String,
		/// The underlying glob compilation error.
		error: globset::Error,
	},

	/// A personal dictionary entry is empty or contains whitespace.
	#[error("invalid personal dictionary word: {0:?}")]
	InvalidWord(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

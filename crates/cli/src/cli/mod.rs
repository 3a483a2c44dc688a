//! CLI schema and parsing helpers for the ortho binary.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ortho")]
#[command(about = "Spell checker for prose and source files")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Report misspelled words in files
	Check(CheckArgs),
	/// Add a word to the personal dictionary
	Accept {
		/// Word to accept
		word: String,
		/// Personal dictionary file (overrides the config)
		#[arg(long, value_name = "FILE")]
		personal: Option<PathBuf>,
		/// Configuration file naming the personal dictionary
		#[arg(short, long, value_name = "FILE")]
		config: Option<PathBuf>,
	},
}

/// Arguments of `ortho check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
	/// Configuration file (TOML)
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Dictionary word list (Hunspell .dic)
	#[arg(long, value_name = "WORDS", requires = "affix")]
	pub dictionary: Option<PathBuf>,

	/// Dictionary affix file (Hunspell .aff)
	#[arg(long, value_name = "AFF", requires = "dictionary")]
	pub affix: Option<PathBuf>,

	/// Files to check
	#[arg(required = true, value_name = "PATH")]
	pub paths: Vec<PathBuf>,
}

/// Grammar tag the engine uses for `path`.
pub fn grammar_for(path: &Path) -> &'static str {
	if path.file_name().is_some_and(|name| name == "COMMIT_EDITMSG") {
		return "text.git-commit";
	}
	match path.extension().and_then(|ext| ext.to_str()) {
		Some("md" | "markdown") => "source.gfm",
		Some("rs") => "source.rust",
		_ => "text.plain",
	}
}

/// 1-indexed line and column (in characters) of byte `offset` in `text`.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
	let before = &text[..offset];
	let line_start = before.rfind('\n').map_or(0, |i| i + 1);
	let line = before.matches('\n').count() + 1;
	let column = before[line_start..].chars().count() + 1;
	(line, column)
}

#[cfg(test)]
mod tests;

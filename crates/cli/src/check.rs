//! `ortho check` and `ortho accept`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use ortho_config::{DictionaryPaths, PersonalDictionary, SpellConfig};
use ortho_spell::{DocumentId, DocumentInfo, MarkerStore, MemoryHost, Misspelling, SpellEngine, SpellOracle, WordListOracle};
use tracing::debug;

use crate::cli::{CheckArgs, grammar_for, line_col};

/// Checks every file in `args`, writing one line per misspelling to `out`.
///
/// Returns the number of misspellings found.
pub async fn check(args: &CheckArgs, out: &mut impl Write) -> anyhow::Result<usize> {
	let mut config = load_config(args.config.as_deref())?;
	if let (Some(words), Some(affix)) = (&args.dictionary, &args.affix) {
		config.dictionary = Some(DictionaryPaths {
			affix: affix.clone(),
			words: words.clone(),
		});
	}
	let Some(paths) = config.dictionary.clone() else {
		bail!("no dictionary configured; pass --dictionary and --affix or set [dictionary] in the config");
	};

	let host = Arc::new(MemoryHost::new());
	let mut engine = SpellEngine::activate_with_loader(
		&config,
		|personal| {
			let oracle: Arc<dyn SpellOracle> = Arc::new(WordListOracle::from_paths(&paths, personal.words())?);
			Ok(oracle)
		},
		host.clone(),
		Arc::new(MarkerStore::new()),
	)?;

	let mut checked = Vec::new();
	for path in &args.paths {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
		let id = DocumentId::new(path.to_string_lossy());
		host.set_text(&id, text.as_str());
		let info = DocumentInfo {
			id: id.clone(),
			path: Some(path.clone()),
			grammar: grammar_for(path).to_string(),
			len_chars: text.chars().count(),
		};
		if engine.observe(info) {
			checked.push((path, id, text));
		} else {
			debug!(path = %path.display(), "cli.check.skipped");
		}
	}
	engine.settle().await;

	let mut found = 0;
	for (path, id, text) in &checked {
		for misspelling in engine.misspellings(id) {
			writeln!(out, "{}", report_line(path, text, &misspelling))?;
			found += 1;
		}
	}
	engine.deactivate();
	Ok(found)
}

/// Adds `word` to the personal dictionary, returning false if it was already there.
pub fn accept(word: &str, personal: Option<&Path>, config: Option<&Path>) -> anyhow::Result<bool> {
	let path: PathBuf = match personal {
		Some(path) => path.to_path_buf(),
		None => load_config(config)?
			.personal_dictionary_path
			.context("no personal dictionary file; pass --personal or set personal_dictionary_path")?,
	};
	let mut dictionary = PersonalDictionary::open(&path, &[])?;
	Ok(dictionary.append(word)?)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SpellConfig> {
	match path {
		Some(path) => SpellConfig::load(path).with_context(|| format!("loading config {}", path.display())),
		None => Ok(SpellConfig::default()),
	}
}

fn report_line(path: &Path, text: &str, misspelling: &Misspelling) -> String {
	let (line, column) = line_col(text, misspelling.range.start);
	let mut report = format!("{}:{line}:{column}: {}", path.display(), misspelling.word);
	if !misspelling.suggestions.is_empty() {
		report.push_str(" -> ");
		report.push_str(&misspelling.suggestions.join(", "));
	}
	report
}

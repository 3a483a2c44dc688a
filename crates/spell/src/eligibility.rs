//! Eligibility gate for documents.
//!
//! Evaluated once when a document is first observed. An ineligible document
//! is simply never registered; this is not an error.

use std::collections::BTreeSet;

use globset::GlobSet;
use ortho_config::SpellConfig;

use crate::host::DocumentInfo;

/// Why a document was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
	/// Its grammar is not in the enabled set.
	Grammar,
	/// It has more characters than the configured limit.
	TooLarge,
	/// Its path matches an ignore pattern.
	Ignored,
}

impl Ineligible {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Grammar => "grammar",
			Self::TooLarge => "too_large",
			Self::Ignored => "ignored",
		}
	}
}

/// Compiled eligibility rules.
#[derive(Debug, Clone)]
pub struct Eligibility {
	grammars: BTreeSet<String>,
	character_limit: usize,
	ignore: GlobSet,
}

impl Eligibility {
	pub fn new(grammars: BTreeSet<String>, character_limit: usize, ignore: GlobSet) -> Self {
		Self {
			grammars,
			character_limit,
			ignore,
		}
	}

	/// Compiles the rules from a configuration snapshot.
	pub fn from_config(config: &SpellConfig) -> ortho_config::Result<Self> {
		Ok(Self::new(config.enabled_grammars.clone(), config.character_limit, config.ignore_set()?))
	}

	/// Checks a document against the rules.
	pub fn validate(&self, doc: &DocumentInfo) -> Result<(), Ineligible> {
		if !self.grammars.contains(&doc.grammar) {
			return Err(Ineligible::Grammar);
		}
		if doc.len_chars > self.character_limit {
			return Err(Ineligible::TooLarge);
		}
		if doc.path.as_ref().is_some_and(|path| self.ignore.is_match(path)) {
			return Err(Ineligible::Ignored);
		}
		Ok(())
	}
}
